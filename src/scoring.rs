//! Weighted composite pollutant scoring.
//!
//! Collapses a pollutant snapshot into a single 0-100 figure. Each
//! pollutant is normalized against a 100 µg/m³ saturation ceiling and
//! weighted by its health impact; the result is renormalized over the
//! weights of the pollutants actually present, so a partial reading is
//! still scored fairly over whatever it contains.

use crate::model::PollutantReading;

/// Health-impact weights per pollutant code. Sums to 1.0 over the full set.
const POLLUTANT_WEIGHTS: [(&str, f64); 6] = [
    ("pm2_5", 0.30),
    ("pm10", 0.25),
    ("o3", 0.20),
    ("no2", 0.15),
    ("so2", 0.05),
    ("co", 0.05),
];

/// Concentration at which a pollutant's contribution saturates.
const SATURATION_THRESHOLD: f64 = 100.0;

/// Weight for a recognized pollutant code, or `None` if unrecognized.
fn weight_for(code: &str) -> Option<f64> {
    POLLUTANT_WEIGHTS
        .iter()
        .find(|(name, _)| *name == code)
        .map(|(_, weight)| *weight)
}

/// Compute the weighted composite air-quality score in [0, 100].
///
/// Unrecognized pollutant codes are silently ignored. Returns 0.0 when the
/// reading contains no recognized pollutant, so an empty snapshot never
/// divides by zero.
pub fn composite_score(pollutants: &PollutantReading) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_used = 0.0;

    for (code, concentration) in pollutants.iter() {
        if let Some(weight) = weight_for(code) {
            let normalized = (concentration / SATURATION_THRESHOLD).min(1.0);
            weighted_sum += normalized * weight;
            weight_used += weight;
        }
    }

    if weight_used > 0.0 {
        (weighted_sum / weight_used) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reading_scores_zero() {
        assert_eq!(composite_score(&PollutantReading::default()), 0.0);
    }

    #[test]
    fn unrecognized_pollutants_are_ignored() {
        let reading = PollutantReading::from([("nh3", 50.0), ("no", 12.0)]);
        assert_eq!(composite_score(&reading), 0.0);
    }

    #[test]
    fn single_pollutant_renormalizes_to_full_weight() {
        // One pollutant at half the saturation ceiling scores 50 regardless
        // of its weight, since renormalization divides it back out.
        let reading = PollutantReading::from([("pm2_5", 50.0)]);
        assert!((composite_score(&reading) - 50.0).abs() < 1e-9);

        let reading = PollutantReading::from([("co", 50.0)]);
        assert!((composite_score(&reading) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn concentrations_saturate_at_threshold() {
        let reading = PollutantReading::from([("pm2_5", 400.0)]);
        assert!((composite_score(&reading) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn partial_reading_weights_only_present_pollutants() {
        // pm2_5 at ceiling (weight 0.30), o3 at zero (weight 0.20):
        // (0.30 * 1.0 + 0.20 * 0.0) / 0.50 * 100 = 60
        let reading = PollutantReading::from([("pm2_5", 100.0), ("o3", 0.0)]);
        assert!((composite_score(&reading) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn score_stays_in_bounds() {
        let readings = [
            PollutantReading::from([("pm2_5", 999.0), ("pm10", 999.0), ("co", 999.0)]),
            PollutantReading::from([("so2", 0.0)]),
            PollutantReading::from([
                ("pm2_5", 35.0),
                ("pm10", 60.0),
                ("o3", 80.0),
                ("no2", 20.0),
                ("so2", 5.0),
                ("co", 300.0),
            ]),
        ];

        for reading in readings {
            let score = composite_score(&reading);
            assert!((0.0..=100.0).contains(&score), "score {score} out of bounds");
        }
    }
}
