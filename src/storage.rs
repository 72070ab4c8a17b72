//! SQLite storage for the check-in history.
//!
//! The history is the only persisted state: one row per air-quality
//! check-in with its timestamp, city, AQI category, and pollutant snapshot
//! (stored as JSON text). Engines never touch the database; they consume
//! the ordered `Vec<HistoryEntry>` this layer produces.

use chrono::{TimeZone, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::model::{AqiCategory, HistoryEntry, PollutantReading};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Create a new storage instance and initialize the schema.
    ///
    /// # Arguments
    ///
    /// * `database_url` - SQLite connection string (e.g., "sqlite:breathewise.db" or "sqlite::memory:")
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let storage = Self { pool };
        storage.initialize_schema().await?;

        Ok(storage)
    }

    /// Create the database schema if it doesn't exist.
    async fn initialize_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS check_ins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ts INTEGER NOT NULL,
                city TEXT NOT NULL,
                aqi INTEGER NOT NULL,
                pollutants TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Index for ordered history reads
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_check_ins_ts
            ON check_ins(ts)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a check-in to the history.
    pub async fn insert_check_in(&self, entry: &HistoryEntry) -> anyhow::Result<()> {
        let ts = entry.timestamp.timestamp();
        let pollutants = serde_json::to_string(&entry.pollutants)?;

        sqlx::query(
            r#"
            INSERT INTO check_ins (ts, city, aqi, pollutants)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(ts)
        .bind(&entry.city)
        .bind(i64::from(entry.aqi.value()))
        .bind(pollutants)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The full check-in history ordered by timestamp ascending.
    ///
    /// Insertion order breaks ties so same-day duplicates come back in the
    /// order they were recorded.
    pub async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT ts, city, aqi, pollutants
            FROM check_ins
            ORDER BY ts ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }

    /// The most recent check-in, or `None` for an empty history.
    pub async fn latest(&self) -> anyhow::Result<Option<HistoryEntry>> {
        let row = sqlx::query(
            r#"
            SELECT ts, city, aqi, pollutants
            FROM check_ins
            ORDER BY ts DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_entry).transpose()
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<HistoryEntry> {
    let ts: i64 = row.get("ts");
    let city: String = row.get("city");
    let aqi: i64 = row.get("aqi");
    let pollutants: String = row.get("pollutants");

    Ok(HistoryEntry {
        timestamp: Utc
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("invalid stored timestamp {ts}"))?,
        city,
        aqi: AqiCategory::new(aqi)?,
        pollutants: serde_json::from_str::<PollutantReading>(&pollutants)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(offset_days: i64, city: &str, aqi: i64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
                + Duration::days(offset_days),
            city: city.to_string(),
            aqi: AqiCategory::new(aqi).unwrap(),
            pollutants: PollutantReading::from([("pm2_5", 4.2), ("o3", 31.0)]),
        }
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let storage = Storage::new("sqlite::memory:").await.unwrap();

        storage.insert_check_in(&entry(0, "Tokyo", 2)).await.unwrap();

        let history = storage.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].city, "Tokyo");
        assert_eq!(history[0].aqi.value(), 2);
        assert_eq!(history[0].pollutants.get("pm2_5"), Some(4.2));
    }

    #[tokio::test]
    async fn history_is_ordered_by_timestamp() {
        let storage = Storage::new("sqlite::memory:").await.unwrap();

        storage.insert_check_in(&entry(2, "Osaka", 3)).await.unwrap();
        storage.insert_check_in(&entry(0, "Tokyo", 1)).await.unwrap();
        storage.insert_check_in(&entry(1, "Kyoto", 2)).await.unwrap();

        let history = storage.history().await.unwrap();
        let cities: Vec<_> = history.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(cities, ["Tokyo", "Kyoto", "Osaka"]);
    }

    #[tokio::test]
    async fn latest_returns_newest_entry() {
        let storage = Storage::new("sqlite::memory:").await.unwrap();

        assert!(storage.latest().await.unwrap().is_none());

        storage.insert_check_in(&entry(0, "Tokyo", 1)).await.unwrap();
        storage.insert_check_in(&entry(3, "Osaka", 4)).await.unwrap();

        let latest = storage.latest().await.unwrap().unwrap();
        assert_eq!(latest.city, "Osaka");
        assert_eq!(latest.aqi.value(), 4);
    }
}
