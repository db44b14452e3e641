//! Volume Store
//!
//! Append-only SQLite time series of trade volume samples, with the windowed
//! aggregate queries the volume service needs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use tracker_core::{
    CurrencyPair, PairAverage, PairRank, TrackerError, TrackerResult, VolumeSample,
};

use crate::volume_stats::{self, Window};

/// Query contracts the volume service relies on
///
/// Every window is anchored to the time of the call. Appends must be visible
/// to aggregate queries issued after they return.
#[async_trait]
pub trait VolumeStore: Send + Sync {
    /// Persist a batch of samples; either all rows land or none do
    async fn append(&self, samples: &[VolumeSample]) -> TrackerResult<()>;

    /// Average volume per pair over the trailing hour
    async fn hourly_averages(&self) -> TrackerResult<Vec<PairAverage>>;

    /// Volatility ranking over the trailing 24 hours
    async fn volatility_ranks(&self) -> TrackerResult<Vec<PairRank>>;

    /// Samples for one pair over the trailing 24 hours, oldest first
    async fn history(&self, pair: CurrencyPair) -> TrackerResult<Vec<VolumeSample>>;
}

/// Volume store backed by SQLite
pub struct SqliteVolumeStore {
    conn: Mutex<Connection>,
}

impl SqliteVolumeStore {
    /// Open (or create) the database at `db_path`
    ///
    /// Creates the parent directory and the schema if they don't exist.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, VolumeStoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VolumeStoreError::Io(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (useful for testing)
    pub fn new_in_memory() -> Result<Self, VolumeStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, VolumeStoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), VolumeStoreError> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS currency_pair_volumes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fetch_time INTEGER NOT NULL,
                volume REAL NOT NULL,
                currency_pair TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_volumes_pair_time
            ON currency_pair_volumes(currency_pair, fetch_time);

            CREATE INDEX IF NOT EXISTS idx_volumes_time
            ON currency_pair_volumes(fetch_time);
            "#,
        )?;

        Ok(())
    }

    /// Insert samples in a single transaction
    pub fn record_samples(&self, samples: &[VolumeSample]) -> Result<usize, VolumeStoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO currency_pair_volumes (fetch_time, volume, currency_pair)
                VALUES (?1, ?2, ?3)
                "#,
            )?;

            for sample in samples {
                stmt.execute(params![
                    sample.observed_at.timestamp_millis(),
                    sample.volume,
                    sample.pair.as_str(),
                ])?;
            }
        }

        tx.commit()?;
        debug!("Recorded {} volume samples", samples.len());

        Ok(samples.len())
    }

    /// Average volume per pair for samples fetched at or after `from`
    pub fn averages_since(&self, from: DateTime<Utc>) -> Result<Vec<PairAverage>, VolumeStoreError> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            r#"
            SELECT currency_pair, AVG(volume) AS avg_volume
            FROM currency_pair_volumes
            WHERE fetch_time >= ?1
            GROUP BY currency_pair
            "#,
        )?;

        let rows = stmt
            .query_map(params![from.timestamp_millis()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(symbol, avg_volume)| {
                parse_pair(&symbol).map(|pair| PairAverage { pair, avg_volume })
            })
            .collect())
    }

    /// Volatility ranking over samples fetched at or after `from`
    pub fn ranks_since(&self, from: DateTime<Utc>) -> Result<Vec<PairRank>, VolumeStoreError> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            r#"
            SELECT currency_pair, volume
            FROM currency_pair_volumes
            WHERE fetch_time >= ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![from.timestamp_millis()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut volumes: BTreeMap<CurrencyPair, Vec<f64>> = BTreeMap::new();
        for (symbol, volume) in rows {
            if let Some(pair) = parse_pair(&symbol) {
                volumes.entry(pair).or_default().push(volume);
            }
        }

        Ok(volume_stats::rank_by_volatility(volumes))
    }

    /// Samples for `pair` fetched at or after `from`, oldest first
    pub fn history_since(
        &self,
        pair: CurrencyPair,
        from: DateTime<Utc>,
    ) -> Result<Vec<VolumeSample>, VolumeStoreError> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            r#"
            SELECT fetch_time, volume
            FROM currency_pair_volumes
            WHERE currency_pair = ?1 AND fetch_time >= ?2
            ORDER BY fetch_time ASC, id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![pair.as_str(), from.timestamp_millis()], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(millis, volume)| -> Result<VolumeSample, VolumeStoreError> {
                let observed_at = DateTime::from_timestamp_millis(millis)
                    .ok_or(VolumeStoreError::InvalidTimestamp(millis))?;
                Ok(VolumeSample::new(pair, observed_at, volume))
            })
            .collect()
    }

    /// Total number of stored samples
    pub fn sample_count(&self) -> Result<usize, VolumeStoreError> {
        let conn = self.conn.lock();

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM currency_pair_volumes",
            [],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}

#[async_trait]
impl VolumeStore for SqliteVolumeStore {
    async fn append(&self, samples: &[VolumeSample]) -> TrackerResult<()> {
        self.record_samples(samples)?;
        Ok(())
    }

    async fn hourly_averages(&self) -> TrackerResult<Vec<PairAverage>> {
        Ok(self.averages_since(Window::OneHour.start_time(Utc::now()))?)
    }

    async fn volatility_ranks(&self) -> TrackerResult<Vec<PairRank>> {
        Ok(self.ranks_since(Window::TwentyFourHours.start_time(Utc::now()))?)
    }

    async fn history(&self, pair: CurrencyPair) -> TrackerResult<Vec<VolumeSample>> {
        Ok(self.history_since(pair, Window::TwentyFourHours.start_time(Utc::now()))?)
    }
}

fn parse_pair(symbol: &str) -> Option<CurrencyPair> {
    match symbol.parse() {
        Ok(pair) => Some(pair),
        Err(e) => {
            warn!("Skipping stored row with untracked pair: {}", e);
            None
        }
    }
}

/// Errors that can occur during volume store operations
#[derive(Debug, thiserror::Error)]
pub enum VolumeStoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl From<VolumeStoreError> for TrackerError {
    fn from(err: VolumeStoreError) -> Self {
        TrackerError::store_unavailable(err.to_string())
    }
}
