use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::timestamp::parse_utc;
use crate::models::Candle;

/// SQLite archive of raw candles, one row per timestamp
#[derive(Debug)]
pub struct PriceArchive {
    pool: SqlitePool,
    database_path: PathBuf,
}

impl PriceArchive {
    /// Open (or create) the archive at `database_path`
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let database_path = database_path.as_ref().to_path_buf();
        debug!("Opening price archive at: {:?}", database_path);

        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePool::connect_with(connect_options).await?;

        let archive = Self {
            pool,
            database_path,
        };
        archive.initialize_schema().await?;
        Ok(archive)
    }

    /// Open an existing archive for inspection; never creates files or schema
    pub async fn open_read_only(database_path: impl AsRef<Path>) -> Result<Self> {
        let database_path = database_path.as_ref().to_path_buf();
        debug!("Opening price archive read-only at: {:?}", database_path);

        let connect_options = SqliteConnectOptions::new()
            .filename(&database_path)
            .create_if_missing(false)
            .read_only(true)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePool::connect_with(connect_options).await?;
        Ok(Self {
            pool,
            database_path,
        })
    }

    async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bitcoin_prices (
                timestamp TEXT PRIMARY KEY,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.database_path
    }

    /// Insert or overwrite candles keyed by timestamp, all in one transaction
    pub async fn upsert_candles(&self, candles: &[Candle]) -> Result<usize> {
        if candles.is_empty() {
            return Ok(0);
        }

        let mut transaction = self.pool.begin().await?;
        let mut affected_rows = 0;

        for candle in candles {
            let result = sqlx::query(
                r#"
                INSERT OR REPLACE INTO bitcoin_prices
                (timestamp, open, high, low, close, volume)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(archive_key(&candle.timestamp))
            .bind(candle.open)
            .bind(candle.high)
            .bind(candle.low)
            .bind(candle.close)
            .bind(candle.volume)
            .execute(&mut *transaction)
            .await?;

            affected_rows += result.rows_affected() as usize;
        }

        transaction.commit().await?;
        info!(
            "Archived {} candles to {}",
            candles.len(),
            self.database_path.display()
        );
        Ok(affected_rows)
    }

    /// Get count of archived candles
    pub async fn record_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bitcoin_prices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Oldest and newest archived timestamps
    pub async fn time_range(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        let row = sqlx::query("SELECT MIN(timestamp), MAX(timestamp) FROM bitcoin_prices")
            .fetch_one(&self.pool)
            .await?;

        let first: Option<String> = row.try_get(0)?;
        let last: Option<String> = row.try_get(1)?;

        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((parse_utc(&first)?, parse_utc(&last)?))),
            _ => Ok(None),
        }
    }

    /// Candles with `start <= timestamp <= end`, oldest first
    pub async fn load_candles(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, open, high, low, close, volume
            FROM bitcoin_prices
            WHERE timestamp >= ?1 AND timestamp <= ?2
            ORDER BY timestamp ASC
            "#,
        )
        .bind(archive_key(&start))
        .bind(archive_key(&end))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<Candle> {
                let timestamp: String = row.try_get("timestamp")?;
                Ok(Candle {
                    timestamp: parse_utc(&timestamp)?,
                    open: row.try_get("open")?,
                    high: row.try_get("high")?,
                    low: row.try_get("low")?,
                    close: row.try_get("close")?,
                    volume: row.try_get("volume")?,
                })
            })
            .collect()
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Fixed-width key so text ordering equals time ordering
fn archive_key(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}
