//! Analysis history.
//!
//! Records are append-only. Timestamps are assigned here, never by callers,
//! and never go backwards: a save issued when the wall clock reads earlier
//! than the newest stored record reuses that record's timestamp. Listing
//! returns newest first, ties broken by insertion order.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drugscope_common::AnalysisRecord;
use sqlx::Row;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{DbError, Result};

/// Outcome of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stored {
    pub id: Uuid,
    pub predicted_at: DateTime<Utc>,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append `record`, assigning its timestamp.
    async fn save(&self, record: &AnalysisRecord) -> Result<Stored>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<AnalysisRecord>>;
}

/// SQLite-backed [`HistoryStore`].
#[derive(Clone)]
pub struct HistoryRepository {
    db: Arc<Database>,
}

impl HistoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Number of stored analyses.
    pub async fn count(&self) -> Result<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses")
            .fetch_one(self.db.pool())
            .await?;
        Ok(n as u64)
    }
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or(DbError::InvalidTimestamp(micros))
}

#[async_trait]
impl HistoryStore for HistoryRepository {
    #[instrument(skip(self, record), fields(id = %record.id, drug = %record.drug_name))]
    async fn save(&self, record: &AnalysisRecord) -> Result<Stored> {
        // The timestamp lives in its own column
        let mut document = record.clone();
        document.predicted_at = None;
        let document = serde_json::to_string(&document)?;

        let now = Utc::now().timestamp_micros();
        let micros: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO analyses (id, drug_name, cid, document, predicted_at)
            SELECT ?1, ?2, ?3, ?4, MAX(?5, COALESCE((SELECT MAX(predicted_at) FROM analyses), 0))
            RETURNING predicted_at
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.drug_name)
        .bind(&record.cid)
        .bind(document)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        let predicted_at = from_micros(micros)?;
        debug!(predicted_at = %predicted_at, "Saved analysis");
        Ok(Stored { id: record.id, predicted_at })
    }

    async fn list(&self) -> Result<Vec<AnalysisRecord>> {
        let rows = sqlx::query(
            "SELECT document, predicted_at FROM analyses ORDER BY predicted_at DESC, seq DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| -> Result<AnalysisRecord> {
                let document: String = row.try_get("document")?;
                let micros: i64 = row.try_get("predicted_at")?;
                let mut record: AnalysisRecord = serde_json::from_str(&document)?;
                record.predicted_at = Some(from_micros(micros)?);
                Ok(record)
            })
            .collect()
    }
}
