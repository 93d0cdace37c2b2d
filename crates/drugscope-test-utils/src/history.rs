use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use drugscope_common::AnalysisRecord;
use drugscope_db::{DbError, HistoryStore, Stored};

/// In-memory [`HistoryStore`] with the same ordering guarantees as the SQLite one.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save(&self, record: &AnalysisRecord) -> Result<Stored, DbError> {
        let mut records = self.records.lock().unwrap();
        let newest = records.last().and_then(|r| r.predicted_at);
        let predicted_at = match newest {
            Some(prev) if prev > Utc::now() => prev,
            _ => Utc::now(),
        };
        let mut stored = record.clone();
        stored.predicted_at = Some(predicted_at);
        records.push(stored);
        Ok(Stored { id: record.id, predicted_at })
    }

    async fn list(&self) -> Result<Vec<AnalysisRecord>, DbError> {
        Ok(self.records.lock().unwrap().iter().rev().cloned().collect())
    }
}

/// A store whose every operation fails.
#[derive(Default)]
pub struct FailingHistoryStore {
    attempts: AtomicU32,
}

impl FailingHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn save(&self, _record: &AnalysisRecord) -> Result<Stored, DbError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DbError::Unavailable("disk I/O error".to_string()))
    }

    async fn list(&self) -> Result<Vec<AnalysisRecord>, DbError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DbError::Unavailable("disk I/O error".to_string()))
    }
}
