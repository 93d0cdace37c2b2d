use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use drugscope_common::PredictionResult;
use drugscope_predict::{PredictRequest, PredictionBackend, PredictionError, UnknownPredictRequest};
use serde_json::Value;

/// Scripted [`PredictionBackend`].
pub struct MockPredictionBackend {
    available: AtomicBool,
    result: PredictionResult,
    unknown_result: Value,
    failures: AtomicU32,
    health_calls: AtomicU32,
    predict_requests: Mutex<Vec<PredictRequest>>,
    unknown_requests: Mutex<Vec<UnknownPredictRequest>>,
}

impl MockPredictionBackend {
    /// An available backend answering every prediction with `result`.
    pub fn new(result: PredictionResult) -> Self {
        Self {
            available: AtomicBool::new(true),
            unknown_result: serde_json::to_value(&result).unwrap_or(Value::Null),
            result,
            failures: AtomicU32::new(0),
            health_calls: AtomicU32::new(0),
            predict_requests: Mutex::new(Vec::new()),
            unknown_requests: Mutex::new(Vec::new()),
        }
    }

    /// A backend whose liveness probe fails.
    pub fn unavailable() -> Self {
        let backend = Self::new(PredictionResult::default());
        backend.set_available(false);
        backend
    }

    /// Raw reply for `predict_unknown`.
    pub fn with_unknown_result(mut self, result: Value) -> Self {
        self.unknown_result = result;
        self
    }

    /// The next `n` prediction calls fail with a 500.
    pub fn with_failures(self, n: u32) -> Self {
        self.failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn health_calls(&self) -> u32 {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn predict_requests(&self) -> Vec<PredictRequest> {
        self.predict_requests.lock().unwrap().clone()
    }

    pub fn unknown_requests(&self) -> Vec<UnknownPredictRequest> {
        self.unknown_requests.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Result<(), PredictionError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PredictionError::ApiError { status: 500, message: "model crashed".to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl PredictionBackend for MockPredictionBackend {
    async fn health(&self) -> Result<String, PredictionError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok("AI Service is running".to_string())
        } else {
            Err(PredictionError::Unavailable("connection refused".to_string()))
        }
    }

    async fn predict(&self, req: &PredictRequest) -> Result<PredictionResult, PredictionError> {
        self.predict_requests.lock().unwrap().push(req.clone());
        self.take_failure()?;
        Ok(self.result.clone())
    }

    async fn predict_unknown(&self, req: &UnknownPredictRequest) -> Result<Value, PredictionError> {
        self.unknown_requests.lock().unwrap().push(req.clone());
        self.take_failure()?;
        Ok(self.unknown_result.clone())
    }

    fn base_url(&self) -> &str {
        "mock://prediction"
    }
}
