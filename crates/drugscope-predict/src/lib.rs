//! drugscope-predict: prediction backend abstraction.
//!
//! `PredictionBackend` is one HTTP call per method; `PredictionClient` adds
//! the liveness gate, retries and response validation.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::{HttpPredictionBackend, PredictRequest, PredictionBackend, UnknownPredictRequest};
pub use client::PredictionClient;
pub use error::PredictionError;
