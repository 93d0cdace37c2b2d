//! drugscope-common: Shared types, errors, and helpers used across all drugscope crates.

pub mod error;
pub mod entities;
pub mod retry;
pub mod sandbox;

// Re-export commonly used types
pub use entities::{
    AnalysisRecord, AnalysisRequest, FormulaCheck, PredictionResult, PropertyValue,
    ReferenceLinks, RegistryMatch, NOT_AVAILABLE,
};
pub use error::{DrugscopeError, Result};
pub use retry::RetryPolicy;
pub use sandbox::SandboxClient;
