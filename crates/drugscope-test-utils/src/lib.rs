//! Test doubles and fixtures shared by the drugscope crates' integration tests.

pub mod fixtures;
pub mod history;
pub mod prediction;
pub mod registry;

pub use fixtures::{aspirin_prediction, sample_record, ASPIRIN_CID, ASPIRIN_SMILES};
pub use history::{FailingHistoryStore, MemoryHistoryStore};
pub use prediction::MockPredictionBackend;
pub use registry::MockRegistry;
