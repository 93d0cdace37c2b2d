//! drugscope-analysis: the analysis pipeline.
//!
//! `Orchestrator` sequences validation, the backend liveness check, registry
//! resolution, prediction, assembly and persistence. `assemble` turns a
//! registry match and a raw prediction into the record we store and return.

pub mod assembler;
pub mod error;
pub mod pipeline;

pub use assembler::{assemble, reference_links, NO_DESCRIPTION, NO_GENOME_REPORT};
pub use error::{AnalysisError, InvalidInput};
pub use pipeline::{AnalysisOutcome, AnalysisReport, Orchestrator, Stage, MSG_SAVED, MSG_NOT_SAVED};
