//! drugscope-web: JSON API for drug analysis.
//!   - POST /api/predict                  named-drug analysis
//!   - POST /api/predict-unknown          formula + receptor, no registry
//!   - POST /api/analyze-formula          routes on whether PubChem knows the formula
//!   - GET  /api/check-pubchem-formula    formula lookup
//!   - GET  /api/history                  stored analyses, newest first
//!   - GET  /api/health                   server and prediction backend status

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
