//! HTTP handlers for all API routes.

pub mod formula;
pub mod history;
pub mod predict;
pub mod system;
