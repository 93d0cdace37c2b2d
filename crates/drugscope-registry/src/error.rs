//! Registry error types.

use drugscope_common::DrugscopeError;
use thiserror::Error;

/// Failure of a single registry request.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Client(#[from] DrugscopeError),

    #[error("Registry returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Property {property} missing for CID {cid}")]
    MissingProperty { cid: String, property: String },
}

/// Failure of a full name resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No registry entry found for '{query}'")]
    NotFound { query: String, suggestions: Vec<String> },

    #[error("Structure unavailable for CID {cid}: {source}")]
    Inconsistent {
        cid: String,
        #[source]
        source: RegistryError,
    },
}
