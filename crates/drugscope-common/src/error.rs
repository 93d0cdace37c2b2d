use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrugscopeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request blocked: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DrugscopeError>;
