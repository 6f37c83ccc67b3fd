use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert store write failed: {0}")]
    StoreFailed(String),

    #[error("alert store query failed: {0}")]
    QueryFailed(String),

    #[error("alert not found: {0}")]
    NotFound(u64),

    #[error("invalid alert status: '{0}'")]
    InvalidStatus(String),
}
