use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response parse failed: {0}")]
    Parse(String),

    #[error("invalid feed configuration: {0}")]
    InvalidConfig(String),
}
