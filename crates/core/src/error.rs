use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid snapshot data: {0}")]
    InvalidData(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
