use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Malformed engine data: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
