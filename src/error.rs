use thiserror::Error;

/// Scoring and configuration error types.
#[derive(Error, Debug)]
pub enum RtsiError {
    #[error("Insufficient data: {found} valid points, {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RtsiError>;
