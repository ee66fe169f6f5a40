use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstreamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("{algorithm}: invalid key length {actual}, expected {expected}")]
    InvalidKeyLength {
        algorithm: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{algorithm}: invalid iv length {actual}")]
    InvalidIvLength {
        algorithm: &'static str,
        actual: usize,
    },

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, EstreamError>;
