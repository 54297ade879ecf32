//! Error types for qrforge operations

use thiserror::Error;

/// Result type alias using qrforge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any work was done
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Download requested but the latest history entry is already saved
    /// (or the history is empty)
    #[error("No QR code to download")]
    NoPendingEntry,

    /// Export requested with no history recorded
    #[error("No codes to export")]
    EmptyLedger,

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
