//! Error types for the label pipeline

use thiserror::Error;

/// Label pipeline error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Caller supplied an invalid request
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Barcode payload failed to encode
    #[error("Barcode encoding failed: {0}")]
    Barcode(String),

    /// PDF document assembly failed
    #[error("Document assembly failed: {0}")]
    Document(String),

    /// IO error while spooling or transmitting
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting on a print subsystem command
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Printer discovery failed
    #[error("Printer enumeration failed: {0}")]
    Enumeration(String),

    /// Every transport strategy failed
    #[error("Transport failed: {0}")]
    Transport(String),
}

/// Result type for pipeline operations
pub type PrintResult<T> = Result<T, PrintError>;
