//! Error types for the cadenza pipeline.
//!
//! The parse pipeline itself is total over arbitrary input and never
//! errors; this type covers the ambient surfaces around it (configuration
//! files, the diagnostic bin).

/// Top-level error type for the reply parser.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ParseError>;
