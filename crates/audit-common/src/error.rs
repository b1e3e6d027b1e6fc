//! Error types for ssh-audit crates.

use thiserror::Error;

/// Result type alias using AuditError.
pub type AuditResult<T> = Result<T, AuditError>;

/// Primary error type for audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    // === Transient conditions (skip the iteration, keep sampling) ===
    #[error("Archive unavailable: {0}")]
    ArchiveUnavailable(String),

    // === Structural conditions (configuration error, stop the run) ===
    #[error("Missing required variable: {0}")]
    MissingVariable(String),

    #[error("Missing required dimension: {0}")]
    MissingDimension(String),

    #[error("Grid mismatch: {0}")]
    GridMismatch(String),

    #[error("Series shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Failed to read data: {0}")]
    DataRead(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuditError {
    /// Whether this error only abandons the current sampling iteration.
    ///
    /// Transient conditions (a daily file missing from the window) are caught
    /// at the iteration boundary; everything else indicates a configuration
    /// problem and must terminate the run, since continuing would silently
    /// mis-validate.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuditError::ArchiveUnavailable(_))
    }
}
