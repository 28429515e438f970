//! Error types for Packrun
//!
//! The core pipeline is total over its input: data-quality conditions
//! surface as per-run quality flags, not errors, so one bad interval never
//! aborts a batch. The only failure surface is configuration validation.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for pipeline operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
