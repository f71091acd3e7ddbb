//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface it.

use thiserror::Error;

/// The top-level error type for `hl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `hl-core`.
pub type CoreResult<T> = Result<T, CoreError>;
