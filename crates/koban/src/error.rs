//! Error types for node operations.

use koban_core::CoreError;
use thiserror::Error;

/// Errors that can occur during node operations.
///
/// Peer failures never surface here: they are logged and isolated inside
/// the fan-out. Business-logic rejections (bad signatures, short peer
/// chains, mining preconditions) are ordinary outcomes, not errors.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Canonical encoding, signing, or transfer classification failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Node configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;
