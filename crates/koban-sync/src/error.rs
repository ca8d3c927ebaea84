//! Error types for peer interactions.

use thiserror::Error;

/// Errors from a single peer call.
///
/// Peer failures are isolated per peer: the enclosing operation logs the
/// error and proceeds with whichever peers responded. Peers that miss a
/// message recover through their next consensus pass.
#[derive(Debug, Error)]
pub enum PeerError {
    /// The peer could not be reached at all.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// The peer did not answer within the configured bound.
    #[error("peer timed out: {0}")]
    Timeout(String),

    /// The endpoint is not part of the current neighbor snapshot.
    #[error("unknown neighbor: {0}")]
    UnknownNeighbor(String),

    /// The peer answered with something the protocol does not allow.
    #[error("protocol error from {neighbor}: {reason}")]
    Protocol { neighbor: String, reason: String },
}

/// Result type for peer operations.
pub type Result<T> = std::result::Result<T, PeerError>;
