//! Error types for koban core primitives.

use thiserror::Error;

/// Errors raised by canonical encoding, signing, and address handling.
///
/// Signature *verification* failure is not an error: verifiers return
/// `false` for any unverifiable input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input could not be turned into a canonical preimage.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A freshly produced signature failed self-verification.
    #[error("signing error: produced signature failed self-verification")]
    Signing,

    /// Secret key bytes are not a valid curve scalar.
    #[error("invalid secret key")]
    InvalidSecretKey,

    /// Address failed base58check decoding.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A signed transfer record is missing its public key or signature.
    #[error("malformed transfer: {0}")]
    MalformedTransfer(String),
}
