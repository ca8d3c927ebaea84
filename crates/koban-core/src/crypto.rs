//! Cryptographic primitives: SHA-256 hashing and secp256k1 ECDSA.
//!
//! Wraps the digest and curve operations with strong types. Verification
//! never panics and never errors: any unverifiable input is simply `false`.

use rand::rngs::OsRng;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CoreError;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(digest.into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex (the wire representation of block hashes).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte compact ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature(pub [u8; 64]);

impl EcdsaSignature {
    /// Convert to hex (the wire representation of transfer signatures).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaSig({}...)", &self.to_hex()[..16])
    }
}

/// A secp256k1 keypair.
///
/// The public key's wire representation is the hex of its 65-byte
/// uncompressed encoding; the secret key is the hex of the 32-byte scalar.
#[derive(Clone)]
pub struct Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Keypair {
    /// Generate a new keypair from the operating system's entropy source.
    ///
    /// Panics if the entropy source is unavailable; key generation never
    /// falls back to weaker randomness.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create from a 32-byte secret scalar.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, CoreError> {
        let secret_key =
            SecretKey::from_slice(bytes).map_err(|_| CoreError::InvalidSecretKey)?;
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Hex of the uncompressed public key encoding.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize_uncompressed())
    }

    /// Hex of the secret scalar.
    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Sign a 32-byte digest.
    pub fn sign_digest(&self, digest: &Sha256Hash) -> EcdsaSignature {
        let secp = Secp256k1::new();
        let message = Message::from_digest(digest.0);
        let signature = secp.sign_ecdsa(&message, &self.secret_key);
        EcdsaSignature(signature.serialize_compact())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({}...)", &self.public_key_hex()[..16])
    }
}

/// Verify a hex-encoded compact signature over a digest.
///
/// Returns `false` for malformed hex, a wrong-length or off-curve public
/// key, or a failing curve check. Verification failure is an expected
/// outcome, not a defect, so this never returns an error.
pub fn verify_signature(signature_hex: &str, digest: &Sha256Hash, public_key_hex: &str) -> bool {
    let Ok(signature_bytes) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(signature) = Signature::from_compact(&signature_bytes) else {
        return false;
    };
    let Ok(public_key_bytes) = hex::decode(public_key_hex) else {
        return false;
    };
    let Ok(public_key) = PublicKey::from_slice(&public_key_bytes) else {
        return false;
    };
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(digest.0);
    secp.verify_ecdsa(&message, &signature, &public_key).is_ok()
}
