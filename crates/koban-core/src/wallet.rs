//! Wallet identity: a secp256k1 keypair and its base58check address.
//!
//! Address derivation is bit-exact across nodes:
//!
//! 1. `h1 = SHA256(uncompressed public key)`
//! 2. `h2 = RIPEMD160(h1)`
//! 3. `versioned = 0x00 || h2`
//! 4. `checksum = SHA256(SHA256(versioned))[0..4]`
//! 5. `address = Base58(versioned || checksum)`

use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::{Digest, Sha256};

use crate::crypto::Keypair;
use crate::error::CoreError;

/// Version byte prepended to the RIPEMD-160 public key hash.
pub const ADDRESS_VERSION: u8 = 0x00;

const CHECKSUM_LEN: usize = 4;
const PAYLOAD_LEN: usize = 1 + 20 + CHECKSUM_LEN;

/// A wallet: keypair plus derived address. Immutable after construction.
pub struct Wallet {
    keypair: Keypair,
    address: String,
}

impl Wallet {
    /// Generate a fresh wallet from OS entropy.
    ///
    /// Panics if the entropy source is unavailable (see [`Keypair::generate`]).
    pub fn generate() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Build a wallet around an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        let address = derive_address(keypair.public_key());
        Self { keypair, address }
    }

    /// The keypair backing this wallet.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// The shareable blockchain address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Hex of the uncompressed public key.
    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// Hex of the secret scalar.
    pub fn secret_key_hex(&self) -> String {
        self.keypair.secret_key_hex()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wallet({})", self.address)
    }
}

/// Derive the checksummed address for a public key.
pub fn derive_address(public_key: &PublicKey) -> String {
    let h1 = Sha256::digest(public_key.serialize_uncompressed());
    let h2 = Ripemd160::digest(h1);

    let mut payload = Vec::with_capacity(PAYLOAD_LEN);
    payload.push(ADDRESS_VERSION);
    payload.extend_from_slice(&h2);

    let checksum = Sha256::digest(Sha256::digest(&payload));
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(payload).into_string()
}

/// Decode an address back to the 20-byte public key hash, verifying the
/// version byte and checksum.
pub fn decode_address(address: &str) -> Result<[u8; 20], CoreError> {
    let payload = bs58::decode(address)
        .into_vec()
        .map_err(|e| CoreError::InvalidAddress(e.to_string()))?;

    if payload.len() != PAYLOAD_LEN {
        return Err(CoreError::InvalidAddress(format!(
            "expected {} bytes, got {}",
            PAYLOAD_LEN,
            payload.len()
        )));
    }
    if payload[0] != ADDRESS_VERSION {
        return Err(CoreError::InvalidAddress(format!(
            "unknown version byte 0x{:02x}",
            payload[0]
        )));
    }

    let (versioned, checksum) = payload.split_at(PAYLOAD_LEN - CHECKSUM_LEN);
    let expected = Sha256::digest(Sha256::digest(versioned));
    if checksum != &expected[..CHECKSUM_LEN] {
        return Err(CoreError::InvalidAddress("checksum mismatch".into()));
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&versioned[1..]);
    Ok(hash)
}
