//! Transfers: the signed payload, the peer-facing wire record, and the
//! reward/signed classification.
//!
//! The signed payload is always the canonical encoding of the three core
//! fields; the public key and signature ride alongside on the wire but are
//! never part of the preimage.

use serde::{Deserialize, Serialize};

use crate::canonical::hash_canonical;
use crate::crypto::{verify_signature, Keypair, Sha256Hash};
use crate::error::CoreError;

/// The three-field transfer payload committed into blocks.
///
/// Field names are the wire names; they double as the canonical JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender_blockchain_address: String,
    pub recipient_blockchain_address: String,
    pub value: u64,
}

impl Transaction {
    pub fn new(
        sender_blockchain_address: impl Into<String>,
        recipient_blockchain_address: impl Into<String>,
        value: u64,
    ) -> Self {
        Self {
            sender_blockchain_address: sender_blockchain_address.into(),
            recipient_blockchain_address: recipient_blockchain_address.into(),
            value,
        }
    }

    /// The digest that gets signed: SHA-256 of the canonical payload.
    pub fn signing_digest(&self) -> Result<Sha256Hash, CoreError> {
        hash_canonical(self)
    }
}

/// The peer-facing transfer record.
///
/// `sender_public_key` and `signature` are required unless the sender is
/// the reserved mining sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub sender_blockchain_address: String,
    pub recipient_blockchain_address: String,
    pub value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl TransactionRecord {
    /// Split the record into its payload and credentials.
    fn into_parts(self) -> (Transaction, Option<String>, Option<String>) {
        let transaction = Transaction {
            sender_blockchain_address: self.sender_blockchain_address,
            recipient_blockchain_address: self.recipient_blockchain_address,
            value: self.value,
        };
        (transaction, self.sender_public_key, self.signature)
    }

    /// Classify a wire record against the reserved mining sender.
    ///
    /// The reward path deliberately carries no credentials and bypasses
    /// signature verification; it is a trust boundary, not a security
    /// check. A non-reward record without both credentials is malformed.
    pub fn classify(self, mining_sender: &str) -> Result<Transfer, CoreError> {
        let is_reward = self.sender_blockchain_address == mining_sender;
        let (transaction, public_key, signature) = self.into_parts();

        if is_reward {
            return Ok(Transfer::Reward(transaction));
        }
        match (public_key, signature) {
            (Some(sender_public_key), Some(signature)) => Ok(Transfer::Signed {
                transaction,
                sender_public_key,
                signature,
            }),
            (None, _) => Err(CoreError::MalformedTransfer(
                "missing sender_public_key".into(),
            )),
            (_, None) => Err(CoreError::MalformedTransfer("missing signature".into())),
        }
    }
}

/// A classified transfer.
///
/// The reserved-sender bypass is an explicit variant so it can never be
/// mistaken for a verified transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Mining reward; exempt from signature verification.
    Reward(Transaction),
    /// Ordinary transfer; must verify before entering the pool.
    Signed {
        transaction: Transaction,
        sender_public_key: String,
        signature: String,
    },
}

impl Transfer {
    /// The payload that would be committed into a block.
    pub fn transaction(&self) -> &Transaction {
        match self {
            Transfer::Reward(transaction) => transaction,
            Transfer::Signed { transaction, .. } => transaction,
        }
    }
}

/// Sign a transfer payload with the sender's keypair.
///
/// The produced signature is immediately self-verified against the
/// sender's own public key; a mismatch fails with [`CoreError::Signing`]
/// rather than emitting an unverifiable signature.
pub fn sign_transfer(transaction: &Transaction, keypair: &Keypair) -> Result<String, CoreError> {
    let digest = transaction.signing_digest()?;
    let signature = keypair.sign_digest(&digest).to_hex();

    if !verify_signature(&signature, &digest, &keypair.public_key_hex()) {
        return Err(CoreError::Signing);
    }
    Ok(signature)
}

/// Build a complete signed wire record for a transfer.
pub fn signed_record(
    transaction: Transaction,
    keypair: &Keypair,
) -> Result<TransactionRecord, CoreError> {
    let signature = sign_transfer(&transaction, keypair)?;
    Ok(TransactionRecord {
        sender_blockchain_address: transaction.sender_blockchain_address,
        recipient_blockchain_address: transaction.recipient_blockchain_address,
        value: transaction.value,
        sender_public_key: Some(keypair.public_key_hex()),
        signature: Some(signature),
    })
}
