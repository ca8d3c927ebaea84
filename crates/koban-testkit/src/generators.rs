//! Proptest strategies for property-based testing.

use proptest::prelude::*;

use koban_core::Transaction;

/// A plausible base58 wallet address (leading version byte renders as '1').
pub fn address() -> impl Strategy<Value = String> {
    "1[1-9A-HJ-NP-Za-km-z]{25,33}"
}

/// An arbitrary transfer payload between two generated addresses.
pub fn transaction() -> impl Strategy<Value = Transaction> {
    (address(), address(), 0u64..1_000_000)
        .prop_map(|(sender, recipient, value)| Transaction::new(sender, recipient, value))
}

/// A nonzero secret-key seed byte (zero is off the curve).
pub fn key_seed() -> impl Strategy<Value = u8> {
    1u8..=255
}
