//! Solana (slot) specific models, including the transaction wire layout.

mod transaction;
mod wire;

pub use transaction::Transaction as SolanaTransaction;
pub use wire::{decode_short_u16, split_signed_transaction, SIGNATURE_LENGTH};
