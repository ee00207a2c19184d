//! Bitcoin (UTXO) specific models.

mod transaction;

pub use transaction::Transaction as BitcoinTransaction;
