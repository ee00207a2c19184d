//! Ethereum (account) specific models.

mod transaction;

pub use transaction::Transaction as EthereumTransaction;
