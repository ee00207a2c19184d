//! Transaction identity and deduplication.
//!
//! Maps a transaction's canonical identity (chain variant plus 4-tuple) to
//! the richer instance first observed with it.

mod store;

pub use store::{TransactionRef, TransactionStore};
