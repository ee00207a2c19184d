//! Core domain models shared by every ledger.
//!
//! This module contains the fundamental data structures that represent:
//! - Identifiers: addresses, transaction ids and block identifiers
//! - Currencies: the native unit each ledger settles in
//! - Networks: ledger network definitions, connection details and finality policy
//! - Transactions: the canonical identity tuple and chain-specific instances

mod block_id;
mod currency;
mod identifiers;
mod network;
mod transaction;

pub use block_id::BlockIdentifier;
pub use currency::Currency;
pub use identifiers::{Address, TxId};
pub use network::{FinalityPolicy, Network, RpcUrl, DEFAULT_BITCOIN_CONFIRMATIONS};
pub use transaction::{TransactionIdentity, TransactionInstance, TransactionKey, TransactionType};
