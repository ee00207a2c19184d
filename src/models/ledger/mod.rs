//! Normalized DTOs every ledger adapter produces.
//!
//! Every field beyond the primary flag or identifier is optional because no two
//! chains populate the same fields. Where a DTO has a `raw` field it carries the
//! untranslated chain response, so callers can always fall back to it.

mod block;
mod fee;
mod node;
mod submission;
mod transaction;

pub use block::{BlockReadOptions, LedgerBlock};
pub use fee::{FeeIntent, FeeQuote, FeeRequest};
pub use node::{ChainHead, Health, NetworkInfo, NodeVersion, SyncStatus};
pub use submission::{BroadcastOptions, BroadcastResult, PreflightOptions, PreflightResult};
pub use transaction::{LedgerTransaction, TxReadOptions, TxStatus};
