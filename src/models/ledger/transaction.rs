//! Transaction and transaction status DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::TxId;

/// Options for transaction lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxReadOptions {
	/// Populate `raw_bytes`; left `None` otherwise, even when the node sent them
	pub include_raw: bool,
}

/// A transaction as seen through the common contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
	pub id: TxId,
	pub raw_bytes: Option<Vec<u8>>,
	pub raw: Option<Value>,
}

/// Inclusion and finality state of a transaction
///
/// `is_final` means the transaction will not be reorganized under normal
/// operation, judged by the adapter's finality policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TxStatus {
	pub is_known: bool,
	pub is_final: bool,
	pub confirmations_like: Option<i64>,
	pub state: Option<String>,
	pub raw: Option<Value>,
}

impl TxStatus {
	/// Status of a transaction the node has never seen
	pub fn unknown() -> Self {
		Self {
			is_known: false,
			is_final: false,
			confirmations_like: None,
			state: Some("unknown".to_string()),
			raw: None,
		}
	}
}
