//! Block DTO and read options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{BlockIdentifier, TxId};

/// Options for block lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockReadOptions {
	/// Fetch only the header; implies no transactions
	pub header_only: bool,
	/// Populate `transactions` when the full block is read
	pub include_transactions: bool,
}

impl Default for BlockReadOptions {
	fn default() -> Self {
		Self {
			header_only: false,
			include_transactions: true,
		}
	}
}

impl BlockReadOptions {
	pub fn header_only() -> Self {
		Self {
			header_only: true,
			..Self::default()
		}
	}

	/// Full block body without the transaction list
	pub fn without_transactions() -> Self {
		Self {
			include_transactions: false,
			..Self::default()
		}
	}

	/// Whether `transactions` should be populated
	pub fn wants_transactions(&self) -> bool {
		!self.header_only && self.include_transactions
	}
}

/// A block as seen through the common contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerBlock {
	/// The identifier the caller looked the block up by
	pub canonical_id: BlockIdentifier,
	pub hash: Option<String>,
	pub number_or_height: Option<i64>,
	pub slot: Option<i64>,
	pub time: Option<DateTime<Utc>>,
	pub transactions: Option<Vec<TxId>>,
	pub raw: Option<Value>,
}
