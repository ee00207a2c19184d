//! Broadcast and preflight DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::TxId;

/// Options for broadcasting a signed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BroadcastOptions {
	/// Ask the node to skip its own simulation before forwarding
	pub skip_preflight: bool,
	/// Rebroadcast budget handed to nodes that manage it themselves
	pub max_retries: Option<u32>,
}

/// Outcome of a broadcast
///
/// `accepted` reflects node acceptance, not confirmation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BroadcastResult {
	pub accepted: bool,
	pub tx_id: Option<TxId>,
	pub error: Option<String>,
	pub raw: Option<Value>,
}

impl BroadcastResult {
	pub fn accepted(tx_id: TxId, raw: Option<Value>) -> Self {
		Self {
			accepted: true,
			tx_id: Some(tx_id),
			error: None,
			raw,
		}
	}

	pub fn rejected(error: impl Into<String>, raw: Option<Value>) -> Self {
		Self {
			accepted: false,
			tx_id: None,
			error: Some(error.into()),
			raw,
		}
	}
}

/// Options for transaction simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreflightOptions {
	/// Keep the node's simulation details in `raw`
	pub include_details: bool,
}

impl Default for PreflightOptions {
	fn default() -> Self {
		Self {
			include_details: true,
		}
	}
}

/// Advisory simulation outcome
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreflightResult {
	pub would_likely_succeed: bool,
	pub reason: Option<String>,
	pub raw: Option<Value>,
}

impl PreflightResult {
	pub fn success(raw: Option<Value>) -> Self {
		Self {
			would_likely_succeed: true,
			reason: None,
			raw,
		}
	}

	pub fn failure(reason: impl Into<String>, raw: Option<Value>) -> Self {
		Self {
			would_likely_succeed: false,
			reason: Some(reason.into()),
			raw,
		}
	}
}
