//! Node-level DTOs: health, version, network identity, sync state and head.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node liveness
///
/// Describes whether the node answers and considers itself caught up, not
/// whether the protocol as a whole is healthy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Health {
	pub is_healthy: bool,
	pub message: Option<String>,
}

impl Health {
	pub fn healthy(message: impl Into<String>) -> Self {
		Self {
			is_healthy: true,
			message: Some(message.into()),
		}
	}

	pub fn unhealthy(message: impl Into<String>) -> Self {
		Self {
			is_healthy: false,
			message: Some(message.into()),
		}
	}
}

/// Best-effort identification of the node software
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeVersion {
	pub client_name: Option<String>,
	pub client_version: Option<String>,
	pub raw: Option<Value>,
}

/// Chain identity, limited to what the source chain exposes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkInfo {
	pub network_name: Option<String>,
	pub chain_id: Option<String>,
	pub genesis_id: Option<String>,
	pub raw: Option<Value>,
}

/// Catch-up state of the node
///
/// An absent `progress` means unknown, not zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyncStatus {
	pub is_synced: bool,
	pub progress: Option<f64>,
	pub stage: Option<String>,
	pub raw: Option<Value>,
}

impl SyncStatus {
	/// Builds a status with `progress` clamped into `0.0..=1.0`
	///
	/// Non-finite progress values are dropped.
	pub fn new(is_synced: bool, progress: Option<f64>, stage: Option<String>) -> Self {
		Self {
			is_synced,
			progress: progress
				.filter(|p| p.is_finite())
				.map(|p| p.clamp(0.0, 1.0)),
			stage,
			raw: None,
		}
	}

	pub fn with_raw(mut self, raw: Value) -> Self {
		self.raw = Some(raw);
		self
	}
}

/// Current chain tip
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChainHead {
	/// Block height (Bitcoin height, Ethereum block number, Solana block height)
	pub height_like: Option<i64>,
	/// Slot index on slot chains
	pub slot_like: Option<i64>,
	/// Tip hash or blockhash
	pub head_id: Option<String>,
	/// Commitment or tag the tip was read at
	pub finality_hint: Option<String>,
	pub raw: Option<Value>,
}

impl ChainHead {
	/// A head is usable when it locates the tip on at least one axis
	pub fn is_valid(&self) -> bool {
		self.height_like.is_some() || self.slot_like.is_some() || self.head_id.is_some()
	}
}
