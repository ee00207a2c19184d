//! Tagged block identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a block on one of the three addressing axes
///
/// Bitcoin and Ethereum address blocks by hash or height, Solana by slot. An
/// adapter receiving a variant its chain does not address by returns no block
/// rather than reinterpreting the value on another axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BlockIdentifier {
	/// Content hash of the block
	ByHash(String),
	/// Monotonic block height
	ByNumber(i64),
	/// Monotonic slot index
	BySlot(i64),
}

impl BlockIdentifier {
	pub fn by_hash(hash: impl Into<String>) -> Self {
		Self::ByHash(hash.into())
	}

	pub fn by_number(number: i64) -> Self {
		Self::ByNumber(number)
	}

	pub fn by_slot(slot: i64) -> Self {
		Self::BySlot(slot)
	}
}

impl fmt::Display for BlockIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ByHash(hash) => write!(f, "hash:{}", hash),
			Self::ByNumber(number) => write!(f, "number:{}", number),
			Self::BySlot(slot) => write!(f, "slot:{}", slot),
		}
	}
}
