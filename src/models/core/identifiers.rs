//! Chain-agnostic identifier values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque participant identifier
///
/// No format validation happens at this layer; a Bitcoin address, a hex EVM
/// address and a base58 Solana public key are all just strings here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Address {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for Address {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Chain-native transaction identifier (txid, transaction hash or signature)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}

impl fmt::Display for TxId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TxId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for TxId {
	fn from(value: String) -> Self {
		Self(value)
	}
}
