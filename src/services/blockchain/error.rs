//! Adapter error types and handling.
//!
//! Faults raised by ledger adapters. Chain failures that fit a negative-result
//! field (health, broadcast, preflight) never reach this type; everything else
//! is reported here and nowhere else.

use thiserror::Error;

use crate::services::blockchain::transports::TransportError;

/// Represents possible faults of a ledger adapter operation
#[derive(Debug, Error)]
pub enum AdapterError {
	/// The caller passed something the adapter refuses before any network call
	#[error("Invalid input: {0}")]
	InvalidInput(String),

	/// The request did not make it to the node or back
	#[error("Transport error: {0}")]
	Transport(#[from] TransportError),

	/// The node answered with a JSON-RPC error object
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	/// The node answered with something the adapter could not interpret
	#[error("Decode error: {0}")]
	Decode(String),

	/// The caller cancelled the operation
	#[error("Operation cancelled")]
	Cancelled,
}

impl AdapterError {
	pub fn invalid_input(msg: impl Into<String>) -> Self {
		Self::InvalidInput(msg.into())
	}

	pub fn rpc(code: i64, message: impl Into<String>) -> Self {
		Self::Rpc {
			code,
			message: message.into(),
		}
	}

	pub fn decode(msg: impl Into<String>) -> Self {
		Self::Decode(msg.into())
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}

	pub fn is_input_error(&self) -> bool {
		matches!(self, Self::InvalidInput(_))
	}

	/// JSON-RPC error code, when the node returned one
	pub fn rpc_code(&self) -> Option<i64> {
		match self {
			Self::Rpc { code, .. } => Some(*code),
			_ => None,
		}
	}
}
