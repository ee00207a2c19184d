//! Bitcoin transaction instance.

use std::hash::{Hash, Hasher};

use crate::models::TransactionIdentity;

/// Bitcoin transaction carrying its canonical identity
///
/// UTXO transactions have no extension state that participates in equality;
/// the txid already commits to inputs and outputs.
#[derive(Debug, Clone)]
pub struct Transaction {
	identity: TransactionIdentity,
	signed_bytes: Option<Vec<u8>>,
}

impl Transaction {
	pub fn new(identity: TransactionIdentity) -> Self {
		Self {
			identity,
			signed_bytes: None,
		}
	}

	/// Attaches the consensus-serialized signed transaction
	pub fn with_signed_bytes(mut self, bytes: Vec<u8>) -> Self {
		self.signed_bytes = Some(bytes);
		self
	}

	pub fn identity(&self) -> &TransactionIdentity {
		&self.identity
	}

	pub fn is_signed(&self) -> bool {
		self.signed_bytes
			.as_ref()
			.is_some_and(|bytes| !bytes.is_empty())
	}

	pub fn signed_bytes(&self) -> Option<&[u8]> {
		self.signed_bytes.as_deref()
	}
}

impl PartialEq for Transaction {
	fn eq(&self, other: &Self) -> bool {
		self.identity == other.identity
	}
}

impl Eq for Transaction {}

impl Hash for Transaction {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity.hash(state);
	}
}
