//! Solana transaction instance.

use std::hash::{Hash, Hasher};

use crate::models::{blockchain::solana::split_signed_transaction, TransactionIdentity};

/// Solana transaction carrying its canonical identity
///
/// The recent blockhash is part of equality: the same instruction set built
/// against two blockhashes yields two distinct transactions.
#[derive(Debug, Clone)]
pub struct Transaction {
	identity: TransactionIdentity,
	recent_blockhash: String,
	signed_bytes: Option<Vec<u8>>,
}

impl Transaction {
	pub fn new(identity: TransactionIdentity, recent_blockhash: impl Into<String>) -> Self {
		Self {
			identity,
			recent_blockhash: recent_blockhash.into(),
			signed_bytes: None,
		}
	}

	/// Attaches the wire-format transaction (signatures followed by message)
	pub fn with_signed_bytes(mut self, bytes: Vec<u8>) -> Self {
		self.signed_bytes = Some(bytes);
		self
	}

	pub fn identity(&self) -> &TransactionIdentity {
		&self.identity
	}

	pub fn recent_blockhash(&self) -> &str {
		&self.recent_blockhash
	}

	/// True when every required signature slot carries a non-zero signature
	///
	/// Partially signed transactions keep zeroed placeholders for the missing
	/// signers and are reported as unsigned.
	pub fn is_signed(&self) -> bool {
		let Some(bytes) = self.signed_bytes.as_deref() else {
			return false;
		};
		match split_signed_transaction(bytes) {
			Some((signatures, _)) => {
				!signatures.is_empty()
					&& signatures
						.iter()
						.all(|signature| signature.iter().any(|byte| *byte != 0))
			}
			None => false,
		}
	}

	pub fn signed_bytes(&self) -> Option<&[u8]> {
		self.signed_bytes.as_deref()
	}
}

impl PartialEq for Transaction {
	fn eq(&self, other: &Self) -> bool {
		self.identity == other.identity && self.recent_blockhash == other.recent_blockhash
	}
}

impl Eq for Transaction {}

impl Hash for Transaction {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity.hash(state);
		self.recent_blockhash.hash(state);
	}
}
