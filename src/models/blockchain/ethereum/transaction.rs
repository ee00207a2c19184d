//! Ethereum transaction instance.

use std::hash::{Hash, Hasher};

use crate::models::TransactionIdentity;

/// Ethereum transaction carrying its canonical identity
///
/// Equality additionally requires the same nonce and chain id, so a replay of
/// the same transfer on another chain or with another nonce is a different
/// transaction.
#[derive(Debug, Clone)]
pub struct Transaction {
	identity: TransactionIdentity,
	nonce: u64,
	chain_id: Option<u64>,
	signed_bytes: Option<Vec<u8>>,
}

impl Transaction {
	pub fn new(identity: TransactionIdentity, nonce: u64, chain_id: Option<u64>) -> Self {
		Self {
			identity,
			nonce,
			chain_id,
			signed_bytes: None,
		}
	}

	/// Attaches the EIP-2718 encoded signed envelope
	pub fn with_signed_bytes(mut self, bytes: Vec<u8>) -> Self {
		self.signed_bytes = Some(bytes);
		self
	}

	pub fn identity(&self) -> &TransactionIdentity {
		&self.identity
	}

	pub fn nonce(&self) -> u64 {
		self.nonce
	}

	pub fn chain_id(&self) -> Option<u64> {
		self.chain_id
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
			&& self.nonce == other.nonce
			&& self.chain_id == other.chain_id
	}
}

impl Eq for Transaction {}

impl Hash for Transaction {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity.hash(state);
		self.nonce.hash(state);
		self.chain_id.hash(state);
	}
}
