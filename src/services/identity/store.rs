//! In-memory transaction identity store.
//!
//! Instances are bucketed by [`TransactionKey`]. Within a bucket, instances
//! that differ only in their chain-specific extension state (an Ethereum
//! nonce, a Solana blockhash) get their own slot, so the returned
//! [`TransactionRef`] identifies exactly one equality class. Entries are never
//! removed.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{TransactionInstance, TransactionKey};

/// Identity handed out by [`TransactionStore::add`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRef {
	pub key: TransactionKey,
	/// Position within the key's bucket
	pub ordinal: usize,
}

/// Concurrent, append-only transaction identity store
#[derive(Debug, Default)]
pub struct TransactionStore {
	entries: RwLock<HashMap<TransactionKey, Vec<Arc<TransactionInstance>>>>,
}

impl TransactionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an instance and returns its identity
	///
	/// When an equal instance is already stored, its identity is returned and
	/// the store is left unchanged. Concurrent adds of equal instances all
	/// observe the same identity.
	pub async fn add(&self, instance: TransactionInstance) -> TransactionRef {
		let key = instance.key();

		// Fast path: already observed
		if let Some(ordinal) = Self::position(&*self.entries.read().await, &key, &instance) {
			return TransactionRef { key, ordinal };
		}

		// Slow path: re-check under the write lock before inserting
		let mut entries = self.entries.write().await;
		if let Some(ordinal) = Self::position(&entries, &key, &instance) {
			return TransactionRef { key, ordinal };
		}

		let bucket = entries.entry(key.clone()).or_default();
		bucket.push(Arc::new(instance));
		TransactionRef {
			key,
			ordinal: bucket.len() - 1,
		}
	}

	/// The instance stored under `reference`
	pub async fn get(&self, reference: &TransactionRef) -> Option<Arc<TransactionInstance>> {
		self.entries
			.read()
			.await
			.get(&reference.key)
			.and_then(|bucket| bucket.get(reference.ordinal))
			.cloned()
	}

	/// Identity of an equal stored instance, without inserting
	pub async fn find(&self, instance: &TransactionInstance) -> Option<TransactionRef> {
		let key = instance.key();
		let ordinal = Self::position(&*self.entries.read().await, &key, instance)?;
		Some(TransactionRef { key, ordinal })
	}

	/// Number of distinct instances stored
	pub async fn len(&self) -> usize {
		self.entries.read().await.values().map(Vec::len).sum()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}

	fn position(
		entries: &HashMap<TransactionKey, Vec<Arc<TransactionInstance>>>,
		key: &TransactionKey,
		instance: &TransactionInstance,
	) -> Option<usize> {
		entries
			.get(key)?
			.iter()
			.position(|stored| stored.as_ref() == instance)
	}
}
