//! Canonical transaction identity and chain-specific transaction instances.

use serde::{Deserialize, Serialize};

use crate::models::{
	Address, BitcoinTransaction, BlockChainType, EthereumTransaction, SolanaTransaction, TxId,
};

/// What a transaction does, independent of chain vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
	Transfer,
	ContractCall,
	ContractCreation,
	Other(String),
}

/// The 4-tuple every transaction is identified by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionIdentity {
	pub id: TxId,
	pub from: Address,
	pub to: Address,
	pub tx_type: TransactionType,
}

impl TransactionIdentity {
	pub fn new(id: TxId, from: Address, to: Address, tx_type: TransactionType) -> Self {
		Self {
			id,
			from,
			to,
			tx_type,
		}
	}
}

/// A chain-specific transaction carrying the canonical identity
///
/// Two instances compare equal only when they are the same variant, share the
/// 4-tuple and the variant's own extension state matches. Signed payloads never
/// take part in equality or hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionInstance {
	Bitcoin(BitcoinTransaction),
	Ethereum(EthereumTransaction),
	Solana(SolanaTransaction),
}

impl TransactionInstance {
	/// The runtime variant
	pub fn chain_type(&self) -> BlockChainType {
		match self {
			Self::Bitcoin(_) => BlockChainType::Bitcoin,
			Self::Ethereum(_) => BlockChainType::Ethereum,
			Self::Solana(_) => BlockChainType::Solana,
		}
	}

	pub fn identity(&self) -> &TransactionIdentity {
		match self {
			Self::Bitcoin(tx) => tx.identity(),
			Self::Ethereum(tx) => tx.identity(),
			Self::Solana(tx) => tx.identity(),
		}
	}

	pub fn is_signed(&self) -> bool {
		match self {
			Self::Bitcoin(tx) => tx.is_signed(),
			Self::Ethereum(tx) => tx.is_signed(),
			Self::Solana(tx) => tx.is_signed(),
		}
	}

	/// Serialized signed transaction in the chain's wire format
	pub fn signed_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bitcoin(tx) => tx.signed_bytes(),
			Self::Ethereum(tx) => tx.signed_bytes(),
			Self::Solana(tx) => tx.signed_bytes(),
		}
	}

	/// Key under which the identity store buckets this instance
	pub fn key(&self) -> TransactionKey {
		TransactionKey {
			chain: self.chain_type(),
			identity: self.identity().clone(),
		}
	}
}

impl From<BitcoinTransaction> for TransactionInstance {
	fn from(tx: BitcoinTransaction) -> Self {
		Self::Bitcoin(tx)
	}
}

impl From<EthereumTransaction> for TransactionInstance {
	fn from(tx: EthereumTransaction) -> Self {
		Self::Ethereum(tx)
	}
}

impl From<SolanaTransaction> for TransactionInstance {
	fn from(tx: SolanaTransaction) -> Self {
		Self::Solana(tx)
	}
}

/// Variant tag plus canonical identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionKey {
	pub chain: BlockChainType,
	pub identity: TransactionIdentity,
}
