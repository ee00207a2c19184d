//! Blockchain-specific model implementations.
//!
//! This module contains the chain-specific transaction instances for each
//! supported ledger model (UTXO, account, slot). Each instance carries the
//! canonical transaction identity plus the extension state its chain needs.

use serde::{Deserialize, Serialize};

pub mod bitcoin;
pub mod ethereum;
pub mod solana;

/// Supported blockchain platform types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlockChainType {
	/// UTXO ledger served by a Bitcoin Core compatible node
	Bitcoin,
	/// Account ledger served by an Ethereum JSON-RPC node
	Ethereum,
	/// Slot ledger served by a Solana JSON-RPC node
	Solana,
}

impl std::fmt::Display for BlockChainType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Bitcoin => write!(f, "bitcoin"),
			Self::Ethereum => write!(f, "ethereum"),
			Self::Solana => write!(f, "solana"),
		}
	}
}
