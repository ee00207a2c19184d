use serde::{Deserialize, Serialize};

use crate::models::BlockChainType;

/// Confirmations Bitcoin needs before a transaction is considered final
pub const DEFAULT_BITCOIN_CONFIRMATIONS: u64 = 6;

/// A weighted RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcUrl {
	pub type_: String,
	pub url: String,
	pub weight: u32,
}

/// When a transaction stops being subject to reorganization
///
/// Injected into each adapter at construction. `Confirmations` counts blocks
/// (or Solana confirmations) on top of the including block; `Finalized` defers
/// to the chain's own finalization signal where it exposes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FinalityPolicy {
	Confirmations(u64),
	Finalized,
}

impl FinalityPolicy {
	/// Default policy for a chain
	pub fn default_for(chain: &BlockChainType) -> Self {
		match chain {
			BlockChainType::Bitcoin => Self::Confirmations(DEFAULT_BITCOIN_CONFIRMATIONS),
			BlockChainType::Ethereum | BlockChainType::Solana => Self::Finalized,
		}
	}

	/// Whether `confirmations` satisfies a depth-based policy
	///
	/// Always false for `Finalized`, which callers must resolve against the
	/// chain's finalization signal instead.
	pub fn is_deep_enough(&self, confirmations: u64) -> bool {
		match self {
			Self::Confirmations(required) => confirmations >= *required,
			Self::Finalized => false,
		}
	}
}

/// Connection and policy settings for one ledger network
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Network {
	pub network_type: BlockChainType,
	pub slug: String,
	pub name: String,
	pub rpc_urls: Vec<RpcUrl>,
	#[serde(default)]
	pub chain_id: Option<u64>,
	#[serde(default)]
	pub finality: Option<FinalityPolicy>,
	/// Basic-auth user for Bitcoin Core style endpoints
	#[serde(default)]
	pub rpc_user: Option<String>,
	#[serde(default)]
	pub rpc_password: Option<String>,
	#[serde(default)]
	pub request_timeout_ms: Option<u64>,
}

impl Network {
	/// The configured finality policy, or the chain default
	pub fn finality_policy(&self) -> FinalityPolicy {
		self.finality
			.unwrap_or_else(|| FinalityPolicy::default_for(&self.network_type))
	}
}
