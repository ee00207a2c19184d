//! Native currency descriptors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BlockChainType;

/// The currency a ledger charges fees and holds balances in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
	pub name: String,
	pub symbol: String,
	/// Digits between the whole unit and the smallest on-chain unit
	pub decimals: u8,
}

impl Currency {
	pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
		Self {
			name: name.into(),
			symbol: symbol.into(),
			decimals,
		}
	}

	/// Native currency of `chain`
	pub fn native(chain: &BlockChainType) -> Self {
		match chain {
			BlockChainType::Bitcoin => Self::new("Bitcoin", "BTC", 8),
			BlockChainType::Ethereum => Self::new("Ether", "ETH", 18),
			BlockChainType::Solana => Self::new("Solana", "SOL", 9),
		}
	}

	/// Converts an amount of smallest units (sat, wei, lamports) to whole units
	///
	/// Returns `None` when the result does not fit a `Decimal`.
	pub fn from_base_units(&self, units: Decimal) -> Option<Decimal> {
		units.checked_mul(Decimal::new(1, u32::from(self.decimals)))
	}
}
