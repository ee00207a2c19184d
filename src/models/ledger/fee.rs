//! Fee request and quote DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller preference between fast inclusion and low cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeeIntent {
	#[default]
	Unknown,
	BroadcastSoon,
	BroadcastCheap,
}

/// Fee estimation input
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeRequest {
	pub intent: FeeIntent,
	/// Signed transaction for chains that price a concrete message
	pub signed_transaction: Option<Vec<u8>>,
	/// Explicit confirmation target for chains that estimate by target
	pub target_confirmations: Option<u32>,
}

impl FeeRequest {
	pub fn with_intent(intent: FeeIntent) -> Self {
		Self {
			intent,
			..Default::default()
		}
	}
}

/// Fee estimate in the chain's own unit
///
/// `unit` is free-form ("sat/vB", "wei", "lamports"); units are not
/// normalized across chains.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeQuote {
	pub unit: Option<String>,
	pub value: Option<Decimal>,
	pub strategy: Option<String>,
	pub raw: Option<Value>,
}
