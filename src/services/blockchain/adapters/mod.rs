//! Chain-specific ledger adapters.
//!
//! - `bitcoin`: Bitcoin Core JSON-RPC (UTXO chain)
//! - `ethereum`: Ethereum JSON-RPC (account chain)
//! - `solana`: Solana JSON-RPC (slot chain)
//!
//! Shared helpers for unwrapping JSON-RPC envelopes and decoding the loosely
//! typed values nodes return live here.

mod bitcoin;
mod ethereum;
mod solana;

pub use bitcoin::BitcoinAdapter;
pub use ethereum::EthereumAdapter;
pub use solana::SolanaAdapter;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::services::blockchain::{transports::BlockchainTransport, AdapterError, CancelSignal};

/// Extracts `result` from a JSON-RPC response envelope
///
/// An `error` object becomes [`AdapterError::Rpc`]; an envelope carrying
/// neither field is a decode error. A `null` result is returned as is.
pub(crate) fn into_rpc_result(mut response: Value) -> Result<Value, AdapterError> {
	if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.map(str::to_owned)
			.unwrap_or_else(|| error.to_string());
		return Err(AdapterError::rpc(code, message));
	}

	match response.get_mut("result") {
		Some(result) => Ok(result.take()),
		None => Err(AdapterError::decode("Missing 'result' field")),
	}
}

/// Sends one JSON-RPC call, racing it against `cancel`
pub(crate) async fn call<T: BlockchainTransport>(
	transport: &T,
	method: &str,
	params: Value,
	cancel: &CancelSignal,
) -> Result<Value, AdapterError> {
	into_rpc_result(call_envelope(transport, method, params, cancel).await?)
}

/// Like [`call`], but hands back the whole envelope, `error` object included
pub(crate) async fn call_envelope<T: BlockchainTransport>(
	transport: &T,
	method: &str,
	params: Value,
	cancel: &CancelSignal,
) -> Result<Value, AdapterError> {
	cancel
		.run(async { Ok(transport.send_raw_request(method, Some(params)).await?) })
		.await
}

/// Maps RPC errors whose code means "no such object" to absence
pub(crate) fn absent_on(
	result: Result<Value, AdapterError>,
	absent_codes: &[i64],
) -> Result<Option<Value>, AdapterError> {
	match result {
		Ok(Value::Null) => Ok(None),
		Ok(value) => Ok(Some(value)),
		Err(AdapterError::Rpc { code, .. }) if absent_codes.contains(&code) => Ok(None),
		Err(e) => Err(e),
	}
}

/// Parses a `0x`-prefixed hex quantity
pub(crate) fn parse_hex_u64(value: &str) -> Result<u64, AdapterError> {
	u64::from_str_radix(value.trim_start_matches("0x"), 16)
		.map_err(|e| AdapterError::decode(format!("Invalid hex quantity '{}': {}", value, e)))
}

/// Parses a `0x`-prefixed hex quantity too large for `u64`
pub(crate) fn parse_hex_u128(value: &str) -> Result<u128, AdapterError> {
	u128::from_str_radix(value.trim_start_matches("0x"), 16)
		.map_err(|e| AdapterError::decode(format!("Invalid hex quantity '{}': {}", value, e)))
}

pub(crate) fn hex_quantity_field(value: &Value, field: &str) -> Result<Option<u64>, AdapterError> {
	match value.get(field).and_then(Value::as_str) {
		Some(quantity) => parse_hex_u64(quantity).map(Some),
		None => Ok(None),
	}
}

/// Decodes a JSON number or numeric string without going through `f64`
pub(crate) fn decimal_from_json(value: &Value) -> Option<Decimal> {
	match value {
		Value::Number(number) => {
			if let Some(n) = number.as_u64() {
				return Some(Decimal::from(n));
			}
			if let Some(n) = number.as_i64() {
				return Some(Decimal::from(n));
			}
			let text = number.to_string();
			Decimal::from_str(&text)
				.or_else(|_| Decimal::from_scientific(&text))
				.ok()
		}
		Value::String(text) => Decimal::from_str(text).ok(),
		_ => None,
	}
}

/// Hex-encodes bytes with a `0x` prefix
pub(crate) fn to_prefixed_hex(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Decodes hex with or without a `0x` prefix
pub(crate) fn from_hex(value: &str) -> Result<Vec<u8>, AdapterError> {
	hex::decode(value.trim_start_matches("0x"))
		.map_err(|e| AdapterError::decode(format!("Invalid hex payload: {}", e)))
}
