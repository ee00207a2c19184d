//! Solana JSON-RPC adapter.
//!
//! Solana addresses blocks by slot only; hash and number lookups are not
//! supported and yield no block. Finality follows the node's commitment
//! levels.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::{
	models::{
		split_signed_transaction, BlockChainType, BlockIdentifier, BlockReadOptions,
		BroadcastOptions, BroadcastResult, ChainHead, FeeIntent, FeeQuote, FeeRequest,
		FinalityPolicy, Health, LedgerBlock, LedgerTransaction, Network, NetworkInfo, NodeVersion,
		PreflightOptions, PreflightResult, SyncStatus, TransactionInstance, TxId, TxReadOptions,
		TxStatus,
	},
	services::blockchain::{
		adapters::{absent_on, call, call_envelope, into_rpc_result},
		transports::{BlockchainTransport, HttpTransportClient},
		AdapterError, CancelSignal, LedgerAdapter,
	},
};

/// Node is behind the cluster
const RPC_NODE_UNHEALTHY: i64 = -32005;
/// Block not available for the slot
const RPC_BLOCK_NOT_AVAILABLE: i64 = -32004;
/// Slot was skipped or is missing due to a ledger jump
const RPC_SLOT_SKIPPED: i64 = -32007;
/// Slot is missing from long-term storage
const RPC_LONG_TERM_STORAGE_SLOT_SKIPPED: i64 = -32009;
/// Malformed parameters, such as an undecodable signature
const RPC_INVALID_PARAMS: i64 = -32602;

const ABSENT_BLOCK_CODES: [i64; 3] = [
	RPC_BLOCK_NOT_AVAILABLE,
	RPC_SLOT_SKIPPED,
	RPC_LONG_TERM_STORAGE_SLOT_SKIPPED,
];

/// Fee charged per signature absent a custom fee-rate governor
const LAMPORTS_PER_SIGNATURE: u64 = 5_000;
/// Compute units assumed when pricing a transaction that was not supplied
const DEFAULT_COMPUTE_UNITS: u64 = 200_000;
const MICRO_LAMPORTS_PER_LAMPORT: u64 = 1_000_000;

const MAINNET_BETA_GENESIS: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";
const DEVNET_GENESIS: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG";
const TESTNET_GENESIS: &str = "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3zQawwpjk2NsNY";

/// Adapter for Solana JSON-RPC nodes
#[derive(Clone, Debug)]
pub struct SolanaAdapter<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	transport: T,
	finality: FinalityPolicy,
}

impl<T: Send + Sync + Clone> SolanaAdapter<T> {
	/// Creates a new Solana adapter with a specific transport
	pub fn new_with_transport(transport: T, finality: FinalityPolicy) -> Self {
		Self {
			transport,
			finality,
		}
	}
}

impl SolanaAdapter<HttpTransportClient> {
	/// Creates a new Solana adapter connected over HTTP
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC endpoints
	pub async fn new(network: &Network) -> Result<Self, anyhow::Error> {
		let transport = HttpTransportClient::new(network).await?;
		Ok(Self::new_with_transport(transport, network.finality_policy()))
	}
}

fn cluster_name(genesis_hash: &str) -> Option<&'static str> {
	match genesis_hash {
		MAINNET_BETA_GENESIS => Some("mainnet-beta"),
		DEVNET_GENESIS => Some("devnet"),
		TESTNET_GENESIS => Some("testnet"),
		_ => None,
	}
}

/// Picks a prioritization fee (micro-lamports per CU) for the intent
fn prioritization_fee(mut fees: Vec<u64>, intent: FeeIntent) -> u64 {
	if fees.is_empty() {
		return 0;
	}
	fees.sort_unstable();
	let index = match intent {
		FeeIntent::BroadcastCheap => 0,
		FeeIntent::Unknown => fees.len() / 2,
		FeeIntent::BroadcastSoon => (fees.len() * 3) / 4,
	};
	fees[index.min(fees.len() - 1)]
}

/// Base signature fee plus priority for the default compute budget, in lamports
fn lamports_for_priority(micro_lamports_per_cu: u64) -> u64 {
	let priority = (u128::from(micro_lamports_per_cu) * u128::from(DEFAULT_COMPUTE_UNITS))
		.div_ceil(u128::from(MICRO_LAMPORTS_PER_LAMPORT));
	LAMPORTS_PER_SIGNATURE.saturating_add(u64::try_from(priority).unwrap_or(u64::MAX))
}

fn strategy_label(intent: FeeIntent) -> &'static str {
	match intent {
		FeeIntent::BroadcastCheap => "recent-prioritization-fees:min",
		FeeIntent::Unknown => "recent-prioritization-fees:median",
		FeeIntent::BroadcastSoon => "recent-prioritization-fees:p75",
	}
}

/// Signature status entry from `getSignatureStatuses`, `None` when unknown
fn first_status(result: &Value) -> Option<&Value> {
	result
		.get("value")
		.and_then(Value::as_array)
		.and_then(|statuses| statuses.first())
		.filter(|status| !status.is_null())
}

/// A node's report that it lags the cluster
struct Behind {
	message: String,
	/// The JSON-RPC error object, or the unexpected health result
	raw: Value,
}

impl<T: Send + Sync + Clone + BlockchainTransport> SolanaAdapter<T> {
	/// `getHealth`, with "behind" kept apart from other failures
	///
	/// Returns `Ok(None)` when healthy and `Ok(Some(behind))` when the node
	/// reports itself behind the cluster.
	async fn behind(&self, cancel: &CancelSignal) -> Result<Option<Behind>, AdapterError> {
		let response = call_envelope(&self.transport, "getHealth", json!([]), cancel).await?;

		let unhealthy = response
			.get("error")
			.filter(|error| error.get("code").and_then(Value::as_i64) == Some(RPC_NODE_UNHEALTHY));
		if let Some(error) = unhealthy {
			let message = error
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("node is behind")
				.to_owned();
			return Ok(Some(Behind {
				message,
				raw: error.clone(),
			}));
		}

		match into_rpc_result(response)? {
			Value::String(status) if status == "ok" => Ok(None),
			other => Ok(Some(Behind {
				message: format!("node reported health {}", other),
				raw: other,
			})),
		}
	}

	async fn fee_for_message(
		&self,
		signed_transaction: &[u8],
		cancel: &CancelSignal,
	) -> Result<FeeQuote, AdapterError> {
		let (_, message) = split_signed_transaction(signed_transaction)
			.ok_or_else(|| AdapterError::invalid_input("malformed Solana transaction"))?;

		let raw = call(
			&self.transport,
			"getFeeForMessage",
			json!([STANDARD.encode(message), {"commitment": "processed"}]),
			cancel,
		)
		.await?;

		// A null value means the message's blockhash has expired
		let value = raw.get("value").and_then(Value::as_u64).map(Decimal::from);

		Ok(FeeQuote {
			unit: Some("lamports".to_string()),
			value,
			strategy: Some("getFeeForMessage".to_string()),
			raw: Some(raw),
		})
	}

	async fn fee_from_recent_prioritization(
		&self,
		intent: FeeIntent,
		cancel: &CancelSignal,
	) -> Result<FeeQuote, AdapterError> {
		let raw = call(
			&self.transport,
			"getRecentPrioritizationFees",
			json!([]),
			cancel,
		)
		.await?;

		let fees = raw
			.as_array()
			.map(|entries| {
				entries
					.iter()
					.filter_map(|entry| entry.get("prioritizationFee").and_then(Value::as_u64))
					.collect()
			})
			.unwrap_or_default();

		let lamports = lamports_for_priority(prioritization_fee(fees, intent));

		Ok(FeeQuote {
			unit: Some("lamports".to_string()),
			value: Some(Decimal::from(lamports)),
			strategy: Some(strategy_label(intent).to_string()),
			raw: Some(raw),
		})
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> LedgerAdapter for SolanaAdapter<T> {
	fn chain_type(&self) -> BlockChainType {
		BlockChainType::Solana
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_health(&self, cancel: &CancelSignal) -> Result<Health, AdapterError> {
		match self.behind(cancel).await {
			Ok(None) => Ok(Health::healthy("ok")),
			Ok(Some(behind)) => Ok(Health::unhealthy(behind.message)),
			Err(AdapterError::Cancelled) => Err(AdapterError::Cancelled),
			Err(e) => Ok(Health::unhealthy(e.to_string())),
		}
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_version(&self, cancel: &CancelSignal) -> Result<NodeVersion, AdapterError> {
		let raw = call(&self.transport, "getVersion", json!([]), cancel).await?;
		let client_version = raw
			.get("solana-core")
			.and_then(Value::as_str)
			.map(str::to_owned);

		Ok(NodeVersion {
			client_name: client_version.as_ref().map(|_| "solana-core".to_string()),
			client_version,
			raw: Some(raw),
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_network_info(&self, cancel: &CancelSignal) -> Result<NetworkInfo, AdapterError> {
		let raw = call(&self.transport, "getGenesisHash", json!([]), cancel).await?;
		let genesis = raw
			.as_str()
			.ok_or_else(|| AdapterError::decode("getGenesisHash returned a non-string"))?;

		Ok(NetworkInfo {
			network_name: cluster_name(genesis).map(str::to_owned),
			chain_id: None,
			genesis_id: Some(genesis.to_string()),
			raw: Some(raw),
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_sync_status(&self, cancel: &CancelSignal) -> Result<SyncStatus, AdapterError> {
		Ok(match self.behind(cancel).await? {
			None => SyncStatus::new(true, None, Some("synced".to_string())),
			Some(behind) => {
				SyncStatus::new(false, None, Some("behind".to_string())).with_raw(behind.raw)
			}
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_head(&self, cancel: &CancelSignal) -> Result<ChainHead, AdapterError> {
		let commitment = json!([{"commitment": "finalized"}]);
		let latest = call(
			&self.transport,
			"getLatestBlockhash",
			commitment.clone(),
			cancel,
		)
		.await?;
		let height = call(&self.transport, "getBlockHeight", commitment, cancel).await?;

		Ok(ChainHead {
			height_like: height.as_i64(),
			slot_like: latest.pointer("/context/slot").and_then(Value::as_i64),
			head_id: latest
				.pointer("/value/blockhash")
				.and_then(Value::as_str)
				.map(str::to_owned),
			finality_hint: Some("finalized".to_string()),
			raw: Some(latest),
		})
	}

	#[instrument(level = "debug", skip(self, cancel))]
	async fn get_block(
		&self,
		id: &BlockIdentifier,
		options: BlockReadOptions,
		cancel: &CancelSignal,
	) -> Result<Option<LedgerBlock>, AdapterError> {
		let slot = match id {
			BlockIdentifier::BySlot(slot) if *slot >= 0 => *slot,
			BlockIdentifier::BySlot(_) => return Ok(None),
			BlockIdentifier::ByHash(_) | BlockIdentifier::ByNumber(_) => return Ok(None),
		};

		let details = if !options.wants_transactions() {
			"none"
		} else {
			"signatures"
		};
		let result = call(
			&self.transport,
			"getBlock",
			json!([slot, {
				"encoding": "json",
				"transactionDetails": details,
				"rewards": false,
				"maxSupportedTransactionVersion": 0
			}]),
			cancel,
		)
		.await;

		let Some(raw) = absent_on(result, &ABSENT_BLOCK_CODES)? else {
			return Ok(None);
		};

		let transactions = if !options.wants_transactions() {
			None
		} else {
			raw.get("signatures").and_then(Value::as_array).map(|sigs| {
				sigs.iter()
					.filter_map(Value::as_str)
					.map(TxId::from)
					.collect()
			})
		};

		Ok(Some(LedgerBlock {
			canonical_id: id.clone(),
			hash: raw.get("blockhash").and_then(Value::as_str).map(str::to_owned),
			number_or_height: raw.get("blockHeight").and_then(Value::as_i64),
			slot: Some(slot),
			time: raw
				.get("blockTime")
				.and_then(Value::as_i64)
				.and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
			transactions,
			raw: Some(raw),
		}))
	}

	#[instrument(level = "debug", skip(self, cancel))]
	async fn get_transaction(
		&self,
		id: &TxId,
		options: TxReadOptions,
		cancel: &CancelSignal,
	) -> Result<Option<LedgerTransaction>, AdapterError> {
		let result = call(
			&self.transport,
			"getTransaction",
			json!([id.as_str(), {
				"encoding": "base64",
				"maxSupportedTransactionVersion": 0
			}]),
			cancel,
		)
		.await;

		let Some(raw) = absent_on(result, &[])? else {
			return Ok(None);
		};

		// base64 encoding returns `[payload, "base64"]`
		let raw_bytes = raw
			.pointer("/transaction/0")
			.and_then(Value::as_str)
			.filter(|_| options.include_raw)
			.map(|encoded| {
				STANDARD
					.decode(encoded)
					.map_err(|e| AdapterError::decode(format!("Invalid base64 transaction: {}", e)))
			})
			.transpose()?;

		Ok(Some(LedgerTransaction {
			id: id.clone(),
			raw_bytes,
			raw: Some(raw),
		}))
	}

	#[instrument(level = "debug", skip(self, cancel))]
	async fn get_transaction_status(
		&self,
		id: &TxId,
		cancel: &CancelSignal,
	) -> Result<TxStatus, AdapterError> {
		let result = call(
			&self.transport,
			"getSignatureStatuses",
			json!([[id.as_str()], {"searchTransactionHistory": true}]),
			cancel,
		)
		.await;

		let Some(raw) = absent_on(result, &[RPC_INVALID_PARAMS])? else {
			return Ok(TxStatus::unknown());
		};
		let Some(status) = first_status(&raw) else {
			return Ok(TxStatus::unknown());
		};

		let commitment = status.get("confirmationStatus").and_then(Value::as_str);
		let finalized = commitment == Some("finalized");
		// `confirmations` is null once the slot is rooted
		let confirmations = status.get("confirmations").and_then(Value::as_u64);

		let is_final = match self.finality {
			FinalityPolicy::Finalized => finalized,
			FinalityPolicy::Confirmations(_) => {
				finalized || confirmations.is_some_and(|n| self.finality.is_deep_enough(n))
			}
		};

		let failed = status.get("err").is_some_and(|err| !err.is_null());
		let state = if failed {
			Some("failed".to_string())
		} else {
			commitment.map(str::to_owned)
		};

		Ok(TxStatus {
			is_known: true,
			is_final,
			confirmations_like: confirmations.and_then(|n| i64::try_from(n).ok()),
			state,
			raw: Some(raw),
		})
	}

	#[instrument(level = "debug", skip(self, tx, cancel))]
	async fn broadcast_signed_transaction(
		&self,
		tx: &TransactionInstance,
		options: BroadcastOptions,
		cancel: &CancelSignal,
	) -> Result<BroadcastResult, AdapterError> {
		if tx.chain_type() != BlockChainType::Solana {
			return Err(AdapterError::invalid_input(format!(
				"cannot broadcast a {} transaction to a solana node",
				tx.chain_type()
			)));
		}
		let bytes = match tx.signed_bytes() {
			Some(bytes) if tx.is_signed() => bytes,
			_ => return Err(AdapterError::invalid_input("transaction is not signed")),
		};

		let mut config = Map::new();
		config.insert("encoding".into(), json!("base64"));
		config.insert("skipPreflight".into(), json!(options.skip_preflight));
		// Retries are the node's business; the adapter only forwards the limit
		if let Some(max_retries) = options.max_retries {
			config.insert("maxRetries".into(), json!(max_retries));
		}

		match call(
			&self.transport,
			"sendTransaction",
			json!([STANDARD.encode(bytes), config]),
			cancel,
		)
		.await
		{
			Ok(raw) => {
				let tx_id = raw.as_str().map(TxId::new);
				match tx_id {
					Some(tx_id) => Ok(BroadcastResult::accepted(tx_id, Some(raw))),
					None => Ok(BroadcastResult::rejected(
						"node returned no signature",
						Some(raw),
					)),
				}
			}
			Err(AdapterError::Cancelled) => Err(AdapterError::Cancelled),
			Err(e) => Ok(BroadcastResult::rejected(e.to_string(), None)),
		}
	}

	#[instrument(level = "debug", skip(self, cancel))]
	async fn estimate_fees(
		&self,
		request: &FeeRequest,
		cancel: &CancelSignal,
	) -> Result<FeeQuote, AdapterError> {
		match &request.signed_transaction {
			Some(signed_transaction) => self.fee_for_message(signed_transaction, cancel).await,
			None => {
				self.fee_from_recent_prioritization(request.intent, cancel)
					.await
			}
		}
	}

	#[instrument(level = "debug", skip_all)]
	async fn preflight_signed_transaction(
		&self,
		signed_transaction: &[u8],
		options: PreflightOptions,
		cancel: &CancelSignal,
	) -> Result<PreflightResult, AdapterError> {
		if signed_transaction.is_empty() {
			return Err(AdapterError::invalid_input("signed transaction is empty"));
		}

		let raw = match call(
			&self.transport,
			"simulateTransaction",
			json!([STANDARD.encode(signed_transaction), {
				"encoding": "base64",
				"sigVerify": true,
				"commitment": "processed"
			}]),
			cancel,
		)
		.await
		{
			Ok(raw) => raw,
			Err(AdapterError::Cancelled) => return Err(AdapterError::Cancelled),
			Err(AdapterError::Rpc { message, .. }) => {
				return Ok(PreflightResult::failure(message, None))
			}
			Err(e) => return Ok(PreflightResult::failure(e.to_string(), None)),
		};

		let details = options.include_details.then(|| raw.clone());
		match raw.pointer("/value/err") {
			None | Some(Value::Null) => Ok(PreflightResult::success(details)),
			Some(err) => Ok(PreflightResult::failure(err.to_string(), details)),
		}
	}
}
