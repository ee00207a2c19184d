//! Bitcoin Core adapter.
//!
//! Maps Bitcoin Core's JSON-RPC interface onto the common ledger contract.
//! Bitcoin has block heights and hashes but no slots, and finality is purely
//! a matter of confirmation depth.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
	models::{
		BlockChainType, BlockIdentifier, BlockReadOptions, BroadcastOptions, BroadcastResult,
		ChainHead, FeeIntent, FeeQuote, FeeRequest, FinalityPolicy, Health, LedgerBlock,
		LedgerTransaction, Network, NetworkInfo, NodeVersion, PreflightOptions, PreflightResult,
		SyncStatus, TransactionInstance, TxId, TxReadOptions, TxStatus,
		DEFAULT_BITCOIN_CONFIRMATIONS,
	},
	services::blockchain::{
		adapters::{absent_on, call, decimal_from_json, from_hex},
		transports::{BlockchainTransport, HttpTransportClient},
		AdapterError, CancelSignal, LedgerAdapter,
	},
};

/// `RPC_INVALID_ADDRESS_OR_KEY`: unknown block or transaction
const RPC_NOT_FOUND: i64 = -5;
/// `RPC_INVALID_PARAMETER`: height out of range, malformed hash
const RPC_INVALID_PARAMETER: i64 = -8;

const ABSENT_CODES: [i64; 2] = [RPC_NOT_FOUND, RPC_INVALID_PARAMETER];

/// `estimatesmartfee` returns BTC per kvB; 1e8 sat / 1000 vB
const SAT_PER_VB_PER_BTC_PER_KVB: u64 = 100_000;

/// Confirmation targets per fee intent, in blocks
const SOON_TARGET_BLOCKS: u32 = 2;
const DEFAULT_TARGET_BLOCKS: u32 = 6;
const CHEAP_TARGET_BLOCKS: u32 = 144;

/// Adapter for Bitcoin Core compatible nodes
#[derive(Clone, Debug)]
pub struct BitcoinAdapter<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	transport: T,
	finality: FinalityPolicy,
}

impl<T: Send + Sync + Clone> BitcoinAdapter<T> {
	/// Creates a new Bitcoin adapter with a specific transport
	pub fn new_with_transport(transport: T, finality: FinalityPolicy) -> Self {
		Self {
			transport,
			finality,
		}
	}

	/// Depth at which a transaction counts as final
	///
	/// Bitcoin has no finalization signal, so `Finalized` falls back to the
	/// conventional six confirmations.
	fn required_confirmations(&self) -> u64 {
		match self.finality {
			FinalityPolicy::Confirmations(n) => n,
			FinalityPolicy::Finalized => DEFAULT_BITCOIN_CONFIRMATIONS,
		}
	}
}

impl BitcoinAdapter<HttpTransportClient> {
	/// Creates a new Bitcoin adapter connected over HTTP
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC endpoints and credentials
	pub async fn new(network: &Network) -> Result<Self, anyhow::Error> {
		let transport = HttpTransportClient::new(network).await?;
		Ok(Self::new_with_transport(transport, network.finality_policy()))
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> BitcoinAdapter<T> {
	async fn blockchain_info(&self, cancel: &CancelSignal) -> Result<Value, AdapterError> {
		call(&self.transport, "getblockchaininfo", json!([]), cancel).await
	}

	/// Resolves a height to a block hash, `None` past the tip
	async fn block_hash_at(
		&self,
		height: i64,
		cancel: &CancelSignal,
	) -> Result<Option<String>, AdapterError> {
		let result = call(&self.transport, "getblockhash", json!([height]), cancel).await;
		Ok(absent_on(result, &ABSENT_CODES)?.and_then(|hash| hash.as_str().map(str::to_owned)))
	}
}

/// Splits a BIP-14 user agent such as `/Satoshi:27.0.0/` into name and version
fn parse_subversion(subversion: &str) -> Option<(String, String)> {
	let agent = subversion.trim_matches('/').split('/').next()?;
	let (name, version) = agent.split_once(':')?;
	if name.is_empty() {
		return None;
	}
	Some((name.to_string(), version.to_string()))
}

/// Formats Bitcoin Core's numeric version (`270100`) as `27.1.0`
fn format_numeric_version(version: u64) -> String {
	format!(
		"{}.{}.{}",
		version / 10_000,
		(version / 100) % 100,
		version % 100
	)
}

fn block_time(value: &Value) -> Option<DateTime<Utc>> {
	value
		.get("time")
		.and_then(Value::as_i64)
		.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

fn fee_target(request: &FeeRequest) -> (u32, Option<&'static str>) {
	let (blocks, mode) = match request.intent {
		FeeIntent::BroadcastSoon => (SOON_TARGET_BLOCKS, Some("CONSERVATIVE")),
		FeeIntent::BroadcastCheap => (CHEAP_TARGET_BLOCKS, Some("ECONOMICAL")),
		FeeIntent::Unknown => (DEFAULT_TARGET_BLOCKS, None),
	};
	(request.target_confirmations.unwrap_or(blocks), mode)
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> LedgerAdapter for BitcoinAdapter<T> {
	fn chain_type(&self) -> BlockChainType {
		BlockChainType::Bitcoin
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_health(&self, cancel: &CancelSignal) -> Result<Health, AdapterError> {
		let probe = async {
			call(&self.transport, "uptime", json!([]), cancel).await?;
			self.blockchain_info(cancel).await
		};

		match probe.await {
			Ok(info) => {
				if info.get("initialblockdownload").and_then(Value::as_bool) == Some(true) {
					Ok(Health::unhealthy("node is in initial block download"))
				} else {
					Ok(Health::healthy("ok"))
				}
			}
			Err(AdapterError::Cancelled) => Err(AdapterError::Cancelled),
			Err(e) => Ok(Health::unhealthy(e.to_string())),
		}
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_version(&self, cancel: &CancelSignal) -> Result<NodeVersion, AdapterError> {
		let info = call(&self.transport, "getnetworkinfo", json!([]), cancel).await?;

		let (client_name, client_version) = match info
			.get("subversion")
			.and_then(Value::as_str)
			.and_then(parse_subversion)
		{
			Some((name, version)) => (Some(name), Some(version)),
			None => (
				Some("bitcoind".to_string()),
				info.get("version")
					.and_then(Value::as_u64)
					.map(format_numeric_version),
			),
		};

		Ok(NodeVersion {
			client_name,
			client_version,
			raw: Some(info),
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_network_info(&self, cancel: &CancelSignal) -> Result<NetworkInfo, AdapterError> {
		let info = self.blockchain_info(cancel).await?;
		let genesis_id = self.block_hash_at(0, cancel).await?;

		Ok(NetworkInfo {
			network_name: info.get("chain").and_then(Value::as_str).map(str::to_owned),
			chain_id: None,
			genesis_id,
			raw: Some(info),
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_sync_status(&self, cancel: &CancelSignal) -> Result<SyncStatus, AdapterError> {
		let info = self.blockchain_info(cancel).await?;

		let initial_download = info
			.get("initialblockdownload")
			.and_then(Value::as_bool)
			.unwrap_or(false);
		let blocks = info.get("blocks").and_then(Value::as_i64);
		let headers = info.get("headers").and_then(Value::as_i64);
		let caught_up = match (blocks, headers) {
			(Some(blocks), Some(headers)) => blocks >= headers,
			_ => true,
		};
		let is_synced = !initial_download && caught_up;

		let stage = if initial_download {
			"initial_block_download"
		} else if caught_up {
			"synced"
		} else {
			"catching_up"
		};

		let progress = info.get("verificationprogress").and_then(Value::as_f64);

		Ok(SyncStatus::new(is_synced, progress, Some(stage.to_string())).with_raw(info))
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_head(&self, cancel: &CancelSignal) -> Result<ChainHead, AdapterError> {
		let info = self.blockchain_info(cancel).await?;

		Ok(ChainHead {
			height_like: info.get("blocks").and_then(Value::as_i64),
			slot_like: None,
			head_id: info
				.get("bestblockhash")
				.and_then(Value::as_str)
				.map(str::to_owned),
			finality_hint: Some(format!("{}-confirmations", self.required_confirmations())),
			raw: Some(info),
		})
	}

	#[instrument(level = "debug", skip(self, cancel))]
	async fn get_block(
		&self,
		id: &BlockIdentifier,
		options: BlockReadOptions,
		cancel: &CancelSignal,
	) -> Result<Option<LedgerBlock>, AdapterError> {
		let hash = match id {
			BlockIdentifier::ByHash(hash) => hash.clone(),
			BlockIdentifier::ByNumber(height) => {
				if *height < 0 {
					return Ok(None);
				}
				match self.block_hash_at(*height, cancel).await? {
					Some(hash) => hash,
					None => return Ok(None),
				}
			}
			BlockIdentifier::BySlot(_) => return Ok(None),
		};

		let result = if options.header_only {
			call(&self.transport, "getblockheader", json!([hash, true]), cancel).await
		} else {
			call(&self.transport, "getblock", json!([hash, 1]), cancel).await
		};

		let Some(raw) = absent_on(result, &ABSENT_CODES)? else {
			return Ok(None);
		};

		let transactions = if !options.wants_transactions() {
			None
		} else {
			raw.get("tx").and_then(Value::as_array).map(|txs| {
				txs.iter()
					.filter_map(Value::as_str)
					.map(TxId::from)
					.collect()
			})
		};

		Ok(Some(LedgerBlock {
			canonical_id: id.clone(),
			hash: raw.get("hash").and_then(Value::as_str).map(str::to_owned),
			number_or_height: raw.get("height").and_then(Value::as_i64),
			slot: None,
			time: block_time(&raw),
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
			"getrawtransaction",
			json!([id.as_str(), true]),
			cancel,
		)
		.await;

		let Some(raw) = absent_on(result, &ABSENT_CODES)? else {
			return Ok(None);
		};

		// Verbose output always carries the serialized transaction
		let raw_bytes = match raw.get("hex").and_then(Value::as_str) {
			Some(hex) if options.include_raw => Some(from_hex(hex)?),
			_ => None,
		};

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
			"getrawtransaction",
			json!([id.as_str(), true]),
			cancel,
		)
		.await;

		let Some(raw) = absent_on(result, &ABSENT_CODES)? else {
			return Ok(TxStatus::unknown());
		};

		// Mempool transactions carry no confirmations field
		let confirmations = raw
			.get("confirmations")
			.and_then(Value::as_i64)
			.unwrap_or(0)
			.max(0);

		let state = if confirmations > 0 {
			"confirmed"
		} else {
			"mempool"
		};

		Ok(TxStatus {
			is_known: true,
			is_final: confirmations as u64 >= self.required_confirmations(),
			confirmations_like: Some(confirmations),
			state: Some(state.to_string()),
			raw: Some(raw),
		})
	}

	#[instrument(level = "debug", skip(self, tx, cancel))]
	async fn broadcast_signed_transaction(
		&self,
		tx: &TransactionInstance,
		_options: BroadcastOptions,
		cancel: &CancelSignal,
	) -> Result<BroadcastResult, AdapterError> {
		if tx.chain_type() != BlockChainType::Bitcoin {
			return Err(AdapterError::invalid_input(format!(
				"cannot broadcast a {} transaction to a bitcoin node",
				tx.chain_type()
			)));
		}
		let bytes = match tx.signed_bytes() {
			Some(bytes) if tx.is_signed() => bytes,
			_ => return Err(AdapterError::invalid_input("transaction is not signed")),
		};

		match call(
			&self.transport,
			"sendrawtransaction",
			json!([hex::encode(bytes)]),
			cancel,
		)
		.await
		{
			Ok(raw) => {
				let tx_id = raw.as_str().map(TxId::new);
				match tx_id {
					Some(tx_id) => Ok(BroadcastResult::accepted(tx_id, Some(raw))),
					None => Ok(BroadcastResult::rejected(
						"node returned no transaction id",
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
		let (target, mode) = fee_target(request);
		let params = match mode {
			Some(mode) => json!([target, mode]),
			None => json!([target]),
		};

		let raw = call(&self.transport, "estimatesmartfee", params, cancel).await?;

		let value = raw
			.get("feerate")
			.and_then(decimal_from_json)
			.map(|btc_per_kvb| btc_per_kvb * Decimal::from(SAT_PER_VB_PER_BTC_PER_KVB))
			.filter(|sat_per_vb| !sat_per_vb.is_sign_negative());

		let blocks = raw
			.get("blocks")
			.and_then(Value::as_u64)
			.unwrap_or(u64::from(target));

		Ok(FeeQuote {
			unit: Some("sat/vB".to_string()),
			value,
			strategy: Some(format!("estimatesmartfee:{}-blocks", blocks)),
			raw: Some(raw),
		})
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
			"testmempoolaccept",
			json!([[hex::encode(signed_transaction)]]),
			cancel,
		)
		.await
		{
			Ok(raw) => raw,
			Err(AdapterError::Cancelled) => return Err(AdapterError::Cancelled),
			Err(e) => return Ok(PreflightResult::failure(e.to_string(), None)),
		};

		let verdict = raw.get(0).cloned().unwrap_or(Value::Null);
		let details = options.include_details.then(|| raw.clone());

		if verdict.get("allowed").and_then(Value::as_bool) == Some(true) {
			return Ok(PreflightResult::success(details));
		}

		let reason = verdict
			.get("reject-reason")
			.and_then(Value::as_str)
			.unwrap_or("rejected by mempool policy");
		Ok(PreflightResult::failure(reason, details))
	}
}
