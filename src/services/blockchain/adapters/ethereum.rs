//! Ethereum JSON-RPC adapter.
//!
//! Maps the standard `eth_*` interface onto the common ledger contract.
//! Blocks are addressed by hash or number; finality follows either a
//! confirmation depth or the node's `finalized` block tag.

use alloy::{
	consensus::{transaction::SignerRecoverable, Transaction as _, TxEnvelope},
	eips::eip2718::Decodable2718,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::{
	models::{
		BlockChainType, BlockIdentifier, BlockReadOptions, BroadcastOptions, BroadcastResult,
		ChainHead, FeeIntent, FeeQuote, FeeRequest, FinalityPolicy, Health, LedgerBlock,
		LedgerTransaction, Network, NetworkInfo, NodeVersion, PreflightOptions, PreflightResult,
		SyncStatus, TransactionInstance, TxId, TxReadOptions, TxStatus,
	},
	services::blockchain::{
		adapters::{
			absent_on, call, from_hex, hex_quantity_field, parse_hex_u128, parse_hex_u64,
			to_prefixed_hex,
		},
		transports::{BlockchainTransport, HttpTransportClient},
		AdapterError, CancelSignal, LedgerAdapter,
	},
};

/// JSON-RPC "method not found", returned by nodes without optional methods
const RPC_METHOD_NOT_FOUND: i64 = -32601;

/// Blocks sampled by `eth_feeHistory` for cheap quotes
const FEE_HISTORY_BLOCKS: u64 = 10;
/// Reward percentile used for cheap quotes
const CHEAP_REWARD_PERCENTILE: u64 = 10;

/// Adapter for Ethereum JSON-RPC nodes
#[derive(Clone, Debug)]
pub struct EthereumAdapter<T: Send + Sync + Clone> {
	/// The underlying transport for RPC communication
	transport: T,
	finality: FinalityPolicy,
	/// Expected EIP-155 chain id, checked during preflight when set
	chain_id: Option<u64>,
}

impl<T: Send + Sync + Clone> EthereumAdapter<T> {
	/// Creates a new Ethereum adapter with a specific transport
	pub fn new_with_transport(transport: T, finality: FinalityPolicy) -> Self {
		Self {
			transport,
			finality,
			chain_id: None,
		}
	}

	/// Rejects preflight of transactions signed for another chain
	pub fn with_chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}
}

impl EthereumAdapter<HttpTransportClient> {
	/// Creates a new Ethereum adapter connected over HTTP
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC endpoints and chain details
	pub async fn new(network: &Network) -> Result<Self, anyhow::Error> {
		let transport = HttpTransportClient::new(network).await?;
		let adapter = Self::new_with_transport(transport, network.finality_policy());
		Ok(match network.chain_id {
			Some(chain_id) => adapter.with_chain_id(chain_id),
			None => adapter,
		})
	}
}

/// Splits `Geth/v1.13.5-stable-916d6a44/linux-amd64/go1.21.4` into name and version
fn parse_client_version(client_version: &str) -> (Option<String>, Option<String>) {
	let mut parts = client_version.split('/');
	let name = parts
		.next()
		.filter(|name| !name.is_empty())
		.map(str::to_owned);
	let version = parts
		.next()
		.filter(|version| !version.is_empty())
		.map(str::to_owned);
	(name, version)
}

fn network_name(chain_id: u64) -> Option<&'static str> {
	match chain_id {
		1 => Some("mainnet"),
		11155111 => Some("sepolia"),
		17000 => Some("holesky"),
		560048 => Some("hoodi"),
		_ => None,
	}
}

fn block_time(block: &Value) -> Result<Option<DateTime<Utc>>, AdapterError> {
	Ok(hex_quantity_field(block, "timestamp")?
		.and_then(|secs| i64::try_from(secs).ok())
		.and_then(|secs| Utc.timestamp_opt(secs, 0).single()))
}

fn block_number(block: &Value) -> Result<Option<i64>, AdapterError> {
	Ok(hex_quantity_field(block, "number")?.and_then(|n| i64::try_from(n).ok()))
}

fn wei(quantity: u128) -> Result<Decimal, AdapterError> {
	i128::try_from(quantity)
		.ok()
		.and_then(|q| Decimal::try_from_i128_with_scale(q, 0).ok())
		.ok_or_else(|| AdapterError::decode(format!("Fee {} wei out of range", quantity)))
}

/// Progress of an `eth_syncing` object, `None` when the range is empty
fn sync_progress(syncing: &Value) -> Result<Option<f64>, AdapterError> {
	let start = hex_quantity_field(syncing, "startingBlock")?.unwrap_or(0);
	let (Some(current), Some(highest)) = (
		hex_quantity_field(syncing, "currentBlock")?,
		hex_quantity_field(syncing, "highestBlock")?,
	) else {
		return Ok(None);
	};

	if highest <= start {
		return Ok(None);
	}
	Ok(Some(
		current.saturating_sub(start) as f64 / (highest - start) as f64,
	))
}

/// Cheap fee from `eth_feeHistory`: next base fee plus the median low-percentile tip
fn cheap_fee_from_history(history: &Value) -> Result<Option<u128>, AdapterError> {
	let Some(next_base_fee) = history
		.get("baseFeePerGas")
		.and_then(Value::as_array)
		.and_then(|fees| fees.last())
		.and_then(Value::as_str)
	else {
		return Ok(None);
	};
	let next_base_fee = parse_hex_u128(next_base_fee)?;

	let mut tips = history
		.get("reward")
		.and_then(Value::as_array)
		.map(|rewards| {
			rewards
				.iter()
				.filter_map(|block| block.get(0).and_then(Value::as_str))
				.map(parse_hex_u128)
				.collect::<Result<Vec<_>, _>>()
		})
		.transpose()?
		.unwrap_or_default();
	tips.sort_unstable();

	let tip = tips.get(tips.len() / 2).copied().unwrap_or(0);
	Ok(Some(next_base_fee.saturating_add(tip)))
}

/// `eth_estimateGas` call object for a decoded transaction
///
/// Carries the envelope's fee fields so the node checks the sender can pay
/// for gas; without them the estimate runs at a zero gas price.
fn estimate_gas_request(envelope: &TxEnvelope, from: &str) -> Result<Value, AdapterError> {
	let mut request = Map::new();
	request.insert("from".into(), json!(from));
	if let Some(to) = envelope.to() {
		request.insert("to".into(), json!(to.to_string()));
	}
	request.insert("value".into(), json!(format!("{:#x}", envelope.value())));
	request.insert("data".into(), json!(to_prefixed_hex(envelope.input())));
	request.insert("nonce".into(), json!(format!("{:#x}", envelope.nonce())));

	if envelope.is_dynamic_fee() {
		request.insert(
			"maxFeePerGas".into(),
			json!(format!("{:#x}", envelope.max_fee_per_gas())),
		);
		if let Some(tip) = envelope.max_priority_fee_per_gas() {
			request.insert("maxPriorityFeePerGas".into(), json!(format!("{:#x}", tip)));
		}
	} else if let Some(price) = envelope.gas_price() {
		request.insert("gasPrice".into(), json!(format!("{:#x}", price)));
	}

	if let Some(access_list) = envelope.access_list().filter(|list| !list.0.is_empty()) {
		let access_list = serde_json::to_value(access_list)
			.map_err(|e| AdapterError::decode(format!("Unencodable access list: {}", e)))?;
		request.insert("accessList".into(), access_list);
	}

	Ok(Value::Object(request))
}

impl<T: Send + Sync + Clone + BlockchainTransport> EthereumAdapter<T> {
	async fn block_by_tag(
		&self,
		tag: &str,
		cancel: &CancelSignal,
	) -> Result<Option<Value>, AdapterError> {
		let result = call(
			&self.transport,
			"eth_getBlockByNumber",
			json!([tag, false]),
			cancel,
		)
		.await;
		absent_on(result, &[])
	}

	async fn head_number(&self, cancel: &CancelSignal) -> Result<u64, AdapterError> {
		let result = call(&self.transport, "eth_blockNumber", json!([]), cancel).await?;
		let number = result
			.as_str()
			.ok_or_else(|| AdapterError::decode("eth_blockNumber returned a non-string"))?;
		parse_hex_u64(number)
	}

	/// Next nonce for `address`, counting transactions still in the pool
	async fn pending_nonce(&self, address: &str, cancel: &CancelSignal) -> Result<u64, AdapterError> {
		let result = call(
			&self.transport,
			"eth_getTransactionCount",
			json!([address, "pending"]),
			cancel,
		)
		.await?;
		let count = result
			.as_str()
			.ok_or_else(|| AdapterError::decode("eth_getTransactionCount returned a non-string"))?;
		parse_hex_u64(count)
	}

	async fn gas_price(&self, cancel: &CancelSignal) -> Result<FeeQuote, AdapterError> {
		let raw = call(&self.transport, "eth_gasPrice", json!([]), cancel).await?;
		let price = raw
			.as_str()
			.ok_or_else(|| AdapterError::decode("eth_gasPrice returned a non-string"))?;
		let value = wei(parse_hex_u128(price)?)?;

		Ok(FeeQuote {
			unit: Some("wei".to_string()),
			value: Some(value),
			strategy: Some("eth_gasPrice".to_string()),
			raw: Some(raw),
		})
	}

	/// Whether the block at `number` is at or below the finality threshold
	async fn is_final(&self, number: u64, head: u64, cancel: &CancelSignal) -> Result<bool, AdapterError> {
		match self.finality {
			FinalityPolicy::Confirmations(_) => Ok(self
				.finality
				.is_deep_enough(head.saturating_sub(number).saturating_add(1))),
			FinalityPolicy::Finalized => {
				let finalized = match self.block_by_tag("finalized", cancel).await {
					Ok(block) => block,
					// Pre-merge nodes reject the tag; nothing counts as finalized there
					Err(AdapterError::Rpc { code, message }) => {
						tracing::debug!("finalized tag rejected ({}): {}", code, message);
						None
					}
					Err(e) => return Err(e),
				};
				let finalized_number = match finalized {
					Some(block) => hex_quantity_field(&block, "number")?,
					None => None,
				};
				Ok(finalized_number.is_some_and(|finalized| number <= finalized))
			}
		}
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> LedgerAdapter for EthereumAdapter<T> {
	fn chain_type(&self) -> BlockChainType {
		BlockChainType::Ethereum
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_health(&self, cancel: &CancelSignal) -> Result<Health, AdapterError> {
		let probe = async {
			call(&self.transport, "web3_clientVersion", json!([]), cancel).await?;
			call(&self.transport, "eth_syncing", json!([]), cancel).await
		};

		match probe.await {
			Ok(Value::Bool(false)) => Ok(Health::healthy("ok")),
			Ok(_) => Ok(Health::unhealthy("node is syncing")),
			Err(AdapterError::Cancelled) => Err(AdapterError::Cancelled),
			Err(e) => Ok(Health::unhealthy(e.to_string())),
		}
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_version(&self, cancel: &CancelSignal) -> Result<NodeVersion, AdapterError> {
		let raw = call(&self.transport, "web3_clientVersion", json!([]), cancel).await?;
		let (client_name, client_version) = raw
			.as_str()
			.map(parse_client_version)
			.unwrap_or_default();

		Ok(NodeVersion {
			client_name,
			client_version,
			raw: Some(raw),
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_network_info(&self, cancel: &CancelSignal) -> Result<NetworkInfo, AdapterError> {
		let raw = call(&self.transport, "eth_chainId", json!([]), cancel).await?;
		let chain_id = raw
			.as_str()
			.ok_or_else(|| AdapterError::decode("eth_chainId returned a non-string"))
			.and_then(parse_hex_u64)?;

		let genesis_id = self
			.block_by_tag("0x0", cancel)
			.await?
			.and_then(|block| block.get("hash").and_then(Value::as_str).map(str::to_owned));

		Ok(NetworkInfo {
			network_name: network_name(chain_id).map(str::to_owned),
			chain_id: Some(chain_id.to_string()),
			genesis_id,
			raw: Some(raw),
		})
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_sync_status(&self, cancel: &CancelSignal) -> Result<SyncStatus, AdapterError> {
		let raw = call(&self.transport, "eth_syncing", json!([]), cancel).await?;

		let status = match &raw {
			Value::Bool(false) => SyncStatus::new(true, Some(1.0), Some("synced".to_string())),
			Value::Object(_) => {
				SyncStatus::new(false, sync_progress(&raw)?, Some("syncing".to_string()))
			}
			other => {
				return Err(AdapterError::decode(format!(
					"Unexpected eth_syncing result: {}",
					other
				)))
			}
		};

		Ok(status.with_raw(raw))
	}

	#[instrument(level = "debug", skip_all)]
	async fn get_head(&self, cancel: &CancelSignal) -> Result<ChainHead, AdapterError> {
		let block = self
			.block_by_tag("latest", cancel)
			.await?
			.ok_or_else(|| AdapterError::decode("Node returned no latest block"))?;

		Ok(ChainHead {
			height_like: block_number(&block)?,
			slot_like: None,
			head_id: block.get("hash").and_then(Value::as_str).map(str::to_owned),
			finality_hint: Some("latest".to_string()),
			raw: Some(block),
		})
	}

	#[instrument(level = "debug", skip(self, cancel))]
	async fn get_block(
		&self,
		id: &BlockIdentifier,
		options: BlockReadOptions,
		cancel: &CancelSignal,
	) -> Result<Option<LedgerBlock>, AdapterError> {
		// Hash-only transaction lists are enough to fill `transactions`
		let result = match id {
			BlockIdentifier::ByHash(hash) => {
				call(
					&self.transport,
					"eth_getBlockByHash",
					json!([hash, false]),
					cancel,
				)
				.await
			}
			BlockIdentifier::ByNumber(number) => {
				if *number < 0 {
					return Ok(None);
				}
				call(
					&self.transport,
					"eth_getBlockByNumber",
					json!([format!("{:#x}", number), false]),
					cancel,
				)
				.await
			}
			BlockIdentifier::BySlot(_) => return Ok(None),
		};

		let Some(raw) = absent_on(result, &[])? else {
			return Ok(None);
		};

		let transactions = if !options.wants_transactions() {
			None
		} else {
			raw.get("transactions").and_then(Value::as_array).map(|txs| {
				txs.iter()
					.filter_map(|tx| tx.as_str().or_else(|| tx.get("hash")?.as_str()))
					.map(TxId::from)
					.collect()
			})
		};

		Ok(Some(LedgerBlock {
			canonical_id: id.clone(),
			hash: raw.get("hash").and_then(Value::as_str).map(str::to_owned),
			number_or_height: block_number(&raw)?,
			slot: None,
			time: block_time(&raw)?,
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
			"eth_getTransactionByHash",
			json!([id.as_str()]),
			cancel,
		)
		.await;

		let Some(raw) = absent_on(result, &[])? else {
			return Ok(None);
		};

		let raw_bytes = if options.include_raw {
			let result = call(
				&self.transport,
				"eth_getRawTransactionByHash",
				json!([id.as_str()]),
				cancel,
			)
			.await;
			match absent_on(result, &[RPC_METHOD_NOT_FOUND])? {
				Some(Value::String(encoded)) => Some(from_hex(&encoded)?),
				_ => None,
			}
		} else {
			None
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
		let receipt = call(
			&self.transport,
			"eth_getTransactionReceipt",
			json!([id.as_str()]),
			cancel,
		)
		.await;

		let Some(receipt) = absent_on(receipt, &[])? else {
			// No receipt: either still pending or unknown to the node
			let tx = call(
				&self.transport,
				"eth_getTransactionByHash",
				json!([id.as_str()]),
				cancel,
			)
			.await;
			return Ok(match absent_on(tx, &[])? {
				Some(tx) => TxStatus {
					is_known: true,
					is_final: false,
					confirmations_like: Some(0),
					state: Some("pending".to_string()),
					raw: Some(tx),
				},
				None => TxStatus::unknown(),
			});
		};

		let included_in = hex_quantity_field(&receipt, "blockNumber")?
			.ok_or_else(|| AdapterError::decode("Receipt without blockNumber"))?;
		let head = self.head_number(cancel).await?;
		let confirmations = head.saturating_sub(included_in).saturating_add(1);
		let is_final = self.is_final(included_in, head, cancel).await?;

		let state = match receipt.get("status").and_then(Value::as_str) {
			Some("0x1") => "success",
			Some(_) => "reverted",
			// Pre-Byzantium receipts carry a state root instead of a status
			None => "included",
		};

		Ok(TxStatus {
			is_known: true,
			is_final,
			confirmations_like: i64::try_from(confirmations).ok(),
			state: Some(state.to_string()),
			raw: Some(receipt),
		})
	}

	#[instrument(level = "debug", skip(self, tx, cancel))]
	async fn broadcast_signed_transaction(
		&self,
		tx: &TransactionInstance,
		_options: BroadcastOptions,
		cancel: &CancelSignal,
	) -> Result<BroadcastResult, AdapterError> {
		if tx.chain_type() != BlockChainType::Ethereum {
			return Err(AdapterError::invalid_input(format!(
				"cannot broadcast a {} transaction to an ethereum node",
				tx.chain_type()
			)));
		}
		let bytes = match tx.signed_bytes() {
			Some(bytes) if tx.is_signed() => bytes,
			_ => return Err(AdapterError::invalid_input("transaction is not signed")),
		};

		match call(
			&self.transport,
			"eth_sendRawTransaction",
			json!([to_prefixed_hex(bytes)]),
			cancel,
		)
		.await
		{
			Ok(raw) => {
				let tx_id = raw.as_str().map(TxId::new);
				match tx_id {
					Some(tx_id) => Ok(BroadcastResult::accepted(tx_id, Some(raw))),
					None => Ok(BroadcastResult::rejected(
						"node returned no transaction hash",
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
		if request.intent != FeeIntent::BroadcastCheap {
			return self.gas_price(cancel).await;
		}

		let raw = call(
			&self.transport,
			"eth_feeHistory",
			json!([
				format!("{:#x}", FEE_HISTORY_BLOCKS),
				"latest",
				[CHEAP_REWARD_PERCENTILE]
			]),
			cancel,
		)
		.await?;

		match cheap_fee_from_history(&raw)? {
			Some(fee) => Ok(FeeQuote {
				unit: Some("wei".to_string()),
				value: Some(wei(fee)?),
				strategy: Some(format!("eth_feeHistory:p{}", CHEAP_REWARD_PERCENTILE)),
				raw: Some(raw),
			}),
			// Pre-London chains report no base fee
			None => self.gas_price(cancel).await,
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

		let envelope = match TxEnvelope::decode_2718(&mut &signed_transaction[..]) {
			Ok(envelope) => envelope,
			Err(e) => {
				return Ok(PreflightResult::failure(
					format!("undecodable transaction: {}", e),
					None,
				))
			}
		};

		if let (Some(expected), Some(signed_for)) = (self.chain_id, envelope.chain_id()) {
			if expected != signed_for {
				return Ok(PreflightResult::failure(
					format!("signed for chain {} but node serves {}", signed_for, expected),
					None,
				));
			}
		}

		let sender = match envelope.recover_signer() {
			Ok(sender) => sender,
			Err(e) => {
				return Ok(PreflightResult::failure(
					format!("signature recovery failed: {}", e),
					None,
				))
			}
		};

		// eth_estimateGas ignores nonces, so replays are caught here
		let next_nonce = match self.pending_nonce(&sender.to_string(), cancel).await {
			Ok(nonce) => nonce,
			Err(AdapterError::Cancelled) => return Err(AdapterError::Cancelled),
			Err(e) => return Ok(PreflightResult::failure(e.to_string(), None)),
		};
		if envelope.nonce() < next_nonce {
			return Ok(PreflightResult::failure(
				format!(
					"nonce {} already used by {}; next nonce is {}",
					envelope.nonce(),
					sender,
					next_nonce
				),
				None,
			));
		}

		let request = estimate_gas_request(&envelope, &sender.to_string())?;
		let raw = match call(&self.transport, "eth_estimateGas", json!([request]), cancel).await {
			Ok(raw) => raw,
			Err(AdapterError::Cancelled) => return Err(AdapterError::Cancelled),
			Err(AdapterError::Rpc { message, .. }) => {
				return Ok(PreflightResult::failure(message, None))
			}
			Err(e) => return Ok(PreflightResult::failure(e.to_string(), None)),
		};

		let details = options.include_details.then(|| raw.clone());
		let estimate = match raw.as_str().map(parse_hex_u64) {
			Some(Ok(estimate)) => estimate,
			_ => {
				return Ok(PreflightResult::failure(
					"node returned no gas estimate",
					details,
				))
			}
		};

		if estimate > envelope.gas_limit() {
			return Ok(PreflightResult::failure(
				format!(
					"gas limit {} is below the estimated {}",
					envelope.gas_limit(),
					estimate
				),
				details,
			));
		}

		Ok(PreflightResult::success(details))
	}
}
