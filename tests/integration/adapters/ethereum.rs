use std::str::FromStr;

use alloy::{
	consensus::{SignableTransaction, TxEip1559, TxEnvelope},
	eips::eip2718::Encodable2718,
	primitives::{address, Address, Bytes, TxKind, U256},
	signers::{local::PrivateKeySigner, SignerSync},
};
use mockall::predicate;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::integration::mocks::{
	expect_call, expect_call_with, expect_transport_failure, rpc_err, rpc_ok, signed_bitcoin_tx,
	signed_ethereum_tx, silent_transport, unsigned_ethereum_tx, MockLedgerTransport,
};
use ledger_adapters::{
	models::{
		BlockIdentifier, BlockReadOptions, BroadcastOptions, FeeIntent, FeeRequest,
		FinalityPolicy, PreflightOptions, TxId, TxReadOptions,
	},
	services::blockchain::{
		AdapterError, CancelHandle, CancelSignal, EthereumAdapter, LedgerAdapter,
	},
};

const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
const BLOCK_HASH: &str = "0xb3b20624f8f0f86eb50dd04688409e5cea4bd02d700bf6e79e9384d47d6a5a35";

fn adapter(transport: MockLedgerTransport) -> EthereumAdapter<MockLedgerTransport> {
	EthereumAdapter::new_with_transport(transport, FinalityPolicy::Confirmations(12))
}

// First anvil development account
const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const MAX_FEE_PER_GAS: u128 = 30_000_000_000;
const MAX_PRIORITY_FEE_PER_GAS: u128 = 1_000_000_000;

/// EIP-1559 transfer signed with the development key, with its sender
fn signed_eip1559(chain_id: u64, nonce: u64, gas_limit: u64) -> (Vec<u8>, Address) {
	let signer = PrivateKeySigner::from_str(DEV_KEY).unwrap();
	let tx = TxEip1559 {
		chain_id,
		nonce,
		gas_limit,
		max_fee_per_gas: MAX_FEE_PER_GAS,
		max_priority_fee_per_gas: MAX_PRIORITY_FEE_PER_GAS,
		to: TxKind::Call(address!("0x3535353535353535353535353535353535353535")),
		value: U256::from(1_000_000_000_000_000u64),
		access_list: Default::default(),
		input: Bytes::new(),
	};
	let signature = signer.sign_hash_sync(&tx.signature_hash()).unwrap();
	let envelope = TxEnvelope::from(tx.into_signed(signature));
	(envelope.encoded_2718(), signer.address())
}

fn mainnet_preflight(transport: MockLedgerTransport) -> EthereumAdapter<MockLedgerTransport> {
	EthereumAdapter::new_with_transport(transport, FinalityPolicy::Finalized).with_chain_id(1)
}

fn expect_pending_nonce(transport: &mut MockLedgerTransport, sender: Address, nonce: u64) {
	expect_call_with(
		transport,
		"eth_getTransactionCount",
		json!([sender.to_string(), "pending"]),
		rpc_ok(json!(format!("{:#x}", nonce))),
	);
}

fn block(number: u64) -> Value {
	json!({
		"number": format!("{:#x}", number),
		"hash": BLOCK_HASH,
		"timestamp": "0x55ba467c",
		"transactions": [TX_HASH]
	})
}

#[tokio::test]
async fn test_health_ok() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "web3_clientVersion", rpc_ok(json!("Geth/v1.14.0")));
	expect_call(&mut transport, "eth_syncing", rpc_ok(json!(false)));

	let health = adapter(transport)
		.get_health(&CancelSignal::never())
		.await
		.unwrap();
	assert!(health.is_healthy);
}

#[tokio::test]
async fn test_health_reports_syncing_node() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "web3_clientVersion", rpc_ok(json!("Geth/v1.14.0")));
	expect_call(
		&mut transport,
		"eth_syncing",
		rpc_ok(json!({"startingBlock": "0x0", "currentBlock": "0x1", "highestBlock": "0x2"})),
	);

	let health = adapter(transport)
		.get_health(&CancelSignal::never())
		.await
		.unwrap();
	assert!(!health.is_healthy);
	assert_eq!(health.message.as_deref(), Some("node is syncing"));
}

#[tokio::test]
async fn test_health_folds_transport_failure() {
	let mut transport = MockLedgerTransport::new();
	expect_transport_failure(&mut transport, "web3_clientVersion");

	let health = adapter(transport)
		.get_health(&CancelSignal::never())
		.await
		.unwrap();
	assert!(!health.is_healthy);
	assert!(health.message.is_some());
}

#[tokio::test]
async fn test_get_version() {
	let mut transport = MockLedgerTransport::new();
	let client = "Nethermind/v1.25.4+20b10b35/linux-x64/dotnet8.0.1";
	expect_call(&mut transport, "web3_clientVersion", rpc_ok(json!(client)));

	let version = adapter(transport)
		.get_version(&CancelSignal::never())
		.await
		.unwrap();
	assert_eq!(version.client_name.as_deref(), Some("Nethermind"));
	assert_eq!(version.client_version.as_deref(), Some("v1.25.4+20b10b35"));
	assert_eq!(version.raw, Some(json!(client)));
}

#[tokio::test]
async fn test_get_network_info() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "eth_chainId", rpc_ok(json!("0xaa36a7")));
	expect_call_with(
		&mut transport,
		"eth_getBlockByNumber",
		json!(["0x0", false]),
		rpc_ok(block(0)),
	);

	let info = adapter(transport)
		.get_network_info(&CancelSignal::never())
		.await
		.unwrap();
	assert_eq!(info.chain_id.as_deref(), Some("11155111"));
	assert_eq!(info.network_name.as_deref(), Some("sepolia"));
	assert_eq!(info.genesis_id.as_deref(), Some(BLOCK_HASH));
}

#[tokio::test]
async fn test_get_sync_status_while_syncing() {
	let mut transport = MockLedgerTransport::new();
	let syncing = json!({"startingBlock": "0x0", "currentBlock": "0x19", "highestBlock": "0x64"});
	expect_call(&mut transport, "eth_syncing", rpc_ok(syncing.clone()));

	let status = adapter(transport)
		.get_sync_status(&CancelSignal::never())
		.await
		.unwrap();
	assert!(!status.is_synced);
	assert_eq!(status.progress, Some(0.25));
	assert_eq!(status.raw, Some(syncing));
}

#[tokio::test]
async fn test_get_head() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"eth_getBlockByNumber",
		json!(["latest", false]),
		rpc_ok(block(0x1234)),
	);

	let head = adapter(transport)
		.get_head(&CancelSignal::never())
		.await
		.unwrap();
	assert_eq!(head.height_like, Some(0x1234));
	assert_eq!(head.slot_like, None);
	assert_eq!(head.head_id.as_deref(), Some(BLOCK_HASH));
	assert_eq!(head.raw, Some(block(0x1234)));
}

#[tokio::test]
async fn test_get_block_by_number() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"eth_getBlockByNumber",
		json!(["0x10", false]),
		rpc_ok(block(16)),
	);

	let id = BlockIdentifier::by_number(16);
	let result = adapter(transport)
		.get_block(&id, BlockReadOptions::default(), &CancelSignal::never())
		.await
		.unwrap()
		.unwrap();
	assert_eq!(result.canonical_id, id);
	assert_eq!(result.number_or_height, Some(16));
	assert_eq!(result.slot, None);
	assert_eq!(result.time.unwrap().timestamp(), 0x55ba467c);
	assert_eq!(result.transactions, Some(vec![TxId::new(TX_HASH)]));
	assert_eq!(result.raw, Some(block(16)));
}

#[tokio::test]
async fn test_get_block_by_hash_header_only() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"eth_getBlockByHash",
		json!([BLOCK_HASH, false]),
		rpc_ok(block(16)),
	);

	let result = adapter(transport)
		.get_block(
			&BlockIdentifier::by_hash(BLOCK_HASH),
			BlockReadOptions::header_only(),
			&CancelSignal::never(),
		)
		.await
		.unwrap()
		.unwrap();
	assert!(result.transactions.is_none());
}

#[tokio::test]
async fn test_get_block_unsupported_or_missing() {
	let by_slot = adapter(silent_transport())
		.get_block(
			&BlockIdentifier::by_slot(1),
			BlockReadOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(by_slot.is_none());

	let negative = adapter(silent_transport())
		.get_block(
			&BlockIdentifier::by_number(-1),
			BlockReadOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(negative.is_none());

	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "eth_getBlockByNumber", rpc_ok(Value::Null));
	let missing = adapter(transport)
		.get_block(
			&BlockIdentifier::by_number(1 << 40),
			BlockReadOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(missing.is_none());
}

#[tokio::test]
async fn test_get_transaction_with_raw_bytes() {
	let mut transport = MockLedgerTransport::new();
	let tx = json!({"hash": TX_HASH, "nonce": "0x0"});
	expect_call(&mut transport, "eth_getTransactionByHash", rpc_ok(tx.clone()));
	expect_call(
		&mut transport,
		"eth_getRawTransactionByHash",
		rpc_ok(json!("0x02f8")),
	);

	let result = adapter(transport)
		.get_transaction(
			&TxId::new(TX_HASH),
			TxReadOptions { include_raw: true },
			&CancelSignal::never(),
		)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(result.raw_bytes, Some(vec![0x02, 0xf8]));
	assert_eq!(result.raw, Some(tx));
}

#[tokio::test]
async fn test_get_transaction_raw_bytes_unsupported_by_node() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"eth_getTransactionByHash",
		rpc_ok(json!({"hash": TX_HASH})),
	);
	expect_call(
		&mut transport,
		"eth_getRawTransactionByHash",
		rpc_err(-32601, "the method eth_getRawTransactionByHash does not exist"),
	);

	let result = adapter(transport)
		.get_transaction(
			&TxId::new(TX_HASH),
			TxReadOptions { include_raw: true },
			&CancelSignal::never(),
		)
		.await
		.unwrap()
		.unwrap();
	assert!(result.raw_bytes.is_none());
}

#[tokio::test]
async fn test_get_transaction_missing() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "eth_getTransactionByHash", rpc_ok(Value::Null));

	let result = adapter(transport)
		.get_transaction(&TxId::new(TX_HASH), TxReadOptions::default(), &CancelSignal::never())
		.await
		.unwrap();
	assert!(result.is_none());
}

#[tokio::test]
async fn test_status_unknown_transaction() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "eth_getTransactionReceipt", rpc_ok(Value::Null));
	expect_call(&mut transport, "eth_getTransactionByHash", rpc_ok(Value::Null));

	let status = adapter(transport)
		.get_transaction_status(&TxId::new(TX_HASH), &CancelSignal::never())
		.await
		.unwrap();
	assert!(!status.is_known);
	assert!(!status.is_final);
	assert!(status.raw.is_none());
}

#[tokio::test]
async fn test_status_pending_transaction() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "eth_getTransactionReceipt", rpc_ok(Value::Null));
	expect_call(
		&mut transport,
		"eth_getTransactionByHash",
		rpc_ok(json!({"hash": TX_HASH, "blockNumber": null})),
	);

	let status = adapter(transport)
		.get_transaction_status(&TxId::new(TX_HASH), &CancelSignal::never())
		.await
		.unwrap();
	assert!(status.is_known);
	assert!(!status.is_final);
	assert_eq!(status.state.as_deref(), Some("pending"));
}

#[tokio::test]
async fn test_status_by_confirmation_depth() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"eth_getTransactionReceipt",
		rpc_ok(json!({"blockNumber": "0x64", "status": "0x1"})),
	);
	// 0x6f - 0x64 + 1 = 12 confirmations
	expect_call(&mut transport, "eth_blockNumber", rpc_ok(json!("0x6f")));

	let status = adapter(transport)
		.get_transaction_status(&TxId::new(TX_HASH), &CancelSignal::never())
		.await
		.unwrap();
	assert!(status.is_known);
	assert!(status.is_final);
	assert_eq!(status.confirmations_like, Some(12));
	assert_eq!(status.state.as_deref(), Some("success"));
}

#[tokio::test]
async fn test_status_by_finalized_tag() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"eth_getTransactionReceipt",
		rpc_ok(json!({"blockNumber": "0x64", "status": "0x0"})),
	);
	expect_call(&mut transport, "eth_blockNumber", rpc_ok(json!("0x80")));
	expect_call_with(
		&mut transport,
		"eth_getBlockByNumber",
		json!(["finalized", false]),
		rpc_ok(block(0x60)),
	);

	let status = EthereumAdapter::new_with_transport(transport, FinalityPolicy::Finalized)
		.get_transaction_status(&TxId::new(TX_HASH), &CancelSignal::never())
		.await
		.unwrap();
	assert!(status.is_known);
	assert!(!status.is_final);
	assert_eq!(status.state.as_deref(), Some("reverted"));
}

#[tokio::test]
async fn test_status_when_finalized_tag_is_rejected() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"eth_getTransactionReceipt",
		rpc_ok(json!({"blockNumber": "0x64", "status": "0x1"})),
	);
	expect_call(&mut transport, "eth_blockNumber", rpc_ok(json!("0x80")));
	expect_call(
		&mut transport,
		"eth_getBlockByNumber",
		rpc_err(-32602, "invalid argument 0: hex string without 0x prefix"),
	);

	let status = EthereumAdapter::new_with_transport(transport, FinalityPolicy::Finalized)
		.get_transaction_status(&TxId::new(TX_HASH), &CancelSignal::never())
		.await
		.unwrap();
	assert!(status.is_known);
	assert!(!status.is_final);
	assert_eq!(status.confirmations_like, Some(29));
	assert_eq!(status.state.as_deref(), Some("success"));
}

#[tokio::test]
async fn test_broadcast_accepted() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"eth_sendRawTransaction",
		json!(["0x02f870"]),
		rpc_ok(json!(TX_HASH)),
	);

	let result = adapter(transport)
		.broadcast_signed_transaction(
			&signed_ethereum_tx(vec![0x02, 0xf8, 0x70]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(result.accepted);
	assert_eq!(result.tx_id, Some(TxId::new(TX_HASH)));
}

#[tokio::test]
async fn test_broadcast_rejected() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"eth_sendRawTransaction",
		rpc_err(-32000, "nonce too low"),
	);

	let result = adapter(transport)
		.broadcast_signed_transaction(
			&signed_ethereum_tx(vec![0x02]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(!result.accepted);
	assert!(result.tx_id.is_none());
	assert!(result.error.unwrap().contains("nonce too low"));
}

#[tokio::test]
async fn test_broadcast_transport_failure_is_not_accepted() {
	let mut transport = MockLedgerTransport::new();
	expect_transport_failure(&mut transport, "eth_sendRawTransaction");

	let result = adapter(transport)
		.broadcast_signed_transaction(
			&signed_ethereum_tx(vec![0x02]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(!result.accepted);
	assert!(result.error.is_some());
}

#[tokio::test]
async fn test_broadcast_invalid_input_makes_no_call() {
	let adapter = adapter(silent_transport());

	let unsigned = adapter
		.broadcast_signed_transaction(
			&unsigned_ethereum_tx(),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await;
	assert!(matches!(unsigned, Err(AdapterError::InvalidInput(_))));

	let foreign = adapter
		.broadcast_signed_transaction(
			&signed_bitcoin_tx(vec![1]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await;
	assert!(matches!(foreign, Err(AdapterError::InvalidInput(_))));
}

#[tokio::test]
async fn test_estimate_fees_gas_price() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "eth_gasPrice", rpc_ok(json!("0x3b9aca00")));

	let quote = adapter(transport)
		.estimate_fees(
			&FeeRequest::with_intent(FeeIntent::BroadcastSoon),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert_eq!(quote.unit.as_deref(), Some("wei"));
	assert_eq!(quote.value, Some(Decimal::from_str("1000000000").unwrap()));
	assert_eq!(quote.strategy.as_deref(), Some("eth_gasPrice"));
}

#[tokio::test]
async fn test_estimate_fees_cheap_from_history() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"eth_feeHistory",
		json!(["0xa", "latest", [10]]),
		rpc_ok(json!({
			"oldestBlock": "0x10",
			"baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
			"reward": [["0x5f5e100"]]
		})),
	);

	let quote = adapter(transport)
		.estimate_fees(
			&FeeRequest::with_intent(FeeIntent::BroadcastCheap),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert_eq!(quote.unit.as_deref(), Some("wei"));
	assert_eq!(quote.value, Some(Decimal::from(1_100_000_000u64)));
	assert!(!quote.value.unwrap().is_sign_negative());
}

#[tokio::test]
async fn test_estimate_fees_cheap_falls_back_before_london() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"eth_feeHistory",
		rpc_ok(json!({"oldestBlock": "0x10", "reward": []})),
	);
	expect_call(&mut transport, "eth_gasPrice", rpc_ok(json!("0x1")));

	let quote = adapter(transport)
		.estimate_fees(
			&FeeRequest::with_intent(FeeIntent::BroadcastCheap),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert_eq!(quote.value, Some(Decimal::ONE));
	assert_eq!(quote.unit.as_deref(), Some("wei"));
}

#[tokio::test]
async fn test_preflight_rejects_empty_input() {
	let result = adapter(silent_transport())
		.preflight_signed_transaction(&[], PreflightOptions::default(), &CancelSignal::never())
		.await;
	assert!(result.unwrap_err().is_input_error());
}

#[tokio::test]
async fn test_preflight_folds_undecodable_transaction() {
	let result = adapter(silent_transport())
		.preflight_signed_transaction(
			&[0xde, 0xad, 0xbe, 0xef],
			PreflightOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(!result.would_likely_succeed);
	assert!(result.reason.unwrap().contains("undecodable"));
}

#[tokio::test]
async fn test_preflight_signed_transaction_succeeds() {
	let (bytes, sender) = signed_eip1559(1, 5, 21_000);
	let mut transport = MockLedgerTransport::new();
	expect_pending_nonce(&mut transport, sender, 5);

	let from = sender.to_string();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_estimateGas"),
			predicate::function(move |params: &Option<Value>| {
				params.as_ref().is_some_and(|params| {
					let request = &params[0];
					request["from"] == from
						&& request["nonce"] == "0x5"
						&& request["to"] == "0x3535353535353535353535353535353535353535"
						&& request["maxFeePerGas"] == format!("{:#x}", MAX_FEE_PER_GAS)
						&& request["maxPriorityFeePerGas"]
							== format!("{:#x}", MAX_PRIORITY_FEE_PER_GAS)
						&& request.get("gasPrice").is_none()
				})
			}),
		)
		.times(1)
		.returning(|_, _| Ok(rpc_ok(json!("0x5208"))));

	let result = mainnet_preflight(transport)
		.preflight_signed_transaction(&bytes, PreflightOptions::default(), &CancelSignal::never())
		.await
		.unwrap();
	assert!(result.would_likely_succeed);
	assert!(result.reason.is_none());
	assert_eq!(result.raw, Some(json!("0x5208")));
}

#[tokio::test]
async fn test_preflight_rejects_used_nonce() {
	let (bytes, sender) = signed_eip1559(1, 5, 21_000);
	let mut transport = MockLedgerTransport::new();
	expect_pending_nonce(&mut transport, sender, 7);

	let result = mainnet_preflight(transport)
		.preflight_signed_transaction(&bytes, PreflightOptions::default(), &CancelSignal::never())
		.await
		.unwrap();
	assert!(!result.would_likely_succeed);
	let reason = result.reason.unwrap();
	assert!(reason.contains("nonce 5 already used"), "{}", reason);
	assert!(reason.contains("next nonce is 7"), "{}", reason);
}

#[tokio::test]
async fn test_preflight_gas_limit_below_estimate() {
	let (bytes, sender) = signed_eip1559(1, 5, 21_000);
	let mut transport = MockLedgerTransport::new();
	expect_pending_nonce(&mut transport, sender, 5);
	expect_call(&mut transport, "eth_estimateGas", rpc_ok(json!("0x7530")));

	let result = mainnet_preflight(transport)
		.preflight_signed_transaction(
			&bytes,
			PreflightOptions {
				include_details: false,
			},
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(!result.would_likely_succeed);
	assert!(result
		.reason
		.unwrap()
		.contains("gas limit 21000 is below the estimated 30000"));
	assert!(result.raw.is_none());
}

#[tokio::test]
async fn test_preflight_folds_estimate_error() {
	let (bytes, sender) = signed_eip1559(1, 5, 21_000);
	let mut transport = MockLedgerTransport::new();
	expect_pending_nonce(&mut transport, sender, 5);
	expect_call(
		&mut transport,
		"eth_estimateGas",
		rpc_err(-32000, "insufficient funds for gas * price + value"),
	);

	let result = mainnet_preflight(transport)
		.preflight_signed_transaction(&bytes, PreflightOptions::default(), &CancelSignal::never())
		.await
		.unwrap();
	assert!(!result.would_likely_succeed);
	assert_eq!(
		result.reason.as_deref(),
		Some("insufficient funds for gas * price + value")
	);
}

#[tokio::test]
async fn test_preflight_rejects_other_chain_without_calls() {
	let (bytes, _) = signed_eip1559(11_155_111, 0, 21_000);

	let result = mainnet_preflight(silent_transport())
		.preflight_signed_transaction(&bytes, PreflightOptions::default(), &CancelSignal::never())
		.await
		.unwrap();
	assert!(!result.would_likely_succeed);
	assert!(result
		.reason
		.unwrap()
		.contains("signed for chain 11155111 but node serves 1"));
}

#[tokio::test]
async fn test_cancelled_read_returns_cancelled() {
	let handle = CancelHandle::new();
	let cancel = handle.signal();
	handle.cancel();

	let result = adapter(silent_transport()).get_head(&cancel).await;
	assert!(matches!(result, Err(AdapterError::Cancelled)));
}

#[tokio::test]
async fn test_cancelled_health_is_not_folded() {
	let handle = CancelHandle::new();
	let cancel = handle.signal();
	handle.cancel();

	let result = adapter(silent_transport()).get_health(&cancel).await;
	assert!(result.unwrap_err().is_cancelled());
}
