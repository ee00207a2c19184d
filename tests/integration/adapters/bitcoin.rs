use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;

use crate::integration::mocks::{
	expect_call, expect_call_with, expect_transport_failure, rpc_err, rpc_ok, signed_bitcoin_tx,
	signed_ethereum_tx, silent_transport, unsigned_bitcoin_tx, MockLedgerTransport,
};
use ledger_adapters::{
	models::{
		BlockIdentifier, BlockReadOptions, BroadcastOptions, FeeIntent, FeeRequest,
		FinalityPolicy, PreflightOptions, TxId, TxReadOptions,
	},
	services::blockchain::{AdapterError, BitcoinAdapter, CancelSignal, LedgerAdapter},
};

const GENESIS: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";

fn adapter(transport: MockLedgerTransport) -> BitcoinAdapter<MockLedgerTransport> {
	BitcoinAdapter::new_with_transport(transport, FinalityPolicy::Confirmations(6))
}

fn blockchain_info(initial_download: bool) -> serde_json::Value {
	json!({
		"chain": "main",
		"blocks": 840000,
		"headers": 840000,
		"bestblockhash": "0000000000000000000320283a032748cef8227873ff4872689bf23f1cda83a5",
		"verificationprogress": 0.9999987,
		"initialblockdownload": initial_download
	})
}

#[tokio::test]
async fn test_health_ok() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "uptime", rpc_ok(json!(3600)));
	expect_call(&mut transport, "getblockchaininfo", rpc_ok(blockchain_info(false)));

	let health = adapter(transport)
		.get_health(&CancelSignal::never())
		.await
		.unwrap();
	assert!(health.is_healthy);
	assert_eq!(health.message.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_health_folds_transport_failure() {
	let mut transport = MockLedgerTransport::new();
	expect_transport_failure(&mut transport, "uptime");

	let health = adapter(transport)
		.get_health(&CancelSignal::never())
		.await
		.unwrap();
	assert!(!health.is_healthy);
	assert!(health.message.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_health_reports_initial_block_download() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "uptime", rpc_ok(json!(10)));
	expect_call(&mut transport, "getblockchaininfo", rpc_ok(blockchain_info(true)));

	let health = adapter(transport)
		.get_health(&CancelSignal::never())
		.await
		.unwrap();
	assert!(!health.is_healthy);
}

#[tokio::test]
async fn test_get_version_parses_subversion() {
	let mut transport = MockLedgerTransport::new();
	let info = json!({"version": 270000, "subversion": "/Satoshi:27.0.0/"});
	expect_call(&mut transport, "getnetworkinfo", rpc_ok(info.clone()));

	let version = adapter(transport)
		.get_version(&CancelSignal::never())
		.await
		.unwrap();
	assert_eq!(version.client_name.as_deref(), Some("Satoshi"));
	assert_eq!(version.client_version.as_deref(), Some("27.0.0"));
	assert_eq!(version.raw, Some(info));
}

#[tokio::test]
async fn test_get_network_info() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "getblockchaininfo", rpc_ok(blockchain_info(false)));
	expect_call_with(&mut transport, "getblockhash", json!([0]), rpc_ok(json!(GENESIS)));

	let info = adapter(transport)
		.get_network_info(&CancelSignal::never())
		.await
		.unwrap();
	assert_eq!(info.network_name.as_deref(), Some("main"));
	assert_eq!(info.genesis_id.as_deref(), Some(GENESIS));
	assert_eq!(info.chain_id, None);
}

#[tokio::test]
async fn test_get_sync_status() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "getblockchaininfo", rpc_ok(blockchain_info(false)));

	let status = adapter(transport)
		.get_sync_status(&CancelSignal::never())
		.await
		.unwrap();
	assert!(status.is_synced);
	assert_eq!(status.progress, Some(0.9999987));
	assert_eq!(status.stage.as_deref(), Some("synced"));
}

#[tokio::test]
async fn test_get_head_passes_raw_through() {
	let mut transport = MockLedgerTransport::new();
	expect_call(&mut transport, "getblockchaininfo", rpc_ok(blockchain_info(false)));

	let head = adapter(transport)
		.get_head(&CancelSignal::never())
		.await
		.unwrap();
	assert_eq!(head.height_like, Some(840000));
	assert_eq!(head.slot_like, None);
	assert_eq!(
		head.head_id.as_deref(),
		Some("0000000000000000000320283a032748cef8227873ff4872689bf23f1cda83a5")
	);
	assert_eq!(head.raw, Some(blockchain_info(false)));
}

#[tokio::test]
async fn test_get_block_by_number() {
	let mut transport = MockLedgerTransport::new();
	let block = json!({
		"hash": GENESIS,
		"height": 0,
		"time": 1231006505,
		"tx": ["4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"]
	});
	expect_call_with(&mut transport, "getblockhash", json!([0]), rpc_ok(json!(GENESIS)));
	expect_call_with(&mut transport, "getblock", json!([GENESIS, 1]), rpc_ok(block.clone()));

	let id = BlockIdentifier::by_number(0);
	let result = adapter(transport)
		.get_block(&id, BlockReadOptions::default(), &CancelSignal::never())
		.await
		.unwrap()
		.unwrap();

	assert_eq!(result.canonical_id, id);
	assert_eq!(result.hash.as_deref(), Some(GENESIS));
	assert_eq!(result.number_or_height, Some(0));
	assert_eq!(result.time.unwrap().timestamp(), 1231006505);
	assert_eq!(result.transactions.unwrap().len(), 1);
	assert_eq!(result.raw, Some(block));
}

#[tokio::test]
async fn test_get_block_header_only() {
	let mut transport = MockLedgerTransport::new();
	let header = json!({"hash": GENESIS, "height": 0, "time": 1231006505});
	expect_call_with(
		&mut transport,
		"getblockheader",
		json!([GENESIS, true]),
		rpc_ok(header),
	);

	let result = adapter(transport)
		.get_block(
			&BlockIdentifier::by_hash(GENESIS),
			BlockReadOptions::header_only(),
			&CancelSignal::never(),
		)
		.await
		.unwrap()
		.unwrap();
	assert!(result.transactions.is_none());
}

#[tokio::test]
async fn test_get_block_without_transactions() {
	let mut transport = MockLedgerTransport::new();
	let block = json!({
		"hash": GENESIS,
		"height": 0,
		"time": 1231006505,
		"tx": ["4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"]
	});
	expect_call_with(&mut transport, "getblock", json!([GENESIS, 1]), rpc_ok(block.clone()));

	let result = adapter(transport)
		.get_block(
			&BlockIdentifier::by_hash(GENESIS),
			BlockReadOptions::without_transactions(),
			&CancelSignal::never(),
		)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(result.number_or_height, Some(0));
	assert!(result.transactions.is_none());
	assert_eq!(result.raw, Some(block));
}

#[tokio::test]
async fn test_get_block_by_slot_is_unsupported() {
	let result = adapter(silent_transport())
		.get_block(
			&BlockIdentifier::by_slot(5),
			BlockReadOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(result.is_none());
}

#[tokio::test]
async fn test_get_block_past_tip_is_absent() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"getblockhash",
		rpc_err(-8, "Block height out of range"),
	);

	let result = adapter(transport)
		.get_block(
			&BlockIdentifier::by_number(99_999_999),
			BlockReadOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(result.is_none());
}

#[tokio::test]
async fn test_get_transaction_decodes_hex() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"getrawtransaction",
		rpc_ok(json!({"txid": "abcd", "hex": "0200", "confirmations": 2})),
	);

	let tx = adapter(transport)
		.get_transaction(
			&TxId::new("abcd"),
			TxReadOptions { include_raw: true },
			&CancelSignal::never(),
		)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(tx.id, TxId::new("abcd"));
	assert_eq!(tx.raw_bytes, Some(vec![0x02, 0x00]));
}

#[tokio::test]
async fn test_get_transaction_without_raw_bytes() {
	let mut transport = MockLedgerTransport::new();
	let raw = json!({"txid": "abcd", "hex": "0200", "confirmations": 2});
	expect_call(&mut transport, "getrawtransaction", rpc_ok(raw.clone()));

	let tx = adapter(transport)
		.get_transaction(&TxId::new("abcd"), TxReadOptions::default(), &CancelSignal::never())
		.await
		.unwrap()
		.unwrap();
	assert!(tx.raw_bytes.is_none());
	assert_eq!(tx.raw, Some(raw));
}

#[tokio::test]
async fn test_unknown_transaction_status() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"getrawtransaction",
		rpc_err(-5, "No such mempool or blockchain transaction"),
	);

	let status = adapter(transport)
		.get_transaction_status(&TxId::new("abcd"), &CancelSignal::never())
		.await
		.unwrap();
	assert!(!status.is_known);
	assert!(!status.is_final);
}

#[tokio::test]
async fn test_transaction_status_depth() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"getrawtransaction",
		rpc_ok(json!({"txid": "abcd", "confirmations": 6})),
	);
	expect_call(
		&mut transport,
		"getrawtransaction",
		rpc_ok(json!({"txid": "abcd"})),
	);
	let adapter = adapter(transport);

	let deep = adapter
		.get_transaction_status(&TxId::new("abcd"), &CancelSignal::never())
		.await
		.unwrap();
	assert!(deep.is_known && deep.is_final);
	assert_eq!(deep.confirmations_like, Some(6));
	assert_eq!(deep.state.as_deref(), Some("confirmed"));

	let mempool = adapter
		.get_transaction_status(&TxId::new("abcd"), &CancelSignal::never())
		.await
		.unwrap();
	assert!(mempool.is_known && !mempool.is_final);
	assert_eq!(mempool.state.as_deref(), Some("mempool"));
}

#[tokio::test]
async fn test_broadcast_accepted() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"sendrawtransaction",
		json!(["0102"]),
		rpc_ok(json!("abcd")),
	);

	let result = adapter(transport)
		.broadcast_signed_transaction(
			&signed_bitcoin_tx(vec![1, 2]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(result.accepted);
	assert_eq!(result.tx_id, Some(TxId::new("abcd")));
	assert!(result.error.is_none());
}

#[tokio::test]
async fn test_broadcast_rejected_populates_error() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"sendrawtransaction",
		rpc_err(-26, "min relay fee not met"),
	);

	let result = adapter(transport)
		.broadcast_signed_transaction(
			&signed_bitcoin_tx(vec![1, 2]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(!result.accepted);
	assert!(result.error.unwrap().contains("min relay fee not met"));
}

#[tokio::test]
async fn test_broadcast_unsigned_makes_no_call() {
	let result = adapter(silent_transport())
		.broadcast_signed_transaction(
			&unsigned_bitcoin_tx(),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await;
	assert!(matches!(result, Err(AdapterError::InvalidInput(_))));
}

#[tokio::test]
async fn test_broadcast_foreign_transaction_makes_no_call() {
	let result = adapter(silent_transport())
		.broadcast_signed_transaction(
			&signed_ethereum_tx(vec![2, 3]),
			BroadcastOptions::default(),
			&CancelSignal::never(),
		)
		.await;
	assert!(result.unwrap_err().is_input_error());
}

#[tokio::test]
async fn test_estimate_fees_cheap() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"estimatesmartfee",
		json!([144, "ECONOMICAL"]),
		rpc_ok(json!({"feerate": 0.00001, "blocks": 144})),
	);

	let quote = adapter(transport)
		.estimate_fees(
			&FeeRequest::with_intent(FeeIntent::BroadcastCheap),
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert_eq!(quote.unit.as_deref(), Some("sat/vB"));
	assert_eq!(quote.value, Some(Decimal::from_str("1").unwrap()));
	assert!(!quote.value.unwrap().is_sign_negative());
}

#[tokio::test]
async fn test_preflight_rejected() {
	let mut transport = MockLedgerTransport::new();
	expect_call_with(
		&mut transport,
		"testmempoolaccept",
		json!([["0102"]]),
		rpc_ok(json!([{"txid": "abcd", "allowed": false, "reject-reason": "missing-inputs"}])),
	);

	let result = adapter(transport)
		.preflight_signed_transaction(&[1, 2], PreflightOptions::default(), &CancelSignal::never())
		.await
		.unwrap();
	assert!(!result.would_likely_succeed);
	assert_eq!(result.reason.as_deref(), Some("missing-inputs"));
}

#[tokio::test]
async fn test_preflight_allowed() {
	let mut transport = MockLedgerTransport::new();
	expect_call(
		&mut transport,
		"testmempoolaccept",
		rpc_ok(json!([{"txid": "abcd", "allowed": true}])),
	);

	let result = adapter(transport)
		.preflight_signed_transaction(
			&[1, 2],
			PreflightOptions {
				include_details: false,
			},
			&CancelSignal::never(),
		)
		.await
		.unwrap();
	assert!(result.would_likely_succeed);
	assert!(result.raw.is_none());
}
