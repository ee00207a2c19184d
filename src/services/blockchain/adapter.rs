//! Ledger adapter capability.
//!
//! The one interface callers use regardless of the chain behind it. Every
//! implementation maps its node's JSON-RPC answers into the shared DTOs.

use async_trait::async_trait;

use crate::{
	models::{
		BlockChainType, BlockIdentifier, BlockReadOptions, BroadcastOptions, BroadcastResult,
		ChainHead, Currency, FeeQuote, FeeRequest, Health, LedgerBlock, LedgerTransaction,
		NetworkInfo, NodeVersion, PreflightOptions, PreflightResult, SyncStatus,
		TransactionInstance, TxReadOptions, TxId, TxStatus,
	},
	services::blockchain::{AdapterError, CancelSignal},
};

/// Defines the ledger-agnostic capability every chain adapter provides
///
/// Adapters hold no session state, so any number of calls may run
/// concurrently. Each operation races its node calls against `cancel` and
/// returns [`AdapterError::Cancelled`] once it fires. Adapters never retry.
#[async_trait]
pub trait LedgerAdapter: Send + Sync {
	/// The chain this adapter speaks to
	fn chain_type(&self) -> BlockChainType;

	/// Currency balances and fees are denominated in
	fn native_currency(&self) -> Currency {
		Currency::native(&self.chain_type())
	}

	/// Node liveness
	///
	/// Transport and RPC failures fold into `is_healthy = false` with a
	/// message; only cancellation is returned as an error.
	async fn get_health(&self, cancel: &CancelSignal) -> Result<Health, AdapterError>;

	/// Best-effort client identification
	async fn get_version(&self, cancel: &CancelSignal) -> Result<NodeVersion, AdapterError>;

	/// Chain identity (name, chain id, genesis)
	async fn get_network_info(&self, cancel: &CancelSignal) -> Result<NetworkInfo, AdapterError>;

	async fn get_sync_status(&self, cancel: &CancelSignal) -> Result<SyncStatus, AdapterError>;

	/// Current tip of the chain
	async fn get_head(&self, cancel: &CancelSignal) -> Result<ChainHead, AdapterError>;

	/// Fetches a block
	///
	/// Returns `Ok(None)` when the block does not exist or when the chain has
	/// no notion of the given identifier variant.
	async fn get_block(
		&self,
		id: &BlockIdentifier,
		options: BlockReadOptions,
		cancel: &CancelSignal,
	) -> Result<Option<LedgerBlock>, AdapterError>;

	/// Fetches a transaction, `Ok(None)` when the node does not know it
	async fn get_transaction(
		&self,
		id: &TxId,
		options: TxReadOptions,
		cancel: &CancelSignal,
	) -> Result<Option<LedgerTransaction>, AdapterError>;

	/// Inclusion and finality of a transaction
	///
	/// An unknown transaction yields [`TxStatus::unknown`], never an error.
	async fn get_transaction_status(
		&self,
		id: &TxId,
		cancel: &CancelSignal,
	) -> Result<TxStatus, AdapterError>;

	/// Submits a signed transaction
	///
	/// Fails with [`AdapterError::InvalidInput`] before any node call when the
	/// transaction is unsigned or belongs to another chain. Node rejections and
	/// transport failures fold into `accepted = false`.
	async fn broadcast_signed_transaction(
		&self,
		tx: &TransactionInstance,
		options: BroadcastOptions,
		cancel: &CancelSignal,
	) -> Result<BroadcastResult, AdapterError>;

	/// Fee estimate in the chain's native unit
	async fn estimate_fees(
		&self,
		request: &FeeRequest,
		cancel: &CancelSignal,
	) -> Result<FeeQuote, AdapterError>;

	/// Dry-runs a signed transaction without submitting it
	///
	/// Advisory only. Failures, including undecodable input, fold into
	/// `would_likely_succeed = false` with a reason.
	async fn preflight_signed_transaction(
		&self,
		signed_transaction: &[u8],
		options: PreflightOptions,
		cancel: &CancelSignal,
	) -> Result<PreflightResult, AdapterError>;
}
