//! Domain models for ledger adapters.
//!
//! This module contains all the core data structures used throughout the crate:
//!
//! - `blockchain`: Chain-specific transaction instances (Bitcoin, Ethereum, Solana)
//! - `config`: Configuration loading and validation
//! - `core`: Identifiers, block identifiers, networks and transaction identity
//! - `ledger`: Normalized DTOs returned by every adapter

mod blockchain;
mod config;
mod core;
mod ledger;

// Re-export blockchain types
pub use blockchain::BlockChainType;

pub use blockchain::bitcoin::BitcoinTransaction;
pub use blockchain::ethereum::EthereumTransaction;
pub use blockchain::solana::{
	decode_short_u16, split_signed_transaction, SolanaTransaction, SIGNATURE_LENGTH,
};

// Re-export core types
pub use core::{
	Address, BlockIdentifier, Currency, FinalityPolicy, Network, RpcUrl, TransactionIdentity,
	TransactionInstance, TransactionKey, TransactionType, TxId, DEFAULT_BITCOIN_CONFIRMATIONS,
};

// Re-export ledger DTOs
pub use ledger::{
	BlockReadOptions, BroadcastOptions, BroadcastResult, ChainHead, FeeIntent, FeeQuote,
	FeeRequest, Health, LedgerBlock, LedgerTransaction, NetworkInfo, NodeVersion,
	PreflightOptions, PreflightResult, SyncStatus, TxReadOptions, TxStatus,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};
