//! Ledger adapter interfaces and implementations.
//!
//! Provides the chain-agnostic capability and its concrete implementations:
//!
//! - Ledger adapter capability trait
//! - Bitcoin, Ethereum and Solana adapters
//! - Network transport implementations
//! - Cancellation and error handling for adapter operations
//! - Adapter factory driven by network configuration

mod adapter;
mod adapters;
mod cancel;
mod error;
mod factory;
mod transports;

pub use adapter::LedgerAdapter;
pub use adapters::{BitcoinAdapter, EthereumAdapter, SolanaAdapter};
pub use cancel::{CancelHandle, CancelSignal};
pub use error::AdapterError;
pub use factory::create_adapter;
pub use transports::{
	probe_method, BasicAuth, BlockchainTransport, EndpointManager, HttpTransportClient,
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};
