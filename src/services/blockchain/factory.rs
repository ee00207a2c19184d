//! Ledger adapter factory.
//!
//! Builds the adapter matching a network's chain type, connected over HTTP and
//! configured with the network's finality policy.

use crate::{
	models::{BlockChainType, Network},
	services::blockchain::{
		transports::TransportError, AdapterError, BitcoinAdapter, EthereumAdapter, LedgerAdapter,
		SolanaAdapter,
	},
};

/// Creates the ledger adapter for a network
///
/// # Arguments
/// * `network` - Network configuration containing the chain type and connection details
///
/// # Returns
/// * `Result<Box<dyn LedgerAdapter>, AdapterError>` - Connected adapter, or a transport
///   error when no configured endpoint answers
pub async fn create_adapter(network: &Network) -> Result<Box<dyn LedgerAdapter>, AdapterError> {
	let connect_error = |e: anyhow::Error| {
		AdapterError::Transport(TransportError::configuration(format!("{:#}", e)))
	};

	let adapter: Box<dyn LedgerAdapter> = match network.network_type {
		BlockChainType::Bitcoin => {
			Box::new(BitcoinAdapter::new(network).await.map_err(connect_error)?)
		}
		BlockChainType::Ethereum => {
			Box::new(EthereumAdapter::new(network).await.map_err(connect_error)?)
		}
		BlockChainType::Solana => {
			Box::new(SolanaAdapter::new(network).await.map_err(connect_error)?)
		}
	};

	Ok(adapter)
}
