//! Network transport implementations for ledger adapters.
//!
//! The transport is the collaborator boundary: adapters only ever speak
//! JSON-RPC through [`BlockchainTransport`], so any client (HTTP, WebSocket,
//! test doubles) can stand behind an adapter. Retries and endpoint failover
//! live here, never in the adapters.

mod endpoint_manager;
mod error;
mod http;

pub use endpoint_manager::{BasicAuth, EndpointManager};
pub use error::TransportError;
pub use http::{probe_method, HttpTransportClient};

use serde::Serialize;
use serde_json::{json, Value};

/// HTTP status codes that trigger RPC endpoint rotation
/// - 429: Too Many Requests - indicates rate limiting from the current endpoint
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the current URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a raw JSON-RPC request and return the full response envelope
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Customizes the request for specific blockchain requirements
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		// Default implementation for JSON-RPC
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into()).unwrap_or_else(|| json!([]))
		})
	}
}

/// Extension trait for transports that support URL rotation
#[async_trait::async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Attempts to establish a connection with a new URL
	async fn try_connect(&self, url: &str) -> Result<(), TransportError>;

	/// Updates the client with a new URL
	async fn update_client(&self, url: &str) -> Result<(), TransportError>;
}
