//! HTTP transport implementation for ledger JSON-RPC endpoints.
//!
//! Provides a JSON-RPC over HTTP client supporting:
//! - Multiple weighted RPC endpoints with automatic failover
//! - Exponential-backoff retries for transient failures
//! - Basic authentication (Bitcoin Core style)
//! - Connection probing before an endpoint is used

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
	policies::ExponentialBackoff, DefaultRetryableStrategy, Jitter, Retryable,
	RetryTransientMiddleware, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::{
	models::{BlockChainType, Network},
	services::blockchain::transports::{
		endpoint_manager::BasicAuth, BlockchainTransport, EndpointManager, RotatingTransport,
		TransportError,
	},
};

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// JSON-RPC method used to check that an endpoint answers
///
/// Chosen per chain so the probe is cheap and never mutates state.
pub fn probe_method(chain: &BlockChainType) -> &'static str {
	match chain {
		BlockChainType::Bitcoin => "getblockcount",
		BlockChainType::Ethereum => "net_version",
		BlockChainType::Solana => "getVersion",
	}
}

/// Retry strategy that leaves JSON-RPC error replies alone
///
/// Bitcoin Core answers failed calls with HTTP 500 and a JSON error body.
/// Those are final answers: retrying them repeats lookups and re-submits
/// rejected transactions. Everything else follows the default strategy.
#[derive(Clone, Copy, Debug, Default)]
struct JsonRpcRetryStrategy;

impl JsonRpcRetryStrategy {
	fn is_json_rpc_error(response: &Response) -> bool {
		response.status() == StatusCode::INTERNAL_SERVER_ERROR
			&& response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.is_some_and(|value| value.contains("json"))
	}
}

impl RetryableStrategy for JsonRpcRetryStrategy {
	fn handle(&self, res: &Result<Response, reqwest_middleware::Error>) -> Option<Retryable> {
		match res {
			Ok(response) if Self::is_json_rpc_error(response) => None,
			_ => DefaultRetryableStrategy.handle(res),
		}
	}
}

/// JSON-RPC over HTTP transport
///
/// Cheap to clone; clones share the endpoint state.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	endpoint_manager: EndpointManager,
	probe_method: &'static str,
}

impl HttpTransportClient {
	/// Creates a transport connected to the highest-weighted reachable endpoint
	///
	/// Endpoints are tried in descending weight order; the first that answers
	/// the probe becomes active and the rest become fallbacks.
	pub async fn new(network: &Network) -> Result<Self, anyhow::Error> {
		let mut rpc_urls: Vec<_> = network
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.collect();

		rpc_urls.sort_by(|a, b| b.weight.cmp(&a.weight));

		let retry_policy = ExponentialBackoff::builder()
			.base(2)
			.retry_bounds(Duration::from_millis(100), Duration::from_secs(4))
			.jitter(Jitter::None)
			.build_with_max_retries(2);

		let base_client = Client::builder()
			.timeout(Duration::from_millis(
				network
					.request_timeout_ms
					.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
			))
			.pool_max_idle_per_host(10)
			.pool_idle_timeout(Some(Duration::from_secs(90)))
			.build()
			.context("Failed to create HTTP client")?;

		let client = ClientBuilder::new(base_client)
			.with(RetryTransientMiddleware::new_with_policy_and_strategy(
				retry_policy,
				JsonRpcRetryStrategy,
			))
			.build();

		let auth = network.rpc_user.as_ref().map(|user| BasicAuth {
			user: user.clone(),
			password: network.rpc_password.clone(),
		});

		let probe_method = probe_method(&network.network_type);

		for rpc_url in rpc_urls.iter() {
			if Url::parse(&rpc_url.url).is_err() {
				tracing::warn!("Skipping invalid RPC URL: {}", rpc_url.url);
				continue;
			}

			if let Err(e) = probe(&client, &rpc_url.url, auth.as_ref(), probe_method).await {
				tracing::warn!("RPC URL {} failed its probe: {}", rpc_url.url, e);
				continue;
			}

			let fallback_urls: Vec<String> = rpc_urls
				.iter()
				.filter(|url| url.url != rpc_url.url)
				.map(|url| url.url.clone())
				.collect();

			return Ok(Self {
				endpoint_manager: EndpointManager::new(client, &rpc_url.url, fallback_urls, auth),
				probe_method,
			});
		}

		Err(anyhow::anyhow!(
			"All RPC URLs failed to connect for network {}",
			network.slug
		))
	}
}

/// Sends a single probe request, without rotation
async fn probe(
	client: &ClientWithMiddleware,
	url: &str,
	auth: Option<&BasicAuth>,
	method: &str,
) -> Result<(), TransportError> {
	let test_request = json!({
		"jsonrpc": "2.0",
		"id": 1,
		"method": method,
		"params": []
	});

	let mut request = client.post(url).json(&test_request);
	if let Some(auth) = auth {
		request = request.basic_auth(&auth.user, auth.password.as_ref());
	}

	let response = request.send().await.map_err(|e| {
		TransportError::network(format!("Failed to connect to {}", url), Some(Box::new(e)))
	})?;

	let status = response.status();
	if !status.is_success() {
		return Err(TransportError::http(
			status.as_u16(),
			url,
			response.text().await.unwrap_or_default(),
		));
	}
	Ok(())
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), TransportError> {
		Url::parse(url)
			.map_err(|_| TransportError::configuration(format!("Invalid URL: {}", url)))?;
		probe(
			self.endpoint_manager.client(),
			url,
			self.endpoint_manager.auth(),
			self.probe_method,
		)
		.await
	}

	async fn update_client(&self, url: &str) -> Result<(), TransportError> {
		// Requests read the active URL per call, so only validation is needed
		Url::parse(url)
			.map(|_| ())
			.map_err(|_| TransportError::configuration(format!("Invalid URL: {}", url)))
	}
}
