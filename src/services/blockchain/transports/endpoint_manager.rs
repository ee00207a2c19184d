//! Manages the rotation of ledger RPC endpoints
//!
//! Sends requests to the active endpoint and falls back to the remaining
//! endpoints on network failures or rate limiting.
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::transports::{
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};

/// Basic-auth credentials attached to every request
#[derive(Clone, Debug)]
pub struct BasicAuth {
	pub user: String,
	pub password: Option<String>,
}

/// Active endpoint plus fallbacks, shared by clones of a transport
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	auth: Option<BasicAuth>,
	rotation_lock: Arc<Mutex<()>>,
}

/// How a single attempt against one URL ended
#[derive(Debug)]
enum AttemptOutcome {
	/// Got a response (status might still be an error)
	Response(reqwest::Response),
	/// Error during send (connection, timeout)
	NetworkError(reqwest_middleware::Error),
}

impl EndpointManager {
	pub fn new(
		client: ClientWithMiddleware,
		active_url: &str,
		fallback_urls: Vec<String>,
		auth: Option<BasicAuth>,
	) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			client,
			auth,
			rotation_lock: Arc::new(Mutex::new(())),
		}
	}

	/// The HTTP client requests go through
	pub fn client(&self) -> &ClientWithMiddleware {
		&self.client
	}

	/// Credentials attached to every request, if configured
	pub fn auth(&self) -> Option<&BasicAuth> {
		self.auth.as_ref()
	}

	/// Rotates to the next available URL
	///
	/// The previous active URL moves to the back of the fallback list; a
	/// fallback that fails its connection probe is kept for later attempts.
	pub async fn rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<(), TransportError> {
		let _guard = self.rotation_lock.lock().await;

		let current_active = self.active_url.read().await.clone();

		let new_url = {
			let mut fallback_urls = self.fallback_urls.write().await;
			match fallback_urls.iter().position(|url| url != &current_active) {
				Some(pos) => fallback_urls.remove(pos),
				None => {
					return Err(TransportError::url_rotation(
						format!(
							"No fallback URLs available for rotation. Current active URL: {}",
							current_active
						),
						None,
					));
				}
			}
		};

		let connected = match transport.try_connect(&new_url).await {
			Ok(()) => transport.update_client(&new_url).await.is_ok(),
			Err(_) => false,
		};

		if connected {
			let mut active_url = self.active_url.write().await;
			let mut fallback_urls = self.fallback_urls.write().await;
			tracing::debug!(
				"Successful rotation - from: {}, to: {}",
				current_active,
				new_url
			);
			fallback_urls.push(current_active);
			*active_url = new_url;
			Ok(())
		} else {
			let message = format!(
				"Failed to connect to new URL: {}. Retaining it in fallback list.",
				&new_url
			);
			self.fallback_urls.write().await.push(new_url);
			Err(TransportError::url_rotation(message, None))
		}
	}

	/// Rotates when fallbacks exist and the failure warrants it
	///
	/// Network failures always warrant rotation; HTTP failures only when the
	/// status is in [`ROTATE_ON_ERROR_CODES`]. Returns `Ok(true)` when the
	/// caller should retry on the new endpoint.
	async fn should_attempt_rotation<T: RotatingTransport>(
		&self,
		transport: &T,
		status: Option<u16>,
	) -> Result<bool, TransportError> {
		let should_rotate = {
			let fallback_urls = self.fallback_urls.read().await;
			!fallback_urls.is_empty()
				&& status.is_none_or(|s| ROTATE_ON_ERROR_CODES.contains(&s))
		};

		if !should_rotate {
			return Ok(false);
		}

		self.rotate_url(transport).await.map(|_| true).map_err(|e| {
			TransportError::url_rotation("Endpoint rotation failed", Some(Box::new(e)))
		})
	}

	async fn attempt_request_on_url(&self, url: &str, body: String) -> AttemptOutcome {
		let mut request = self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.body(body);

		if let Some(auth) = &self.auth {
			request = request.basic_auth(&auth.user, auth.password.as_ref());
		}

		match request.send().await {
			Ok(response) => AttemptOutcome::Response(response),
			Err(network_error) => AttemptOutcome::NetworkError(network_error),
		}
	}

	/// Sends a JSON-RPC request with automatic URL rotation on failure
	///
	/// Returns the parsed response envelope of the first successful HTTP
	/// exchange. JSON-RPC level errors inside a 2xx response are returned as
	/// ordinary envelopes.
	pub async fn send_raw_request<
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError> {
		let request_body = transport.customize_request(method, params).await;
		let body = serde_json::to_string(&request_body).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
			)
		})?;

		// Every endpoint gets at most one turn per request
		let mut rotations_left = self.fallback_urls.read().await.len();

		loop {
			let current_url = self.active_url.read().await.clone();

			match self.attempt_request_on_url(&current_url, body.clone()).await {
				AttemptOutcome::Response(response) => {
					let status = response.status();
					if status.is_success() {
						return response.json().await.map_err(|e| {
							TransportError::response_parse(
								"Failed to parse JSON response",
								Some(Box::new(e)),
							)
						});
					}

					let error_body = response.text().await.unwrap_or_default();

					// Bitcoin Core reports JSON-RPC errors with HTTP 404/500 and a JSON body
					if let Ok(envelope) = serde_json::from_str::<Value>(&error_body) {
						if envelope.get("error").is_some_and(|e| !e.is_null()) {
							return Ok(envelope);
						}
					}

					tracing::warn!(
						"Request {} to {} failed with status {}: {}",
						method,
						current_url,
						status,
						error_body
					);

					if rotations_left > 0
						&& self
							.should_attempt_rotation(transport, Some(status.as_u16()))
							.await?
					{
						rotations_left -= 1;
						continue;
					}

					return Err(TransportError::http(
						status.as_u16(),
						current_url,
						error_body,
					));
				}
				AttemptOutcome::NetworkError(network_error) => {
					tracing::warn!(
						"Network error while sending {} to {}: {}",
						method,
						current_url,
						network_error
					);

					if rotations_left > 0
						&& self.should_attempt_rotation(transport, None).await?
					{
						rotations_left -= 1;
						continue;
					}

					return Err(TransportError::network(
						format!("Failed to send request to {}", current_url),
						Some(Box::new(network_error)),
					));
				}
			}
		}
	}
}
