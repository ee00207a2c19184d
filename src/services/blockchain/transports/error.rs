//! Transport error types.
//!
//! Errors raised while moving JSON-RPC requests to and from a node. They say
//! nothing about the meaning of the response; JSON-RPC error objects are
//! interpreted by the adapters.

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents possible errors during transport operations
#[derive(Debug, Error)]
pub enum TransportError {
	/// The node answered with a non-success HTTP status
	#[error("HTTP error: status {status} from {url}: {body}")]
	Http {
		status: u16,
		url: String,
		body: String,
	},

	/// The request never got an answer (connection refused, timeout, ...)
	#[error("Network error: {message}")]
	Network {
		message: String,
		#[source]
		source: Option<BoxedSource>,
	},

	/// The response body was not valid JSON
	#[error("Response parse error: {message}")]
	ResponseParse {
		message: String,
		#[source]
		source: Option<BoxedSource>,
	},

	/// The request body could not be serialized
	#[error("Request serialization error: {message}")]
	RequestSerialization {
		message: String,
		#[source]
		source: Option<BoxedSource>,
	},

	/// Switching to a fallback endpoint failed
	#[error("URL rotation error: {message}")]
	UrlRotation {
		message: String,
		#[source]
		source: Option<BoxedSource>,
	},

	/// The transport could not be built from its configuration
	#[error("Transport configuration error: {0}")]
	Configuration(String),
}

impl TransportError {
	pub fn http(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
		Self::Http {
			status,
			url: url.into(),
			body: body.into(),
		}
	}

	pub fn network(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::Network {
			message: message.into(),
			source,
		}
	}

	pub fn response_parse(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::ResponseParse {
			message: message.into(),
			source,
		}
	}

	pub fn request_serialization(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::RequestSerialization {
			message: message.into(),
			source,
		}
	}

	pub fn url_rotation(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
		Self::UrlRotation {
			message: message.into(),
			source,
		}
	}

	pub fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration(message.into())
	}
}
