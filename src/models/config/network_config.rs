//! Network configuration loading and validation.

use std::path::Path;

use crate::models::{config::error::ConfigError, ConfigLoader, FinalityPolicy, Network};

const DEFAULT_NETWORK_DIR: &str = "config/networks";

impl ConfigLoader for Network {
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let network_dir = path.unwrap_or(Path::new(DEFAULT_NETWORK_DIR));
		let mut pairs = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error(format!(
				"networks directory not found: {}",
				network_dir.display()
			)));
		}

		for entry in std::fs::read_dir(network_dir)? {
			let entry = entry?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			match Self::load_from_path(&path) {
				Ok(network) => pairs.push((name, network)),
				Err(e) => {
					tracing::warn!("Skipping network config {}: {}", path.display(), e);
				}
			}
		}

		Ok(T::from_iter(pairs))
	}

	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path)?;
		let config: Network = serde_json::from_reader(file)?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		// Validate slug
		if self.slug.is_empty()
			|| !self
				.slug
				.chars()
				.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and underscores",
			));
		}

		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error("Name must not be empty"));
		}

		// Validate RPC URL types
		let supported_types = ["rpc"];
		if !self
			.rpc_urls
			.iter()
			.all(|rpc_url| supported_types.contains(&rpc_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(format!(
				"RPC URL type must be one of: {}",
				supported_types.join(", ")
			)));
		}

		// Validate RPC URLs format
		if !self.rpc_urls.iter().all(|rpc_url| {
			rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("https://")
		}) {
			return Err(ConfigError::validation_error(
				"All RPC URLs must start with http:// or https://",
			));
		}

		// Validate RPC URL weights
		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err(ConfigError::validation_error(
				"All RPC URL weights must be between 0 and 100",
			));
		}

		if !self.rpc_urls.iter().any(|rpc_url| rpc_url.weight > 0) {
			return Err(ConfigError::validation_error(
				"At least one RPC URL must have a weight greater than 0",
			));
		}

		if let Some(FinalityPolicy::Confirmations(0)) = self.finality {
			return Err(ConfigError::validation_error(
				"Finality confirmations must be greater than 0",
			));
		}

		if self.request_timeout_ms == Some(0) {
			return Err(ConfigError::validation_error(
				"request_timeout_ms must be greater than 0",
			));
		}

		if self.rpc_password.is_some() && self.rpc_user.is_none() {
			return Err(ConfigError::validation_error(
				"rpc_password requires rpc_user",
			));
		}

		Ok(())
	}
}
