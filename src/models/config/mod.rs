//! Configuration loading and validation.
//!
//! Network definitions are JSON files, one per network, read from a directory
//! (`config/networks` unless another path is given) and validated on load.

use std::path::Path;

mod error;
mod network_config;

pub use error::ConfigError;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	/// Loads every valid configuration in `path`, keyed by file stem
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>;

	/// Loads and validates a single configuration file
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
