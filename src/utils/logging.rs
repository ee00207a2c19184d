//! Logging setup for applications embedding the ledger adapters
//!
//! Adapters only open `debug` spans and transports only emit endpoint
//! warnings; nothing is printed until the host installs a subscriber. The
//! helpers here install a `tracing_subscriber` registry with an `EnvFilter`
//! and a compact formatter.
use tracing::Subscriber;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

type SetupError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
	/// Filter directives; when unset, `RUST_LOG` is used, then `info`
	pub filter: Option<String>,
	/// Colorize output
	pub ansi: bool,
}

impl Default for LoggingOptions {
	fn default() -> Self {
		Self {
			filter: None,
			ansi: true,
		}
	}
}

impl LoggingOptions {
	fn env_filter(&self) -> EnvFilter {
		match &self.filter {
			Some(directives) => EnvFilter::new(directives),
			None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		}
	}
}

/// Installs the global subscriber, writing to stdout
pub fn setup_logging() -> Result<(), SetupError> {
	setup_logging_with_writer(std::io::stdout, &LoggingOptions::default())
}

/// Installs the global subscriber with a custom writer
pub fn setup_logging_with_writer<W>(writer: W, options: &LoggingOptions) -> Result<(), SetupError>
where
	W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing::subscriber::set_global_default(build_subscriber(writer, options))?;
	Ok(())
}

/// Builds the subscriber without installing it
pub fn build_subscriber<W>(writer: W, options: &LoggingOptions) -> impl Subscriber + Send + Sync
where
	W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry().with(options.env_filter()).with(
		fmt::layer()
			.with_writer(writer)
			.event_format(
				fmt::format()
					.with_level(true)
					.with_target(true)
					.with_thread_ids(false)
					.with_thread_names(false)
					.with_ansi(options.ansi)
					.compact(),
			)
			.fmt_fields(fmt::format::PrettyFields::new()),
	)
}
