//! Cooperative cancellation for adapter operations.
//!
//! A [`CancelHandle`] owns a `watch` channel; every [`CancelSignal`] cloned
//! from it observes the same flag. Adapters race each node call against the
//! signal and abandon the call once it fires.

use std::future::Future;

use tokio::sync::watch;

use crate::services::blockchain::AdapterError;

/// Sender side; cancels every signal derived from it
#[derive(Debug)]
pub struct CancelHandle {
	sender: watch::Sender<bool>,
}

/// Receiver side passed to every adapter operation
#[derive(Debug, Clone)]
pub struct CancelSignal {
	receiver: watch::Receiver<bool>,
}

impl CancelHandle {
	pub fn new() -> Self {
		let (sender, _) = watch::channel(false);
		Self { sender }
	}

	pub fn signal(&self) -> CancelSignal {
		CancelSignal {
			receiver: self.sender.subscribe(),
		}
	}

	/// Fires the signal; idempotent
	pub fn cancel(&self) {
		self.sender.send_replace(true);
	}

	pub fn is_cancelled(&self) -> bool {
		*self.sender.borrow()
	}
}

impl Default for CancelHandle {
	fn default() -> Self {
		Self::new()
	}
}

impl CancelSignal {
	/// A signal that never fires
	pub fn never() -> Self {
		let (_, receiver) = watch::channel(false);
		Self { receiver }
	}

	pub fn is_cancelled(&self) -> bool {
		*self.receiver.borrow()
	}

	/// Resolves once cancellation is requested
	///
	/// Stays pending forever when the handle is dropped without cancelling.
	pub async fn cancelled(&self) {
		let mut receiver = self.receiver.clone();
		if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
			std::future::pending::<()>().await;
		}
	}

	/// Runs `fut` unless cancellation wins the race
	pub async fn run<F, T>(&self, fut: F) -> Result<T, AdapterError>
	where
		F: Future<Output = Result<T, AdapterError>>,
	{
		if self.is_cancelled() {
			return Err(AdapterError::Cancelled);
		}

		tokio::select! {
			biased;
			_ = self.cancelled() => Err(AdapterError::Cancelled),
			result = fut => result,
		}
	}
}

impl Default for CancelSignal {
	fn default() -> Self {
		Self::never()
	}
}
