//! Cancellable hash-polling task.
//!
//! Hash-based tracking has no reliable native change notification, so the
//! history polls the address on a fixed interval. The poll is an explicit
//! task with a guaranteed cancellation path: [`PollTask::cancel`] aborts it,
//! and it exits on its own when the owning history is dropped.

use super::History;
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub(super) struct PollTask {
	handle: JoinHandle<()>,
}

impl PollTask {
	/// Spawns the polling loop on the ambient tokio runtime.
	///
	/// Returns `None` when no runtime is available; the host is then
	/// expected to drive [`History::check_url`] itself.
	pub(super) fn spawn(history: Weak<History>, interval: Duration) -> Option<Self> {
		let Ok(runtime) = tokio::runtime::Handle::try_current() else {
			debug!("no async runtime available, hash polling disabled");
			return None;
		};

		let handle = runtime.spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
			// The first tick completes immediately
			ticker.tick().await;

			loop {
				ticker.tick().await;
				let Some(history) = history.upgrade() else {
					break;
				};
				if let Err(err) = history.check_url() {
					// The poll loop has no caller to propagate to
					error!(error = %err, "handler failed during hash poll");
				}
			}
		});

		Some(Self { handle })
	}

	/// Aborts the polling loop.
	pub(super) fn cancel(&self) {
		self.handle.abort();
	}
}

impl Drop for PollTask {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

impl std::fmt::Debug for PollTask {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PollTask")
			.field("finished", &self.handle.is_finished())
			.finish()
	}
}
