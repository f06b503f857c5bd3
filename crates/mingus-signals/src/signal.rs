//! Synchronous signal dispatcher with typed payloads.

use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// Receiver function type for a signal carrying `T`.
pub type ReceiverFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Synchronous signal with a fixed payload type.
pub struct Signal<T> {
	receivers: Arc<RwLock<Vec<SignalReceiver<T>>>>,
}

struct SignalReceiver<T> {
	receiver: Weak<dyn Fn(&T) + Send + Sync>,
	dispatch_uid: Option<String>,
	// Keep a strong reference when the caller transferred ownership,
	// otherwise the weak handle would die immediately.
	_strong_ref: Option<ReceiverFn<T>>,
}

impl<T> Signal<T> {
	/// Create a new signal with no receivers.
	pub fn new() -> Self {
		Self {
			receivers: Arc::new(RwLock::new(Vec::new())),
		}
	}

	/// Connect a receiver to this signal.
	pub fn connect<F>(&self, receiver: Arc<F>)
	where
		F: Fn(&T) + Send + Sync + 'static,
	{
		self.connect_inner(receiver, None);
	}

	/// Connect a receiver under a `dispatch_uid`.
	///
	/// A later connection with the same uid replaces the earlier one.
	pub fn connect_with_uid<F>(&self, receiver: Arc<F>, dispatch_uid: impl Into<String>)
	where
		F: Fn(&T) + Send + Sync + 'static,
	{
		self.connect_inner(receiver, Some(dispatch_uid.into()));
	}

	fn connect_inner<F>(&self, receiver: Arc<F>, dispatch_uid: Option<String>)
	where
		F: Fn(&T) + Send + Sync + 'static,
	{
		// Check if the caller kept other references before converting
		let should_store_strong = Arc::strong_count(&receiver) == 1;

		let receiver_arc: ReceiverFn<T> = receiver;
		let weak_receiver = Arc::downgrade(&receiver_arc);
		let mut receivers = self.receivers.write();

		// Remove existing receiver with same dispatch_uid
		if let Some(ref uid) = dispatch_uid {
			receivers.retain(|r| r.dispatch_uid.as_ref() != Some(uid));
		}

		// Prevent duplicate registrations of the same callable
		let receiver_ptr = weak_receiver.as_ptr();
		receivers.retain(|r| !std::ptr::addr_eq(r.receiver.as_ptr(), receiver_ptr));

		receivers.push(SignalReceiver {
			receiver: weak_receiver,
			dispatch_uid,
			_strong_ref: if should_store_strong {
				Some(receiver_arc)
			} else {
				None
			},
		});
	}

	/// Disconnect a receiver by `dispatch_uid`.
	///
	/// When `dispatch_uid` is `None`, disconnects all receivers. Returns
	/// whether anything was removed.
	pub fn disconnect(&self, dispatch_uid: Option<&str>) -> bool {
		let mut receivers = self.receivers.write();
		let original_len = receivers.len();

		if let Some(uid) = dispatch_uid {
			receivers.retain(|r| r.dispatch_uid.as_deref() != Some(uid));
		} else {
			receivers.clear();
		}

		receivers.len() < original_len
	}

	/// Send the payload to all live receivers, in connection order.
	pub fn send(&self, payload: &T) {
		self.clear_dead_receivers();
		let receivers: Vec<_> = self
			.receivers
			.read()
			.iter()
			.filter_map(|r| r.receiver.upgrade())
			.collect();

		for receiver in receivers {
			receiver(payload);
		}
	}

	/// Send the payload, catching receiver panics.
	///
	/// Returns one entry per live receiver: `Ok(())` on normal return, `Err`
	/// with a description when the receiver panicked.
	pub fn send_robust(&self, payload: &T) -> Vec<Result<(), String>> {
		self.clear_dead_receivers();
		let receivers: Vec<_> = self
			.receivers
			.read()
			.iter()
			.filter_map(|r| r.receiver.upgrade())
			.collect();

		let mut results = Vec::with_capacity(receivers.len());
		for receiver in receivers {
			let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
				receiver(payload);
			}));
			results.push(outcome.map_err(|_| "receiver panicked".to_string()));
		}
		results
	}

	/// Check whether any live receiver is connected.
	pub fn has_listeners(&self) -> bool {
		self.clear_dead_receivers();
		!self.receivers.read().is_empty()
	}

	/// Number of registered receivers (live or not yet pruned).
	pub fn receivers_count(&self) -> usize {
		self.receivers.read().len()
	}

	/// Drop receivers whose callable has been deallocated.
	pub fn clear_dead_receivers(&self) {
		let mut receivers = self.receivers.write();
		receivers.retain(|r| r.receiver.strong_count() > 0);
	}
}

impl<T> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			receivers: Arc::clone(&self.receivers),
		}
	}
}

impl<T> Default for Signal<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Signal")
			.field("receivers", &self.receivers.read().len())
			.finish()
	}
}
