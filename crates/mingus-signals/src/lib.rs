//! # Mingus Signals
//!
//! Typed synchronous signal dispatch.
//!
//! A [`Signal`] is a publish/subscribe channel with a fixed payload type.
//! Receivers are held weakly, so dropping the last strong reference to a
//! receiver disconnects it automatically; an optional `dispatch_uid` gives a
//! stable identity for replace-on-reconnect and explicit disconnection.
//!
//! ## Examples
//!
//! ```rust
//! use mingus_signals::Signal;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let signal: Signal<String> = Signal::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = seen.clone();
//! signal.connect(Arc::new(move |_payload: &String| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! signal.send(&"hello".to_string());
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

mod signal;

pub use signal::{ReceiverFn, Signal};
