//! Route-match notification shapes.
//!
//! Every successful dispatch announces itself twice: on the per-route signal
//! for the matched handler name, then on the generic route-matched signal.
//! Both carry the same [`RouteEvent`] payload.

use mingus_signals::Signal;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Payload delivered when a route matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEvent {
	/// Handler name of the matched route.
	pub name: String,
	/// Decoded positional arguments; `None` for an absent optional group.
	pub args: Vec<Option<String>>,
}

/// Signal hub owned by a router: one generic signal plus per-route signals.
#[derive(Debug, Default)]
pub(crate) struct RouteSignals {
	any: Signal<RouteEvent>,
	named: RwLock<HashMap<String, Signal<RouteEvent>>>,
}

impl RouteSignals {
	/// The generic route-matched signal.
	pub(crate) fn any(&self) -> Signal<RouteEvent> {
		self.any.clone()
	}

	/// The signal for one handler name, created on first use.
	pub(crate) fn named(&self, name: &str) -> Signal<RouteEvent> {
		if let Some(signal) = self.named.read().get(name) {
			return signal.clone();
		}
		self.named
			.write()
			.entry(name.to_string())
			.or_default()
			.clone()
	}

	/// Announces a match: specific signal first, generic second.
	pub(crate) fn emit(&self, event: &RouteEvent) {
		let named = self.named.read().get(&event.name).cloned();
		if let Some(signal) = named {
			signal.send(event);
		}
		self.any.send(event);
	}
}
