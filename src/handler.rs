//! Handler registry for named route callables.
//!
//! Handlers are looked up by name at dispatch time. A route whose handler
//! name has no registered callable still counts as a successful match, so
//! observers can react to matches without an application handler existing.

use crate::error::HandlerError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Callable invoked with the decoded positional arguments of a match.
pub type RouteCallback =
	Arc<dyn Fn(&[Option<String>]) -> Result<(), HandlerError> + Send + Sync>;

/// Name-to-callable registry.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
	handlers: RwLock<HashMap<String, RouteCallback>>,
}

impl HandlerRegistry {
	/// Registers or replaces the callable for `name`.
	pub(crate) fn insert<F>(&self, name: &str, callback: F)
	where
		F: Fn(&[Option<String>]) -> Result<(), HandlerError> + Send + Sync + 'static,
	{
		self.handlers
			.write()
			.insert(name.to_string(), Arc::new(callback));
	}

	/// Looks up the callable for `name`.
	pub(crate) fn get(&self, name: &str) -> Option<RouteCallback> {
		self.handlers.read().get(name).cloned()
	}
}

impl std::fmt::Debug for HandlerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HandlerRegistry")
			.field("names", &self.handlers.read().keys().collect::<Vec<_>>())
			.finish()
	}
}
