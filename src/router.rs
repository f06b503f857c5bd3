//! Route registration and dispatch.

use crate::error::{HandlerError, RouterError};
use crate::events::{RouteEvent, RouteSignals};
use crate::handler::{HandlerRegistry, RouteCallback};
use crate::pattern::{RouteArgs, RoutePattern};
use mingus_signals::Signal;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// A compiled pattern bound to a handler name.
#[derive(Debug)]
pub struct CompiledRoute {
	pattern: RoutePattern,
	handler: String,
}

impl CompiledRoute {
	/// Returns the route's pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the handler name this route dispatches to.
	pub fn handler_name(&self) -> &str {
		&self.handler
	}
}

/// The route dispatcher.
///
/// Routes are tried in reverse registration order: registration prepends, so
/// the most recently added route wins among overlapping patterns. A fragment
/// matching no route is not an error; callers wanting a fallback register a
/// catch-all splat pattern first, which is therefore checked last.
pub struct Router {
	/// Compiled routes, most recently registered first.
	routes: RwLock<Vec<Arc<CompiledRoute>>>,
	/// Named handler callables.
	handlers: HandlerRegistry,
	/// Match notification signals.
	signals: RouteSignals,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes_count", &self.routes.read().len())
			.field("handlers", &self.handlers)
			.finish()
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl Router {
	/// Creates an empty router.
	pub fn new() -> Self {
		Self {
			routes: RwLock::new(Vec::new()),
			handlers: HandlerRegistry::default(),
			signals: RouteSignals::default(),
		}
	}

	/// Compiles `pattern` and registers it under `handler_name`.
	///
	/// The new route is prepended: it is checked before every previously
	/// registered route.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] when the pattern does not
	/// compile.
	pub fn add_route(&self, pattern: &str, handler_name: &str) -> Result<(), RouterError> {
		let compiled = RoutePattern::new(pattern)?;
		self.routes.write().insert(
			0,
			Arc::new(CompiledRoute {
				pattern: compiled,
				handler: handler_name.to_string(),
			}),
		);
		Ok(())
	}

	/// Registers or replaces the callable invoked for `name`.
	pub fn handler<F>(&self, name: &str, callback: F)
	where
		F: Fn(&[Option<String>]) -> Result<(), HandlerError> + Send + Sync + 'static,
	{
		self.handlers.insert(name, callback);
	}

	/// Matches `fragment` against the registered routes and dispatches the
	/// first hit.
	///
	/// On a match the captured arguments are percent-decoded individually
	/// and passed positionally to the handler registered under the route's
	/// name; a missing handler leaves the match successful with no
	/// application code run. The per-route and generic match signals fire
	/// after the handler returns.
	///
	/// Returns `Ok(true)` when a route matched, `Ok(false)` when none did.
	///
	/// # Errors
	///
	/// A handler failure propagates as [`RouterError::Handler`]; the match
	/// signals for that dispatch do not fire.
	pub fn dispatch(&self, fragment: &str) -> Result<bool, RouterError> {
		// Snapshot so re-entrant registration cannot disturb iteration
		let routes: Vec<Arc<CompiledRoute>> = self.routes.read().clone();

		for route in routes {
			let Some(args) = route.pattern.captures(fragment) else {
				continue;
			};
			trace!(
				pattern = route.pattern.pattern(),
				handler = route.handler.as_str(),
				fragment,
				"route matched"
			);

			if let Some(handler) = self.handlers.get(&route.handler) {
				self.invoke(&handler, &route.handler, &args)?;
			}

			self.signals.emit(&RouteEvent {
				name: route.handler.clone(),
				args,
			});
			return Ok(true);
		}

		trace!(fragment, "no route matched");
		Ok(false)
	}

	fn invoke(
		&self,
		handler: &RouteCallback,
		name: &str,
		args: &RouteArgs,
	) -> Result<(), RouterError> {
		handler(args).map_err(|source| RouterError::Handler {
			name: name.to_string(),
			source,
		})
	}

	/// Subscribes to every route match.
	pub fn on_route<F>(&self, receiver: Arc<F>)
	where
		F: Fn(&RouteEvent) + Send + Sync + 'static,
	{
		self.signals.any().connect(receiver);
	}

	/// Subscribes to matches of the route named `name`.
	pub fn on_route_named<F>(&self, name: &str, receiver: Arc<F>)
	where
		F: Fn(&RouteEvent) + Send + Sync + 'static,
	{
		self.signals.named(name).connect(receiver);
	}

	/// The generic route-matched signal, for subscription management beyond
	/// [`Router::on_route`].
	pub fn route_signal(&self) -> Signal<RouteEvent> {
		self.signals.any()
	}

	/// The per-route signal for `name`.
	pub fn named_route_signal(&self, name: &str) -> Signal<RouteEvent> {
		self.signals.named(name)
	}

	/// Number of registered routes.
	pub fn route_count(&self) -> usize {
		self.routes.read().len()
	}

	/// The registered routes in match order (most recent first).
	pub fn routes(&self) -> Vec<Arc<CompiledRoute>> {
		self.routes.read().clone()
	}
}
