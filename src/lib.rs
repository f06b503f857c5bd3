//! # Mingus
//!
//! Client-side URL routing engine: a route-pattern compiler, a dispatcher,
//! and an abstracted browser navigation history.
//!
//! ## Overview
//!
//! Three pieces, compiler feeding dispatcher feeding history:
//!
//! - [`RoutePattern`] compiles route syntax (`search/:query`, `docs/*path`,
//!   `:entity?*args`) into an anchored matcher with ordered,
//!   percent-decoded captures.
//! - [`Router`] holds compiled routes in reverse registration order (newest
//!   wins), invokes handlers by name, and announces every match on a
//!   generic and a per-route signal.
//! - [`History`] tracks the current fragment against an abstracted document
//!   address, choosing between path-based tracking (push/replace navigation
//!   API) and hash-based tracking (polling), with root-prefix
//!   normalization.
//!
//! ```text
//! address change → History → Router → handler(args)
//!                                   ↓
//!                                Signals
//!                        (generic + per-route)
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use mingus::{History, MemoryLocation, Router, StartConfig};
//! use std::sync::Arc;
//!
//! let router = Arc::new(Router::new());
//! router.add_route("search/:query", "search").unwrap();
//! router.handler("search", |args| {
//!     assert_eq!(args[0].as_deref(), Some("news"));
//!     Ok(())
//! });
//!
//! let location = Arc::new(MemoryLocation::new("http://example.com#search/news"));
//! let history = Arc::new(History::new(router, location, None));
//!
//! let matched = history.start(StartConfig::default()).unwrap();
//! assert!(matched);
//!
//! history.navigate("search/tulips", false).unwrap();
//! assert_eq!(history.fragment().as_deref(), Some("search/tulips"));
//! ```

mod error;
mod events;
mod handler;
mod pattern;
mod router;

pub mod history;

pub use error::{HandlerError, HistoryError, RouterError};
pub use events::RouteEvent;
pub use handler::RouteCallback;
pub use history::{
	History, LocationProvider, MemoryLocation, NavigateOptions, NavigationApi, StartConfig,
};
pub use pattern::{RouteArgs, RoutePattern};
pub use router::{CompiledRoute, Router};
