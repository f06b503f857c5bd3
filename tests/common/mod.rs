//! Shared fixtures for integration tests.
#![allow(dead_code)]

use mingus::{LocationProvider, MemoryLocation, NavigationApi, RouteEvent, Router};
use parking_lot::Mutex;
use std::sync::Arc;

/// Mutable state the sample application's handlers write into.
#[derive(Debug, Default)]
pub struct AppState {
	pub query: Option<String>,
	pub page: Option<String>,
	pub contact: Option<String>,
	pub splat_args: Option<String>,
	pub first: Option<String>,
	pub part: Option<String>,
	pub rest: Option<String>,
	pub entity: Option<String>,
	pub query_args: Option<String>,
	pub anything: Option<String>,
	pub count: usize,
}

fn arg(args: &[Option<String>], index: usize) -> Option<String> {
	args.get(index).cloned().flatten()
}

/// Builds a router with the sample application's route table.
///
/// Registration prepends, so the catch-all goes in first (checked last) and
/// the most specific routes go in last (checked first).
pub fn sample_router() -> (Arc<Router>, Arc<Mutex<AppState>>) {
	let router = Arc::new(Router::new());
	let state = Arc::new(Mutex::new(AppState::default()));

	for (pattern, name) in [
		("*anything", "anything"),
		(":entity?*args", "query"),
		("*first/complex-:part/*rest", "complex"),
		("splat/*args/end", "splat"),
		("contacts/:id", "load_contact"),
		("contacts/new", "new_contact"),
		("contacts", "contacts"),
		("search/:query/p:page", "search"),
		("search/:query", "search"),
		("counter", "counter"),
		("no_callback", "no_callback"),
	] {
		router.add_route(pattern, name).unwrap();
	}

	let s = state.clone();
	router.handler("counter", move |_| {
		s.lock().count += 1;
		Ok(())
	});
	let s = state.clone();
	router.handler("search", move |args| {
		let mut s = s.lock();
		s.query = arg(args, 0);
		s.page = arg(args, 1);
		Ok(())
	});
	let s = state.clone();
	router.handler("contacts", move |_| {
		s.lock().contact = Some("index".to_string());
		Ok(())
	});
	let s = state.clone();
	router.handler("new_contact", move |_| {
		s.lock().contact = Some("new".to_string());
		Ok(())
	});
	let s = state.clone();
	router.handler("load_contact", move |_| {
		s.lock().contact = Some("load".to_string());
		Ok(())
	});
	let s = state.clone();
	router.handler("splat", move |args| {
		s.lock().splat_args = arg(args, 0);
		Ok(())
	});
	let s = state.clone();
	router.handler("complex", move |args| {
		let mut s = s.lock();
		s.first = arg(args, 0);
		s.part = arg(args, 1);
		s.rest = arg(args, 2);
		Ok(())
	});
	let s = state.clone();
	router.handler("query", move |args| {
		let mut s = s.lock();
		s.entity = arg(args, 0);
		s.query_args = arg(args, 1);
		Ok(())
	});
	let s = state.clone();
	router.handler("anything", move |args| {
		s.lock().anything = arg(args, 0);
		Ok(())
	});

	(router, state)
}

/// Collects every generic route notification a router emits.
pub fn observe_routes(router: &Router) -> Arc<Mutex<Vec<RouteEvent>>> {
	let log = Arc::new(Mutex::new(Vec::new()));
	let sink = log.clone();
	router.on_route(Arc::new(move |event: &RouteEvent| {
		sink.lock().push(event.clone());
	}));
	log
}

/// Navigation API double that records every push/replace call.
#[derive(Debug, Default)]
pub struct RecordingNavigation {
	calls: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingNavigation {
	pub fn calls(&self) -> Vec<(&'static str, String)> {
		self.calls.lock().clone()
	}
}

impl NavigationApi for RecordingNavigation {
	fn push_state(&self, url: &str) {
		self.calls.lock().push(("push", url.to_string()));
	}

	fn replace_state(&self, url: &str) {
		self.calls.lock().push(("replace", url.to_string()));
	}
}

/// Location double that records mutating calls while behaving like
/// [`MemoryLocation`].
#[derive(Debug)]
pub struct RecordingLocation {
	inner: MemoryLocation,
	ops: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLocation {
	pub fn new(href: &str) -> Self {
		Self {
			inner: MemoryLocation::new(href),
			ops: Mutex::new(Vec::new()),
		}
	}

	pub fn ops(&self) -> Vec<(&'static str, String)> {
		self.ops.lock().clone()
	}
}

impl LocationProvider for RecordingLocation {
	fn href(&self) -> String {
		self.inner.href()
	}

	fn pathname(&self) -> String {
		self.inner.pathname()
	}

	fn search(&self) -> String {
		self.inner.search()
	}

	fn hash(&self) -> String {
		self.inner.hash()
	}

	fn replace(&self, href: &str) {
		self.ops.lock().push(("replace", href.to_string()));
		self.inner.replace(href);
	}

	fn assign(&self, url: &str) {
		self.ops.lock().push(("assign", url.to_string()));
		self.inner.assign(url);
	}

	fn set_hash(&self, fragment: &str) {
		self.ops.lock().push(("set_hash", fragment.to_string()));
		self.inner.set_hash(fragment);
	}
}
