//! Integration tests for route matching and dispatch
//!
//! Ports the observable routing behaviors of the sample application onto
//! the Router/History pair:
//! - parameter extraction and decoding for every segment kind
//! - registration-order precedence among overlapping patterns
//! - notifications for routes without handlers

mod common;

use common::{observe_routes, sample_router};
use mingus::{History, MemoryLocation, StartConfig};
use std::sync::Arc;

fn started_history(href: &str) -> (Arc<History>, Arc<parking_lot::Mutex<common::AppState>>, Arc<parking_lot::Mutex<Vec<mingus::RouteEvent>>>) {
	let (router, state) = sample_router();
	let log = observe_routes(&router);
	let location = Arc::new(MemoryLocation::new(href));
	let history = Arc::new(History::new(router, location, None));
	history
		.start(StartConfig {
			silent: true,
			..StartConfig::default()
		})
		.unwrap();
	(history, state, log)
}

#[test]
fn test_routes_simple() {
	let (history, state, log) = started_history("http://example.com");

	history.navigate("search/news", true).unwrap();

	let state = state.lock();
	assert_eq!(state.query.as_deref(), Some("news"));
	assert_eq!(state.page, None);

	let log = log.lock();
	assert_eq!(log.len(), 1);
	assert_eq!(log[0].name, "search");
	assert_eq!(log[0].args[0].as_deref(), Some("news"));
}

#[test]
fn test_routes_two_part() {
	let (history, state, _log) = started_history("http://example.com");

	history.navigate("search/nyc/p10", true).unwrap();

	let state = state.lock();
	assert_eq!(state.query.as_deref(), Some("nyc"));
	assert_eq!(state.page.as_deref(), Some("10"));
}

#[test]
fn test_routes_via_navigate_legacy_bool() {
	let (history, state, _log) = started_history("http://example.com");

	// Bare bool is the legacy alias for {trigger}
	history.navigate("search/manhattan/p20", true).unwrap();

	let state = state.lock();
	assert_eq!(state.query.as_deref(), Some("manhattan"));
	assert_eq!(state.page.as_deref(), Some("20"));
}

#[test]
fn test_route_precedence_via_navigate() {
	use mingus::NavigateOptions;

	// Check both the options form and the legacy bool form
	for use_options in [true, false] {
		let (history, state, _log) = started_history("http://example.com");
		let navigate = |fragment: &str| {
			if use_options {
				history.navigate(
					fragment,
					NavigateOptions {
						trigger: true,
						replace: false,
					},
				)
			} else {
				history.navigate(fragment, true)
			}
		};

		navigate("contacts").unwrap();
		assert_eq!(state.lock().contact.as_deref(), Some("index"));
		navigate("contacts/new").unwrap();
		assert_eq!(state.lock().contact.as_deref(), Some("new"));
		navigate("contacts/foo").unwrap();
		assert_eq!(state.lock().contact.as_deref(), Some("load"));
	}
}

#[test]
fn test_routes_splats() {
	let (history, state, _log) = started_history("http://example.com");

	history
		.navigate("splat/long-list/of/splatted_99args/end", true)
		.unwrap();

	assert_eq!(
		state.lock().splat_args.as_deref(),
		Some("long-list/of/splatted_99args")
	);
}

#[test]
fn test_routes_complex() {
	let (history, state, _log) = started_history("http://example.com");

	history
		.navigate("one/two/three/complex-part/four/five/six/seven", true)
		.unwrap();

	let state = state.lock();
	assert_eq!(state.first.as_deref(), Some("one/two/three"));
	assert_eq!(state.part.as_deref(), Some("part"));
	assert_eq!(state.rest.as_deref(), Some("four/five/six/seven"));
}

#[test]
fn test_routes_query() {
	let (history, state, log) = started_history("http://example.com");

	history.navigate("mandel?a=b&c=d", true).unwrap();

	let state = state.lock();
	assert_eq!(state.entity.as_deref(), Some("mandel"));
	assert_eq!(state.query_args.as_deref(), Some("a=b&c=d"));

	let log = log.lock();
	assert_eq!(log[0].name, "query");
	assert_eq!(log[0].args[0].as_deref(), Some("mandel"));
	assert_eq!(log[0].args[1].as_deref(), Some("a=b&c=d"));
}

#[test]
fn test_routes_query_without_query_part() {
	let (history, state, log) = started_history("http://example.com");

	history.navigate("mandel", true).unwrap();

	assert_eq!(state.lock().entity.as_deref(), Some("mandel"));
	assert_eq!(state.lock().query_args, None);
	assert_eq!(log.lock()[0].args[1], None, "absent remainder is None, not empty");
}

#[test]
fn test_routes_anything() {
	let (history, state, _log) = started_history("http://example.com");

	// Multi-segment so no earlier route (including the query pattern, whose
	// entity segment cannot contain '/') can claim it
	history.navigate("doesnt-match/a-route", true).unwrap();

	assert_eq!(state.lock().anything.as_deref(), Some("doesnt-match/a-route"));
}

#[test]
fn test_route_callback_gets_decoded_values() {
	let (history, state, _log) = started_history("http://example.com");

	history
		.navigate("has%2Fslash/complex-has%23hash/has%20space", true)
		.unwrap();

	let state = state.lock();
	assert_eq!(state.first.as_deref(), Some("has/slash"));
	assert_eq!(state.part.as_deref(), Some("has#hash"));
	assert_eq!(state.rest.as_deref(), Some("has space"));
}

#[test]
fn test_handles_urls_with_stray_percent() {
	let (history, state, log) = started_history("http://example.com");

	history.navigate("search/fat%3A1.5%25", true).unwrap();
	history.navigate("search/fat", true).unwrap();

	let state = state.lock();
	assert_eq!(state.query.as_deref(), Some("fat"));
	assert_eq!(state.page, None);
	assert_eq!(log.lock().last().unwrap().name, "search");
}

#[test]
fn test_event_fires_for_route_without_handler() {
	let (router, _state) = sample_router();
	let notified = Arc::new(std::sync::atomic::AtomicUsize::new(0));

	let counter = notified.clone();
	router.on_route_named(
		"no_callback",
		Arc::new(move |_: &mingus::RouteEvent| {
			counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
		}),
	);

	let location = Arc::new(MemoryLocation::new("http://example.com#no_callback"));
	let history = Arc::new(History::new(router, location, None));
	let matched = history.start(StartConfig::default()).unwrap();

	assert!(matched);
	assert_eq!(notified.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn test_initial_dispatch_from_hash() {
	let (router, state) = sample_router();
	let location = Arc::new(MemoryLocation::new("http://example.com#search/news"));
	let history = Arc::new(History::new(router, location, None));

	let matched = history.start(StartConfig::default()).unwrap();

	assert!(matched);
	assert_eq!(state.lock().query.as_deref(), Some("news"));
}
