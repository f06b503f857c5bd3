//! Navigation history state machine.
//!
//! [`History`] owns the single current fragment and keeps it synchronized
//! with an abstracted document address. At `start` it decides between two
//! tracking modes — path-based (push/replace navigation API) and hash-based
//! (fragment polling) — normalizes the configured root prefix, reconciles a
//! URL written in the other mode's form, and from then on funnels every
//! address change through the router exactly once.
//!
//! Lifecycle: `Stopped → Starting → Started`. Starting twice fails fast;
//! `stop` cancels the poll task and permits a fresh `start` with a new
//! configuration. One instance drives dispatch at a time, by caller
//! convention.

mod location;
mod poll;

pub use location::{LocationProvider, MemoryLocation, NavigationApi};

use crate::error::HistoryError;
use crate::router::Router;
use parking_lot::{Mutex, RwLock};
use poll::PollTask;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Configuration for [`History::start`].
#[derive(Debug, Clone)]
pub struct StartConfig {
	/// Prefer path-based tracking through the navigation API.
	pub push_state: bool,
	/// Allow hash-based tracking as mode of last resort.
	pub hash_change: bool,
	/// Path prefix the application lives under.
	pub root: String,
	/// Skip the initial dispatch.
	pub silent: bool,
	/// Hash polling interval.
	pub interval: Duration,
}

impl Default for StartConfig {
	fn default() -> Self {
		Self {
			push_state: false,
			hash_change: true,
			root: "/".to_string(),
			silent: false,
			interval: Duration::from_millis(50),
		}
	}
}

/// Options accepted by [`History::navigate`].
///
/// A bare `bool` converts to `{ trigger, replace: false }`, the legacy
/// calling convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
	/// Dispatch the new fragment through the router.
	pub trigger: bool,
	/// Rewrite the current history entry instead of appending one.
	pub replace: bool,
}

impl From<bool> for NavigateOptions {
	fn from(trigger: bool) -> Self {
		Self {
			trigger,
			replace: false,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Stopped,
	Starting,
	Started,
}

/// Configuration resolved at `start`.
#[derive(Debug, Clone)]
struct ActiveConfig {
	/// Normalized root: leading and trailing slash, no duplicates.
	root: String,
	wants_hash_change: bool,
	wants_push_state: bool,
	has_push_state: bool,
}

/// The navigation history.
pub struct History {
	router: Arc<Router>,
	location: Arc<dyn LocationProvider>,
	navigation: Option<Arc<dyn NavigationApi>>,
	phase: RwLock<Phase>,
	config: RwLock<Option<ActiveConfig>>,
	/// Current fragment, raw (percent-encoded) form.
	fragment: RwLock<Option<String>>,
	poll: Mutex<Option<PollTask>>,
}

impl std::fmt::Debug for History {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("History")
			.field("phase", &*self.phase.read())
			.field("fragment", &*self.fragment.read())
			.field("has_navigation_api", &self.navigation.is_some())
			.finish()
	}
}

impl History {
	/// Creates a stopped history over the given seams.
	///
	/// Passing `None` for the navigation API forces hash-based tracking
	/// regardless of what `start` requests.
	pub fn new(
		router: Arc<Router>,
		location: Arc<dyn LocationProvider>,
		navigation: Option<Arc<dyn NavigationApi>>,
	) -> Self {
		Self {
			router,
			location,
			navigation,
			phase: RwLock::new(Phase::Stopped),
			config: RwLock::new(None),
			fragment: RwLock::new(None),
			poll: Mutex::new(None),
		}
	}

	/// Starts tracking the document address.
	///
	/// Resolves the tracking mode, normalizes the root, reconciles an
	/// address written in the other mode's form, begins observing changes,
	/// and — unless `silent` — dispatches the initial fragment exactly once.
	/// Returns whether a route matched (`Ok(true)` also covers the one-time
	/// redirect to the hash-based address, which boots a fresh document).
	///
	/// # Errors
	///
	/// [`HistoryError::AlreadyStarted`] when not stopped; a failing handler
	/// during the initial dispatch propagates as
	/// [`HistoryError::Dispatch`].
	pub fn start(self: &Arc<Self>, config: StartConfig) -> Result<bool, HistoryError> {
		{
			let mut phase = self.phase.write();
			if *phase != Phase::Stopped {
				return Err(HistoryError::AlreadyStarted);
			}
			*phase = Phase::Starting;
		}

		let active = ActiveConfig {
			root: normalize_root(&config.root),
			wants_hash_change: config.hash_change,
			wants_push_state: config.push_state,
			has_push_state: config.push_state && self.navigation.is_some(),
		};
		debug!(
			root = active.root.as_str(),
			push_state = active.has_push_state,
			hash_change = active.wants_hash_change,
			"starting history"
		);

		let mut fragment = self.read_fragment(&active, false);
		let at_root = {
			let mut pathname = self.location.pathname();
			if !pathname.ends_with('/') {
				pathname.push('/');
			}
			pathname == active.root
		};

		let mut redirected = false;
		if active.wants_hash_change
			&& active.wants_push_state
			&& !active.has_push_state
			&& !at_root
		{
			// Path-based tracking was requested but the environment cannot
			// provide it: move the path into the hash form of the same
			// address and let the reloaded document start over.
			fragment = self.read_fragment(&active, true);
			let target = format!("{}{}#{}", active.root, self.location.search(), fragment);
			self.location.replace(&target);
			debug!(target = target.as_str(), "redirected to hash-based address");
			redirected = true;
		} else if active.has_push_state && at_root && !self.location.hash().is_empty() {
			// Path-based tracking is live but the address still carries
			// hash state; rewrite it in place so the upcoming dispatch is
			// the only one.
			fragment = strip_fragment(&self.hash_fragment());
			let url = format!("{}{}{}", active.root, fragment, self.location.search());
			if let Some(navigation) = &self.navigation {
				navigation.replace_state(&url);
			}
			debug!(url = url.as_str(), "rewrote hash address to path form");
		}

		*self.fragment.write() = Some(fragment.clone());
		*self.config.write() = Some(active.clone());
		*self.phase.write() = Phase::Started;

		if active.wants_hash_change && !active.has_push_state {
			*self.poll.lock() = PollTask::spawn(Arc::downgrade(self), config.interval);
		}

		if redirected {
			return Ok(true);
		}
		if config.silent {
			return Ok(false);
		}
		// Dispatch the fragment computed above; the address rewrite may have
		// adopted hash state the location no longer reflects.
		self.load_url(fragment)
	}

	/// Stops tracking: cancels the poll task and resets to `Stopped`.
	///
	/// A later [`History::start`] may use a fresh configuration.
	pub fn stop(&self) {
		if let Some(task) = self.poll.lock().take() {
			task.cancel();
		}
		*self.phase.write() = Phase::Stopped;
		*self.config.write() = None;
		*self.fragment.write() = None;
		debug!("history stopped");
	}

	/// Programmatically changes the current fragment.
	///
	/// Strips a leading `/` or `#`; when the result equals the current
	/// fragment this is a no-op — no history write, no dispatch. Otherwise
	/// the fragment is written to the document address (push or replace,
	/// path or hash form per the active mode) BEFORE any handler runs, then
	/// dispatched if `trigger` was requested.
	///
	/// Returns whether a dispatch matched; `Ok(false)` covers the no-op, an
	/// untriggered write, and the full-navigation fallback when neither
	/// tracking mode is available.
	///
	/// # Errors
	///
	/// [`HistoryError::NotStarted`] before `start` or after `stop`; handler
	/// failures propagate as [`HistoryError::Dispatch`].
	pub fn navigate(
		&self,
		fragment: &str,
		options: impl Into<NavigateOptions>,
	) -> Result<bool, HistoryError> {
		let options = options.into();
		let config = self.started_config()?;

		let fragment = strip_fragment(fragment);
		if self.fragment.read().as_deref() == Some(fragment.as_str()) {
			return Ok(false);
		}
		debug!(
			fragment = fragment.as_str(),
			replace = options.replace,
			trigger = options.trigger,
			"navigating"
		);
		*self.fragment.write() = Some(fragment.clone());

		let url = format!("{}{}", config.root, fragment);
		if config.has_push_state {
			if let Some(navigation) = &self.navigation {
				if options.replace {
					navigation.replace_state(&url);
				} else {
					navigation.push_state(&url);
				}
			}
		} else if config.wants_hash_change {
			self.update_hash(&fragment, options.replace);
		} else {
			// Neither tracking mechanism is available: hand the address to
			// the document and let a full navigation take over.
			self.location.assign(&url);
			return Ok(false);
		}

		if options.trigger {
			return self.load_url(fragment);
		}
		Ok(false)
	}

	/// Compares the stored fragment against the document address and
	/// dispatches on change.
	///
	/// The hash poller calls this on every tick; path-based hosts call it
	/// from their native navigation listener. Comparison uses the raw
	/// (encoded) fragment.
	pub fn check_url(&self) -> Result<bool, HistoryError> {
		let config = self.started_config()?;
		let current = self.read_fragment(&config, false);
		if self.fragment.read().as_deref() == Some(current.as_str()) {
			return Ok(false);
		}
		self.load_url(current)
	}

	/// Whether the history is started.
	pub fn started(&self) -> bool {
		*self.phase.read() == Phase::Started
	}

	/// The current fragment, raw form, once started.
	pub fn fragment(&self) -> Option<String> {
		self.fragment.read().clone()
	}

	/// The normalized root, once started.
	pub fn root(&self) -> Option<String> {
		self.config.read().as_ref().map(|c| c.root.clone())
	}

	/// The router this history dispatches through.
	pub fn router(&self) -> &Arc<Router> {
		&self.router
	}

	/// Stores `fragment` and dispatches it through the router.
	fn load_url(&self, fragment: String) -> Result<bool, HistoryError> {
		let fragment = strip_fragment(&fragment);
		*self.fragment.write() = Some(fragment.clone());
		let matched = self.router.dispatch(&fragment)?;
		Ok(matched)
	}

	/// Reads the raw fragment for the active mode.
	fn read_fragment(&self, config: &ActiveConfig, force_path: bool) -> String {
		if config.has_push_state || !config.wants_hash_change || force_path {
			let mut fragment = self.location.pathname();
			// A foreign provider may leave the hash on the path
			if let Some(idx) = fragment.find('#') {
				fragment.truncate(idx);
			}
			let root = config.root.trim_end_matches('/');
			if !root.is_empty() && fragment.starts_with(root) {
				fragment = fragment[root.len()..].to_string();
			}
			strip_fragment(&fragment)
		} else {
			strip_fragment(&self.hash_fragment())
		}
	}

	/// Extracts the hash portion from the full href.
	///
	/// Some environments decode the hash accessor; change detection needs
	/// the raw string, which the href preserves.
	fn hash_fragment(&self) -> String {
		let href = self.location.href();
		match href.split_once('#') {
			Some((_, hash)) => hash.to_string(),
			None => String::new(),
		}
	}

	fn update_hash(&self, fragment: &str, replace: bool) {
		if replace {
			let href = self.location.href();
			let base = href.split('#').next().unwrap_or("");
			self.location.replace(&format!("{}#{}", base, fragment));
		} else {
			self.location.set_hash(fragment);
		}
	}

	fn started_config(&self) -> Result<ActiveConfig, HistoryError> {
		if *self.phase.read() != Phase::Started {
			return Err(HistoryError::NotStarted);
		}
		self.config.read().clone().ok_or(HistoryError::NotStarted)
	}
}

/// Normalizes a root to a leading and trailing slash with no duplicates.
fn normalize_root(root: &str) -> String {
	let mut normalized = format!("/{}/", root);
	while normalized.contains("//") {
		normalized = normalized.replace("//", "/");
	}
	normalized
}

/// Strips leading `#`/`/` characters and trailing whitespace.
fn strip_fragment(fragment: &str) -> String {
	fragment.trim_start_matches(['#', '/']).trim_end().to_string()
}
