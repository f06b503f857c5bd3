//! Location and navigation seams.
//!
//! [`History`](super::History) never touches a browser directly. It reads
//! and writes the address through [`LocationProvider`] and reaches the
//! push/replace navigation API through [`NavigationApi`]; the host binding
//! implements both over the real environment. [`MemoryLocation`] is the
//! in-memory reference implementation used by tests and non-browser hosts.

use parking_lot::RwLock;

/// Read/write access to the current document address.
pub trait LocationProvider: Send + Sync {
	/// The full address, raw (percent-encoded) form.
	fn href(&self) -> String;

	/// The path component, with a leading `/`.
	fn pathname(&self) -> String;

	/// The query component including its leading `?`, or empty.
	fn search(&self) -> String;

	/// The fragment component including its leading `#`, or empty.
	fn hash(&self) -> String;

	/// Replaces the current address without creating a history entry.
	fn replace(&self, href: &str);

	/// Navigates to `url`, creating a history entry (full page navigation).
	fn assign(&self, url: &str);

	/// Sets the fragment component, creating a history entry.
	fn set_hash(&self, fragment: &str);
}

/// Push/replace navigation API, detected for availability by passing
/// `Option<Arc<dyn NavigationApi>>` to `History`; absence forces hash-based
/// tracking regardless of request.
pub trait NavigationApi: Send + Sync {
	/// Appends a history entry for `url`.
	fn push_state(&self, url: &str);

	/// Rewrites the current history entry to `url`.
	fn replace_state(&self, url: &str);
}

#[derive(Debug, Clone, Default)]
struct UrlParts {
	origin: String,
	pathname: String,
	search: String,
	hash: String,
}

/// In-memory [`LocationProvider`] over a parsed URL.
///
/// `replace` and `assign` re-parse their argument; relative forms (leading
/// `/`, `?`, or `#`) resolve against the current address.
#[derive(Debug)]
pub struct MemoryLocation {
	parts: RwLock<UrlParts>,
}

impl MemoryLocation {
	/// Creates a location from an absolute URL.
	pub fn new(href: &str) -> Self {
		Self {
			parts: RwLock::new(parse_href(href, None)),
		}
	}
}

impl LocationProvider for MemoryLocation {
	fn href(&self) -> String {
		let parts = self.parts.read();
		format!(
			"{}{}{}{}",
			parts.origin, parts.pathname, parts.search, parts.hash
		)
	}

	fn pathname(&self) -> String {
		self.parts.read().pathname.clone()
	}

	fn search(&self) -> String {
		self.parts.read().search.clone()
	}

	fn hash(&self) -> String {
		self.parts.read().hash.clone()
	}

	fn replace(&self, href: &str) {
		let mut parts = self.parts.write();
		*parts = parse_href(href, Some(&parts));
	}

	fn assign(&self, url: &str) {
		// Entry bookkeeping is the browser's business; in memory the effect
		// on the current address is the same as replace.
		self.replace(url);
	}

	fn set_hash(&self, fragment: &str) {
		self.parts.write().hash = format!("#{}", fragment);
	}
}

fn parse_href(href: &str, current: Option<&UrlParts>) -> UrlParts {
	if let Some(scheme_end) = href.find("://") {
		let after_scheme = scheme_end + 3;
		let path_start = href[after_scheme..]
			.find(['/', '?', '#'])
			.map(|i| after_scheme + i)
			.unwrap_or(href.len());
		let (origin, rest) = href.split_at(path_start);
		let mut parts = parse_reference(rest);
		parts.origin = origin.to_string();
		parts
	} else if let Some(fragment) = href.strip_prefix('#') {
		let mut parts = current.cloned().unwrap_or_default();
		parts.hash = format!("#{}", fragment);
		parts
	} else {
		let mut parts = parse_reference(href);
		parts.origin = current.map(|c| c.origin.clone()).unwrap_or_default();
		parts
	}
}

fn parse_reference(reference: &str) -> UrlParts {
	let (without_hash, hash) = match reference.split_once('#') {
		Some((head, tail)) => (head, format!("#{}", tail)),
		None => (reference, String::new()),
	};
	let (pathname, search) = match without_hash.split_once('?') {
		Some((head, tail)) => (head, format!("?{}", tail)),
		None => (without_hash, String::new()),
	};
	// Some environments report paths without the leading slash
	let pathname = if pathname.starts_with('/') {
		pathname.to_string()
	} else {
		format!("/{}", pathname)
	};
	UrlParts {
		origin: String::new(),
		pathname,
		search,
		hash,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parses_absolute_url() {
		let location = MemoryLocation::new("http://example.com/root/foo?a=b#search/news");

		assert_eq!(location.pathname(), "/root/foo");
		assert_eq!(location.search(), "?a=b");
		assert_eq!(location.hash(), "#search/news");
		assert_eq!(location.href(), "http://example.com/root/foo?a=b#search/news");
	}

	#[test]
	fn test_bare_origin_has_root_pathname() {
		let location = MemoryLocation::new("http://example.com");
		assert_eq!(location.pathname(), "/");
		assert_eq!(location.hash(), "");
	}

	#[test]
	fn test_hash_only_origin() {
		let location = MemoryLocation::new("http://example.com#route");
		assert_eq!(location.pathname(), "/");
		assert_eq!(location.hash(), "#route");
	}

	#[test]
	fn test_replace_with_fragment_reference_keeps_path() {
		let location = MemoryLocation::new("http://example.com/app?x=1");
		location.replace("#contacts/7");

		assert_eq!(location.pathname(), "/app");
		assert_eq!(location.search(), "?x=1");
		assert_eq!(location.hash(), "#contacts/7");
	}

	#[test]
	fn test_assign_with_path_reference_keeps_origin() {
		let location = MemoryLocation::new("http://example.com/root/");
		location.assign("/root/fragment");

		assert_eq!(location.href(), "http://example.com/root/fragment");
	}

	#[test]
	fn test_set_hash_touches_only_hash() {
		let location = MemoryLocation::new("http://example.com/app");
		location.set_hash("search/news");

		assert_eq!(location.pathname(), "/app");
		assert_eq!(location.hash(), "#search/news");
	}

	#[test]
	fn test_replace_with_absolute_url_resets_everything() {
		let location = MemoryLocation::new("http://example.com/a?q=1#h");
		location.replace("https://other.test/b");

		assert_eq!(location.href(), "https://other.test/b");
		assert_eq!(location.search(), "");
		assert_eq!(location.hash(), "");
	}
}
