//! Route pattern compilation.
//!
//! A [`RoutePattern`] turns declarative route syntax into an anchored
//! matcher plus an ordered parameter decoder. Four segment kinds are
//! recognized:
//!
//! - literal text, matched exactly (`contacts/new`)
//! - named parameters (`:name`), one or more characters excluding `/` and `?`
//! - splats (`*name`), matching greedily across `/`
//! - an optional query remainder (`:entity?*args`), one opaque argument that
//!   is absent rather than empty when the input carries no `?`
//!
//! Matching always runs against the raw (percent-encoded) fragment; each
//! captured argument is decoded individually on extraction, so encoded `/`
//! inside a value cannot shift match boundaries.

use crate::error::RouterError;
use percent_encoding::percent_decode_str;
use regex::RegexBuilder;

/// Decoded positional captures; `None` marks an unmatched optional group.
pub type RouteArgs = Vec<Option<String>>;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATTERN_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex, anchored at both ends.
	regex: regex::Regex,
	/// Parameter names in the order their groups capture.
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the pattern exceeds the
	/// length or segment limits, or compiles to an invalid regex.
	pub fn new(pattern: &str) -> Result<Self, RouterError> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(RouterError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: format!(
					"pattern length {} exceeds maximum allowed length of {} bytes",
					pattern.len(),
					MAX_PATTERN_LENGTH
				),
			});
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATTERN_SEGMENTS {
			return Err(RouterError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: format!(
					"pattern has {} path segments, exceeding maximum of {}",
					segment_count, MAX_PATTERN_SEGMENTS
				),
			});
		}

		let (regex_str, param_names) = compile_pattern(pattern);

		// Size limit keeps pathological patterns from exhausting memory
		let regex = RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| RouterError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			})?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in capture order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Checks whether this pattern matches the given fragment.
	pub fn is_match(&self, fragment: &str) -> bool {
		self.regex.is_match(fragment)
	}

	/// Matches a fragment and extracts its decoded arguments.
	///
	/// Returns `None` when the fragment does not match. On a match, each
	/// capture is percent-decoded individually; a group that did not
	/// participate (the absent query remainder) yields `None` rather than an
	/// empty string.
	pub fn captures(&self, fragment: &str) -> Option<RouteArgs> {
		let caps = self.regex.captures(fragment)?;
		Some(
			(1..caps.len())
				.map(|i| caps.get(i).map(|m| decode_component(m.as_str())))
				.collect(),
		)
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

/// Compiles a pattern string into a regex and extracts parameter names.
fn compile_pattern(pattern: &str) -> (String, Vec<String>) {
	let mut regex_str = String::from("^");
	let mut param_names = Vec::new();
	let mut in_query = false;
	let mut chars = pattern.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			':' | '*' if chars.peek().is_some_and(|ch| is_name_char(*ch)) => {
				let mut name = String::new();
				while let Some(&next) = chars.peek() {
					if !is_name_char(next) {
						break;
					}
					name.push(next);
					chars.next();
				}
				param_names.push(name);
				// Named parameters stop at segment and query boundaries;
				// splats run greedily across them.
				regex_str.push_str(if c == ':' { "([^/?]+)" } else { "(.*)" });
			}
			'?' if !in_query => {
				// Everything after the first '?' is one optional trailing
				// group, absent (not empty) when the input has no '?'.
				in_query = true;
				regex_str.push_str("(?:\\?");
			}
			'\\' | '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$'
			| '|' => {
				regex_str.push('\\');
				regex_str.push(c);
			}
			_ => regex_str.push(c),
		}
	}

	if in_query {
		regex_str.push_str(")?");
	}
	regex_str.push('$');

	(regex_str, param_names)
}

fn is_name_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

/// Percent-decodes one captured argument.
///
/// Invalid escape sequences pass through untouched; decoding is lossy UTF-8.
fn decode_component(raw: &str) -> String {
	percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
