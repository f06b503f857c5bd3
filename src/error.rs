//! Error types for routing and history operations.

use thiserror::Error;

/// Boxed error returned by route handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for router operations.
#[derive(Debug, Error)]
pub enum RouterError {
	/// A route pattern failed to compile.
	#[error("invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The offending pattern string.
		pattern: String,
		/// Why compilation was rejected.
		reason: String,
	},
	/// A matched route's handler returned an error.
	#[error("handler '{name}' failed")]
	Handler {
		/// Name of the failing handler.
		name: String,
		/// The error the handler returned.
		#[source]
		source: HandlerError,
	},
}

/// Error type for history lifecycle and navigation.
#[derive(Debug, Error)]
pub enum HistoryError {
	/// `start` was called on a history that is already running.
	#[error("history has already been started")]
	AlreadyStarted,
	/// A navigation or dispatch was requested before `start`.
	#[error("history has not been started")]
	NotStarted,
	/// A dispatch triggered by navigation failed.
	#[error(transparent)]
	Dispatch(#[from] RouterError),
}
