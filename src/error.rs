//! Error types for form binding and submission

use thiserror::Error;

/// Errors surfaced by [`Form`](crate::Form) and [`Binding`](crate::Binding)
///
/// Validation failures are not errors: they live in the errors record and
/// only block submission.
#[derive(Debug, Error)]
pub enum FormError {
	/// The submit handler failed and no error handler was configured
	#[error("submit handler failed: {0}")]
	Submit(#[source] anyhow::Error),

	/// A DOM listener could not be attached or removed
	#[error("'{event}' listener error: {reason}")]
	Listener {
		/// DOM event name
		event: &'static str,
		/// Backend-provided reason
		reason: String,
	},

	/// `bind()` was called while a previous binding is still alive
	#[error("form is already bound to an element; destroy the existing binding first")]
	AlreadyBound,
}

/// Result alias used throughout the crate
pub type FormResult<T> = Result<T, FormError>;
