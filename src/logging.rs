//! Logging for the form binder
//!
//! Bound forms live in browser event handlers on WASM and in ordinary test
//! harnesses elsewhere. The macros below write to `console.*` on WASM and to
//! `tracing` on native targets, and compile to nothing without
//! `debug_assertions`.
//!
//! | Macro | Extra requirement | WASM | Non-WASM |
//! |-------|-------------------|------|----------|
//! | `debug_log!` | `debug-binding` feature | `console.debug` | `tracing::debug!` |
//! | `info_log!` | | `console.info` | `tracing::info!` |
//! | `warn_log!` | | `console.warn` | `tracing::warn!` |
//! | `error_log!` | | `console.error` | `tracing::error!` |
//!
//! Errors from a DOM-triggered submission have nobody to return to, so they
//! go through [`report_uncaught`] instead, which stays on in release builds.

use crate::error::FormError;

#[doc(hidden)]
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! __binder_log {
	(debug, $($arg:tt)*) => {
		$crate::__web_sys::console::debug_1(&format!($($arg)*).into())
	};
	(info, $($arg:tt)*) => {
		$crate::__web_sys::console::info_1(&format!($($arg)*).into())
	};
	(warn, $($arg:tt)*) => {
		$crate::__web_sys::console::warn_1(&format!($($arg)*).into())
	};
	(error, $($arg:tt)*) => {
		$crate::__web_sys::console::error_1(&format!($($arg)*).into())
	};
}

#[doc(hidden)]
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! __binder_log {
	(debug, $($arg:tt)*) => {
		$crate::__tracing::debug!("{}", format!($($arg)*))
	};
	(info, $($arg:tt)*) => {
		$crate::__tracing::info!("{}", format!($($arg)*))
	};
	(warn, $($arg:tt)*) => {
		$crate::__tracing::warn!("{}", format!($($arg)*))
	};
	(error, $($arg:tt)*) => {
		$crate::__tracing::error!("{}", format!($($arg)*))
	};
}

#[doc(hidden)]
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! __binder_log {
	($level:ident, $($arg:tt)*) => {{}};
}

/// Per-event router output, only with the `debug-binding` feature
#[macro_export]
#[cfg(feature = "debug-binding")]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__binder_log!(debug, $($arg)*);
	}};
}

/// No-op without the `debug-binding` feature
#[macro_export]
#[cfg(not(feature = "debug-binding"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__binder_log!(info, $($arg)*);
	}};
}

/// Logs a warning
#[macro_export]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__binder_log!(warn, $($arg)*);
	}};
}

/// Logs an error that was also handled or returned elsewhere
#[macro_export]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__binder_log!(error, $($arg)*);
	}};
}

/// Reports a submission error that no caller will ever see
///
/// On WASM the error is raised as an unhandled promise rejection: the
/// browser prints it as uncaught and page-level `unhandledrejection`
/// listeners receive it. Native builds emit a `tracing` error event.
pub(crate) fn report_uncaught(error: &FormError) {
	let message = error.to_string();

	#[cfg(target_arch = "wasm32")]
	{
		let _ = wasm_bindgen_futures::future_to_promise(async move {
			Err(wasm_bindgen::JsError::new(&message).into())
		});
	}

	#[cfg(not(target_arch = "wasm32"))]
	tracing::error!(error = %message, "uncaught form submission error");
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{debug_log, error_log, info_log, warn_log};
	use rstest::rstest;
	use tracing_test::traced_test;

	#[rstest]
	#[case::plain("form unbound")]
	#[case::with_braces("{name} is not a placeholder here")]
	fn test_macros_accept_literal_messages(#[case] message: &str) {
		debug_log!("{}", message);
		info_log!("{}", message);
		warn_log!("{}", message);
		error_log!("{}", message);
	}

	#[rstest]
	fn test_macros_accept_format_arguments() {
		let fields = ["account.email", "account.password"];
		info_log!("binding form with {} field(s)", fields.len());
		warn_log!("overlapping submit for {:?}", fields);
		debug_log!("input on {name}", name = fields[0]);
		error_log!("submit handler failed: {}", FormError::AlreadyBound);
	}

	#[test]
	#[traced_test]
	fn test_report_uncaught_emits_error_event() {
		report_uncaught(&FormError::Submit(anyhow::anyhow!("gateway timeout")));

		assert!(logs_contain("uncaught form submission error"));
		assert!(logs_contain("gateway timeout"));
	}
}
