//! Validate-then-submit pipeline
//!
//! A submission moves the form from idle to submitting and back:
//!
//! 1. every touched flag is forced on, so untouched fields show their errors
//! 2. errors are recomputed from the current data
//! 3. any truthy error blocks the submission (and asks the element to report
//!    validity when constraint API integration is on)
//! 4. otherwise the submit handler runs with a snapshot of the data
//!
//! `is_submitting` is reset when the submission ends, whichever way it ends,
//! including when its future is dropped half way.

use super::config::OverlapPolicy;
use super::state::FormInner;
use super::touched::TouchedMap;
use crate::error::{FormError, FormResult};
use crate::{info_log, warn_log};
use std::rc::Rc;

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// The submit handler ran and succeeded
	Submitted,
	/// Validation failed; the submit handler was not called
	Invalid,
	/// Another submission was in flight and overlaps are rejected
	Rejected,
	/// The submit handler failed and the error handler received the error
	Handled,
}

/// Keeps `is_submitting` raised while at least one submission runs
struct InFlightGuard {
	inner: Rc<FormInner>,
}

impl InFlightGuard {
	fn enter(inner: &Rc<FormInner>) -> Self {
		let running = inner.in_flight.get();
		inner.in_flight.set(running + 1);
		if running == 0 {
			inner.is_submitting.set(true);
		}
		Self {
			inner: Rc::clone(inner),
		}
	}
}

impl Drop for InFlightGuard {
	fn drop(&mut self) {
		let running = self.inner.in_flight.get().saturating_sub(1);
		self.inner.in_flight.set(running);
		if running == 0 {
			self.inner.is_submitting.set(false);
		}
	}
}

pub(crate) async fn run_submit(inner: Rc<FormInner>) -> FormResult<SubmitOutcome> {
	if inner.in_flight.get() > 0 && inner.options.overlapping_submit == OverlapPolicy::Reject {
		warn_log!("submit ignored: a submission is already in flight");
		return Ok(SubmitOutcome::Rejected);
	}

	let _guard = InFlightGuard::enter(&inner);
	inner.touched.update(TouchedMap::mark_all);

	let errors = inner.validate_now().await;
	if errors.has_truthy_leaf() {
		info_log!(
			"submit blocked by {} invalid field(s)",
			errors.leaf_paths().len()
		);
		if inner.options.use_constraint_api {
			inner.report_validity();
		}
		return Ok(SubmitOutcome::Invalid);
	}

	let data = inner.data.get();
	match (inner.on_submit)(data).await {
		Ok(()) => Ok(SubmitOutcome::Submitted),
		Err(error) => match &inner.on_error {
			Some(on_error) => {
				warn_log!("submit handler failed, delegating: {}", error);
				on_error(error);
				Ok(SubmitOutcome::Handled)
			}
			None => Err(FormError::Submit(error)),
		},
	}
}
