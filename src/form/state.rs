//! Form state
//!
//! A [`Form`] owns the five reactive containers of one form instance
//! (`data`, `errors`, `touched`, `is_valid`, `is_submitting`) together with
//! the callbacks from its [`FormConfig`]. Nothing is global: two forms never
//! share a container.
//!
//! ## Example
//!
//! ```
//! use reinhardt_form_binder::{FormConfig, FormValue, Record, create_form};
//!
//! let form = create_form(FormConfig::new(|_| async { Ok(()) }).validate(|data: &Record| {
//!     let mut errors = Record::new();
//!     if data.get_path("email").and_then(FormValue::as_str).is_some_and(|s| !s.contains('@')) {
//!         errors.set_path("email", FormValue::from("Not email"));
//!     }
//!     errors
//! }));
//!
//! let mut data = Record::new();
//! data.set_path("email", FormValue::from("nope"));
//! form.data().set(data);
//!
//! assert!(!form.is_valid().get());
//! ```

use super::config::{
	ErrorHandler, FormConfig, FormOptions, Spawner, SubmitHandler, Validator, default_spawner,
};
use super::store::DataStore;
use super::submit::{self, SubmitOutcome};
use super::touched::TouchedMap;
use crate::error::FormResult;
use crate::reactive::{Signal, Subscription};
use crate::record::Record;
use crate::{debug_log, info_log};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Hooks into the element a form is bound to
pub(crate) struct BoundSurface {
	pub(crate) report_validity: Rc<dyn Fn() -> bool>,
	pub(crate) reflect: Rc<dyn Fn(&Record)>,
}

pub(crate) struct FormInner {
	pub(crate) data: Signal<Record>,
	pub(crate) errors: Signal<Record>,
	pub(crate) touched: Signal<TouchedMap>,
	pub(crate) is_valid: Signal<bool>,
	pub(crate) is_submitting: Signal<bool>,
	// Submissions currently running; more than one only under `OverlapPolicy::Allow`
	pub(crate) in_flight: Cell<usize>,
	// Data as of bind time; reference for touched reconciliation and reset
	pub(crate) initial: RefCell<Record>,
	pub(crate) configured_initial: Option<Record>,
	pub(crate) options: FormOptions,
	pub(crate) validator: Option<Validator>,
	pub(crate) on_submit: SubmitHandler,
	pub(crate) on_error: Option<ErrorHandler>,
	pub(crate) spawner: Spawner,
	validation_generation: Cell<u64>,
	pub(crate) bound: RefCell<Option<BoundSurface>>,
	subscriptions: RefCell<Vec<Subscription>>,
}

impl FormInner {
	fn next_generation(&self) -> u64 {
		let generation = self.validation_generation.get() + 1;
		self.validation_generation.set(generation);
		generation
	}

	/// Recomputes errors after a data change
	///
	/// Ready results are applied immediately. Pending async results are
	/// detached and dropped if a newer validation started in the meantime.
	fn revalidate(self: &Rc<Self>, data: &Record) {
		let Some(validator) = &self.validator else {
			return;
		};
		let generation = self.next_generation();
		let mut run = validator.run(data);
		if let Some(errors) = (&mut run).now_or_never() {
			self.errors.set(errors);
			return;
		}

		let weak = Rc::downgrade(self);
		(self.spawner)(
			async move {
				let errors = run.await;
				let Some(inner) = weak.upgrade() else {
					return;
				};
				if inner.validation_generation.get() == generation {
					inner.errors.set(errors);
				} else {
					debug_log!("discarding stale validation #{}", generation);
				}
			}
			.boxed_local(),
		);
	}

	/// Validates the current data and waits for the result
	///
	/// Without a validator the current errors are returned as they are.
	pub(crate) async fn validate_now(&self) -> Record {
		let Some(validator) = &self.validator else {
			return self.errors.get();
		};
		let generation = self.next_generation();
		let run = self.data.with(|data| validator.run(data));
		let errors = run.await;
		if self.validation_generation.get() == generation {
			self.errors.set(errors.clone());
		}
		errors
	}

	/// Writes `record` into the bound controls, if any
	pub(crate) fn reflect(&self, record: &Record) {
		let reflect = self.bound.borrow().as_ref().map(|bound| Rc::clone(&bound.reflect));
		if let Some(reflect) = reflect {
			reflect(record);
		}
	}

	/// Runs the bound element's native validity report
	pub(crate) fn report_validity(&self) -> Option<bool> {
		let report = self
			.bound
			.borrow()
			.as_ref()
			.map(|bound| Rc::clone(&bound.report_validity));
		report.map(|report| report())
	}
}

/// A form instance
///
/// Cheap to clone; clones share the same state. Bind it to an element with
/// [`Form::bind`].
#[derive(Clone)]
pub struct Form {
	pub(crate) inner: Rc<FormInner>,
}

/// Creates a form from its configuration
///
/// Equivalent to [`Form::new`].
pub fn create_form(config: FormConfig) -> Form {
	Form::new(config)
}

impl Form {
	/// Creates a form from its configuration
	///
	/// The data record starts out as the configured initial values (or empty)
	/// and is replaced by the element's snapshot on bind.
	pub fn new(config: FormConfig) -> Self {
		let FormConfig {
			options,
			initial_values,
			validator,
			on_submit,
			on_error,
			spawner,
		} = config;

		let initial = initial_values.clone().unwrap_or_default();
		let inner = Rc::new(FormInner {
			data: Signal::new(initial.clone()),
			errors: Signal::new(Record::new()),
			touched: Signal::new(TouchedMap::new()),
			is_valid: Signal::new(true),
			is_submitting: Signal::new(false),
			in_flight: Cell::new(0),
			initial: RefCell::new(initial),
			configured_initial: initial_values,
			options,
			validator,
			on_submit,
			on_error,
			spawner: spawner.unwrap_or_else(default_spawner),
			validation_generation: Cell::new(0),
			bound: RefCell::new(None),
			subscriptions: RefCell::new(Vec::new()),
		});

		// Subscriptions only hold weak references so that dropping the last
		// `Form` frees the state.
		let is_valid = inner.is_valid.clone();
		let validity = inner
			.errors
			.subscribe(move |errors: &Record| {
				let valid = !errors.has_truthy_leaf();
				if is_valid.with(|current| *current != valid) {
					is_valid.set(valid);
				}
			});

		let weak = Rc::downgrade(&inner);
		let validation = inner.data.subscribe(move |data: &Record| {
			if let Some(inner) = weak.upgrade() {
				inner.revalidate(data);
			}
		});

		inner
			.subscriptions
			.borrow_mut()
			.extend([validity, validation]);

		info_log!(
			"form created (constraint api: {}, overlapping submits: {:?})",
			inner.options.use_constraint_api,
			inner.options.overlapping_submit
		);
		Self { inner }
	}

	/// The data record, with touched-aware `set`
	pub fn data(&self) -> DataStore {
		DataStore::new(Rc::clone(&self.inner))
	}

	/// Validation errors, shaped like a subset of the data record
	pub fn errors(&self) -> Signal<Record> {
		self.inner.errors.clone()
	}

	/// Per-field interaction flags
	pub fn touched(&self) -> Signal<TouchedMap> {
		self.inner.touched.clone()
	}

	/// `true` while the errors record has no truthy leaf
	pub fn is_valid(&self) -> Signal<bool> {
		self.inner.is_valid.clone()
	}

	/// `true` while a submission is running
	pub fn is_submitting(&self) -> Signal<bool> {
		self.inner.is_submitting.clone()
	}

	/// Options this form was created with
	pub fn options(&self) -> &FormOptions {
		&self.inner.options
	}

	/// Whether the form is currently bound to an element
	pub fn is_bound(&self) -> bool {
		self.inner.bound.borrow().is_some()
	}

	/// Runs the validate-then-submit pipeline
	///
	/// This is what the bound element's `submit` listener runs. The returned
	/// future owns a handle to the form and can be spawned.
	///
	/// # Errors
	///
	/// Returns [`FormError::Submit`](crate::FormError::Submit) when the submit
	/// handler fails and no error handler is configured.
	pub fn handle_submit(&self) -> impl Future<Output = FormResult<SubmitOutcome>> + 'static {
		submit::run_submit(Rc::clone(&self.inner))
	}

	/// Restores the data recorded at bind time
	///
	/// Touched flags are cleared, the bound controls show the restored values
	/// and errors are recomputed.
	pub fn reset(&self) {
		let initial = self.inner.initial.borrow().clone();
		self.inner.touched.update(TouchedMap::reset);
		self.inner.reflect(&initial);
		self.inner.data.set(initial);
		info_log!("form reset");
	}
}

impl fmt::Debug for Form {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Form")
			.field("data", &self.inner.data)
			.field("errors", &self.inner.errors)
			.field("touched", &self.inner.touched)
			.field("is_submitting", &self.inner.is_submitting)
			.field("bound", &self.is_bound())
			.finish()
	}
}
