//! Form configuration
//!
//! [`FormOptions`] holds the plain, serializable switches so they can be
//! shipped from the server as JSON. [`FormConfig`] adds the callbacks and is
//! built fluently:
//!
//! ```
//! use reinhardt_form_binder::{FormConfig, FormValue, OverlapPolicy, Record};
//!
//! let config = FormConfig::new(|data: Record| async move {
//!     println!("submitting {:?}", data);
//!     Ok(())
//! })
//! .validate(|data: &Record| {
//!     let mut errors = Record::new();
//!     if data.get_path("account.email").and_then(FormValue::as_str) == Some("") {
//!         errors.set_path("account.email", FormValue::from("Required"));
//!     }
//!     errors
//! })
//! .use_constraint_api(true)
//! .overlapping_submit(OverlapPolicy::Reject);
//!
//! assert!(config.options().use_constraint_api);
//! ```

use crate::record::Record;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// What happens when a submit arrives while another is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
	/// Ignore the new submit; the in-flight one completes alone
	#[default]
	Reject,
	/// Run both; `is_submitting` stays true until the last one finishes
	Allow,
}

/// Serializable form switches
///
/// # Examples
///
/// ```
/// use reinhardt_form_binder::{FormOptions, OverlapPolicy};
///
/// let options: FormOptions = serde_json::from_str(r#"{"use_constraint_api": true}"#).unwrap();
/// assert!(options.use_constraint_api);
/// assert_eq!(options.overlapping_submit, OverlapPolicy::Reject);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
	/// Mirror errors into the browser's constraint validation UI
	pub use_constraint_api: bool,
	/// Overlapping submit handling
	pub overlapping_submit: OverlapPolicy,
}

/// Future returned by a submit handler
pub type SubmitFuture = LocalBoxFuture<'static, anyhow::Result<()>>;

/// Future returned by an async validator
pub type ValidateFuture = LocalBoxFuture<'static, Record>;

/// Runs a detached task on the local executor
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

pub(crate) type SubmitHandler = Rc<dyn Fn(Record) -> SubmitFuture>;
pub(crate) type ErrorHandler = Rc<dyn Fn(anyhow::Error)>;

/// Computes the errors record from the data record
#[derive(Clone)]
pub(crate) enum Validator {
	Sync(Rc<dyn Fn(&Record) -> Record>),
	Async(Rc<dyn Fn(Record) -> ValidateFuture>),
}

impl Validator {
	/// Starts a validation run
	///
	/// Synchronous validators run eagerly, so the returned future is ready.
	pub(crate) fn run(&self, data: &Record) -> ValidateFuture {
		match self {
			Self::Sync(validate) => futures::future::ready(validate(data)).boxed_local(),
			Self::Async(validate) => validate(data.clone()),
		}
	}
}

/// Construction parameters of a [`Form`](crate::Form)
pub struct FormConfig {
	pub(crate) options: FormOptions,
	pub(crate) initial_values: Option<Record>,
	pub(crate) validator: Option<Validator>,
	pub(crate) on_submit: SubmitHandler,
	pub(crate) on_error: Option<ErrorHandler>,
	pub(crate) spawner: Option<Spawner>,
}

impl FormConfig {
	/// Creates a configuration around the submit handler
	///
	/// The handler receives a snapshot of the data record and is awaited while
	/// `is_submitting` is true.
	pub fn new<F, Fut>(on_submit: F) -> Self
	where
		F: Fn(Record) -> Fut + 'static,
		Fut: Future<Output = anyhow::Result<()>> + 'static,
	{
		Self {
			options: FormOptions::default(),
			initial_values: None,
			validator: None,
			on_submit: Rc::new(move |data| on_submit(data).boxed_local()),
			on_error: None,
			spawner: None,
		}
	}

	/// Values written into the controls when the form is bound
	pub fn initial_values(mut self, values: Record) -> Self {
		self.initial_values = Some(values);
		self
	}

	/// Synchronous validator, run on every data change and on submit
	pub fn validate<F>(mut self, validate: F) -> Self
	where
		F: Fn(&Record) -> Record + 'static,
	{
		self.validator = Some(Validator::Sync(Rc::new(validate)));
		self
	}

	/// Asynchronous validator, run on every data change and on submit
	///
	/// Change-triggered runs are detached through the spawner; a result that
	/// arrives after a newer run started is discarded.
	pub fn validate_async<F, Fut>(mut self, validate: F) -> Self
	where
		F: Fn(Record) -> Fut + 'static,
		Fut: Future<Output = Record> + 'static,
	{
		self.validator = Some(Validator::Async(Rc::new(move |data| {
			validate(data).boxed_local()
		})));
		self
	}

	/// Receives submit handler failures instead of the caller
	pub fn on_error<F>(mut self, on_error: F) -> Self
	where
		F: Fn(anyhow::Error) + 'static,
	{
		self.on_error = Some(Rc::new(on_error));
		self
	}

	/// Mirror errors into the native constraint validation UI
	pub fn use_constraint_api(mut self, enabled: bool) -> Self {
		self.options.use_constraint_api = enabled;
		self
	}

	/// Overlapping submit handling
	pub fn overlapping_submit(mut self, policy: OverlapPolicy) -> Self {
		self.options.overlapping_submit = policy;
		self
	}

	/// Replace all switches at once
	pub fn with_options(mut self, options: FormOptions) -> Self {
		self.options = options;
		self
	}

	/// Current switches
	pub fn options(&self) -> &FormOptions {
		&self.options
	}

	/// Executor for detached work (DOM-triggered submits, async validation)
	///
	/// Defaults to `wasm_bindgen_futures::spawn_local` on WASM. On native
	/// targets the default polls the task once and drops it if it is still
	/// pending, which is enough for synchronous handlers.
	pub fn spawner<F>(mut self, spawner: F) -> Self
	where
		F: Fn(LocalBoxFuture<'static, ()>) + 'static,
	{
		self.spawner = Some(Rc::new(spawner));
		self
	}
}

impl fmt::Debug for FormConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormConfig")
			.field("options", &self.options)
			.field("initial_values", &self.initial_values)
			.field("has_validator", &self.validator.is_some())
			.field("has_error_handler", &self.on_error.is_some())
			.field("has_spawner", &self.spawner.is_some())
			.finish()
	}
}

/// Spawner used when none is configured
#[cfg(target_arch = "wasm32")]
pub(crate) fn default_spawner() -> Spawner {
	Rc::new(|task| wasm_bindgen_futures::spawn_local(task))
}

/// Spawner used when none is configured
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn default_spawner() -> Spawner {
	Rc::new(|task| {
		if task.now_or_never().is_none() {
			crate::warn_log!(
				"detached task did not complete synchronously and was dropped; configure FormConfig::spawner"
			);
		}
	})
}
