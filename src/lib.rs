//! Reinhardt Form Binder - reactive binding between records and HTML forms
//!
//! Binds a nested data record to a live `<form>`, keeping the data, a
//! per-field "touched" map and the validity state in sync with user
//! interaction, and runs a validate-then-submit pipeline on submit.
//!
//! ## Features
//!
//! - **Nested records**: dotted control names (`account.email`) become nested
//!   objects
//! - **Typed values**: text, numbers (NaN for garbage), lone checkboxes as
//!   booleans, checkbox groups as lists, radio groups as the checked value
//! - **Touched tracking**: per field, forced on for every field at submit
//! - **Validation**: sync or async validators run on every change and on submit
//! - **Constraint API**: optionally mirror error messages into the browser's
//!   native validity UI
//! - **Backend agnostic**: runs against `web_sys` on WASM and against an
//!   in-memory form everywhere else
//!
//! ## Architecture
//!
//! - [`reactive`]: single-threaded `Signal` containers
//! - [`record`]: the nested data model shared by data and errors
//! - [`dom`]: the DOM surface (`FormElement`/`FormControl`) and its backends
//! - [`form`](mod@form): snapshot, mutation router, submit pipeline, binding
//! - [`logging`]: console/tracing logging macros
//!
//! ## Example
//!
//! ```
//! use reinhardt_form_binder::dom::{MemoryControl, MemoryForm};
//! use reinhardt_form_binder::{FormConfig, FormValue, Record, create_form};
//!
//! let email = MemoryControl::input("email", "account.email", "");
//! let password = MemoryControl::input("password", "account.password", "");
//! let element = MemoryForm::new()
//!     .with_control(email.clone())
//!     .with_control(password.clone());
//!
//! let form = create_form(
//!     FormConfig::new(|data: Record| async move {
//!         println!("sending {:?}", data);
//!         Ok(())
//!     })
//!     .validate(|data: &Record| {
//!         let mut errors = Record::new();
//!         let email = data.get_path("account.email").and_then(FormValue::as_str);
//!         if !email.is_some_and(|e| e.contains('@')) {
//!             errors.set_path("account.email", FormValue::from("Not email"));
//!         }
//!         errors
//!     }),
//! );
//! let binding = form.bind(element.clone()).unwrap();
//!
//! element.type_into(&email, "a@b.com");
//! assert!(form.touched().with(|t| t.is_touched("account.email")));
//! assert!(form.is_valid().get());
//!
//! binding.destroy().unwrap();
//! ```

#![warn(missing_docs)]

pub mod dom;
pub mod error;
pub mod form;
pub mod logging;
pub mod reactive;
pub mod record;

// Used by the logging macros
#[doc(hidden)]
pub use tracing as __tracing;
#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;

pub use error::{FormError, FormResult};
pub use form::{
	Binding, DataStore, Form, FormConfig, FormOptions, OverlapPolicy, SubmitOutcome, TouchedMap,
	create_form,
};
pub use reactive::{Signal, Subscription};
pub use record::{FormValue, Record};
