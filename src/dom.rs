//! DOM surface consumed by the binding
//!
//! The binding never talks to `web_sys` directly. It works against two small
//! traits:
//!
//! - [`FormControl`]: one `<input>`/`<textarea>` (or any other element found
//!   in the form's control collection)
//! - [`FormElement`]: the `<form>` itself, which enumerates controls, reports
//!   validity and owns event listeners
//!
//! Two backends are provided:
//!
//! - [`web`]: `web_sys::HtmlFormElement` (WASM only)
//! - [`memory`]: an in-memory form used for headless runs and tests

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::error::FormError;
use std::cell::Cell;
use std::rc::Rc;

pub use memory::{MemoryControl, MemoryForm, MemoryListener};
#[cfg(target_arch = "wasm32")]
pub use web::{WebControl, WebForm, WebListener};

/// Element tag of a form control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlTag {
	/// `<input>`
	Input,
	/// `<textarea>`
	TextArea,
	/// Anything else (`<select>`, `<button>`, `<fieldset>`, ...)
	Other,
}

/// A single form control
///
/// Implementations are cheap handles (`Clone`) onto the underlying element.
pub trait FormControl: Clone + 'static {
	/// Element tag
	fn tag(&self) -> ControlTag;

	/// `name` attribute; empty when absent
	fn name(&self) -> String;

	/// Lower-cased `type` of an `<input>` (`"text"` when absent)
	///
	/// Non-input controls return an empty string.
	fn input_type(&self) -> String;

	/// Current `value`
	fn value(&self) -> String;

	/// Current checkedness (checkbox/radio only)
	fn checked(&self) -> bool;

	/// Replace the value without dispatching events
	fn set_value(&self, value: &str);

	/// Replace the checkedness without dispatching events
	fn set_checked(&self, checked: bool);

	/// Push a message into the native constraint validation state
	///
	/// An empty message marks the control as valid.
	fn set_custom_validity(&self, message: &str);

	/// Whether both handles point at the same element
	fn is_same(&self, other: &Self) -> bool;
}

/// DOM events the binding listens to on the form element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormEventKind {
	/// Keystroke-level value change (`input`)
	Input,
	/// Committed change, used for checkbox/radio toggles (`change`)
	Change,
	/// Focus left a control (`focusout`, which bubbles unlike `blur`)
	FocusOut,
	/// Form submission (`submit`)
	Submit,
}

impl FormEventKind {
	/// Every event kind, in attach order
	pub const ALL: [FormEventKind; 4] = [Self::Input, Self::Change, Self::FocusOut, Self::Submit];

	/// DOM event name
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Input => "input",
			Self::Change => "change",
			Self::FocusOut => "focusout",
			Self::Submit => "submit",
		}
	}
}

/// An event delivered to a binding handler
#[derive(Debug)]
pub struct FormEvent<C> {
	kind: FormEventKind,
	target: Option<C>,
	default_prevented: Cell<bool>,
}

impl<C> FormEvent<C> {
	/// Creates an event of the given kind, targeting `target`
	pub fn new(kind: FormEventKind, target: Option<C>) -> Self {
		Self {
			kind,
			target,
			default_prevented: Cell::new(false),
		}
	}

	/// Event kind
	pub fn kind(&self) -> FormEventKind {
		self.kind
	}

	/// Control that originated the event, if it was a control
	pub fn target(&self) -> Option<&C> {
		self.target.as_ref()
	}

	/// Ask the backend to cancel the browser default action
	pub fn prevent_default(&self) {
		self.default_prevented.set(true);
	}

	/// Whether [`prevent_default`](Self::prevent_default) was called
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}

/// Handler attached to a form element
pub type EventHandler<C> = Rc<dyn Fn(&FormEvent<C>)>;

/// The `<form>` element a binding attaches to
pub trait FormElement: 'static {
	/// Control handle type
	type Control: FormControl;

	/// Handle returned by [`add_listener`](Self::add_listener), needed to
	/// remove the listener again
	type Listener;

	/// Every control of the form, in document order
	fn controls(&self) -> Vec<Self::Control>;

	/// Run native constraint validation and show the browser's validity UI
	///
	/// Returns `true` when every control is valid.
	fn report_validity(&self) -> bool;

	/// Attach a handler for `kind` on the form element
	fn add_listener(
		&self,
		kind: FormEventKind,
		handler: EventHandler<Self::Control>,
	) -> Result<Self::Listener, FormError>;

	/// Detach a handler previously attached with [`add_listener`](Self::add_listener)
	fn remove_listener(&self, listener: Self::Listener) -> Result<(), FormError>;
}
