//! In-memory form backend
//!
//! [`MemoryForm`] behaves like a detached `<form>`: it stores controls in
//! document order, keeps a listener list and dispatches events synchronously.
//! The user-interaction helpers (`type_into`, `toggle`, `blur`, `submit`)
//! mirror what a browser fires for the same gesture.
//!
//! ## Example
//!
//! ```
//! use reinhardt_form_binder::dom::{FormControl, MemoryControl, MemoryForm};
//!
//! let email = MemoryControl::input("email", "account.email", "");
//! let form = MemoryForm::new()
//!     .with_control(email.clone())
//!     .with_control(MemoryControl::input("password", "account.password", ""));
//!
//! form.type_into(&email, "a@b.com");
//! assert_eq!(email.value(), "a@b.com");
//! ```

use super::{ControlTag, EventHandler, FormControl, FormElement, FormEvent, FormEventKind};
use crate::error::FormError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

struct ControlState {
	tag: ControlTag,
	name: String,
	input_type: String,
	value: RefCell<String>,
	checked: Cell<bool>,
	validity_message: RefCell<String>,
}

/// A control living in a [`MemoryForm`]
#[derive(Clone)]
pub struct MemoryControl {
	state: Rc<ControlState>,
}

impl MemoryControl {
	fn new(tag: ControlTag, input_type: &str, name: &str, value: &str) -> Self {
		Self {
			state: Rc::new(ControlState {
				tag,
				name: name.to_string(),
				input_type: input_type.to_ascii_lowercase(),
				value: RefCell::new(value.to_string()),
				checked: Cell::new(false),
				validity_message: RefCell::new(String::new()),
			}),
		}
	}

	/// `<input type="{input_type}" name="{name}" value="{value}">`
	pub fn input(input_type: &str, name: &str, value: &str) -> Self {
		Self::new(ControlTag::Input, input_type, name, value)
	}

	/// `<input type="checkbox">`, optionally pre-checked
	pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
		Self::input("checkbox", name, value).with_checked(checked)
	}

	/// `<input type="radio">`, optionally pre-checked
	pub fn radio(name: &str, value: &str, checked: bool) -> Self {
		Self::input("radio", name, value).with_checked(checked)
	}

	/// `<textarea name="{name}">{value}</textarea>`
	pub fn textarea(name: &str, value: &str) -> Self {
		Self::new(ControlTag::TextArea, "", name, value)
	}

	/// Any non-input element (e.g. `<select>`), never bound
	pub fn other(name: &str, value: &str) -> Self {
		Self::new(ControlTag::Other, "", name, value)
	}

	/// Sets the initial checkedness
	pub fn with_checked(self, checked: bool) -> Self {
		self.state.checked.set(checked);
		self
	}

	/// Message last pushed through `set_custom_validity`
	pub fn validity_message(&self) -> String {
		self.state.validity_message.borrow().clone()
	}
}

impl FormControl for MemoryControl {
	fn tag(&self) -> ControlTag {
		self.state.tag
	}

	fn name(&self) -> String {
		self.state.name.clone()
	}

	fn input_type(&self) -> String {
		match self.state.tag {
			ControlTag::Input if self.state.input_type.is_empty() => "text".to_string(),
			ControlTag::Input => self.state.input_type.clone(),
			_ => String::new(),
		}
	}

	fn value(&self) -> String {
		self.state.value.borrow().clone()
	}

	fn checked(&self) -> bool {
		self.state.checked.get()
	}

	fn set_value(&self, value: &str) {
		*self.state.value.borrow_mut() = value.to_string();
	}

	fn set_checked(&self, checked: bool) {
		self.state.checked.set(checked);
	}

	fn set_custom_validity(&self, message: &str) {
		*self.state.validity_message.borrow_mut() = message.to_string();
	}

	fn is_same(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.state, &other.state)
	}
}

impl fmt::Debug for MemoryControl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryControl")
			.field("tag", &self.state.tag)
			.field("type", &self.state.input_type)
			.field("name", &self.state.name)
			.field("value", &*self.state.value.borrow())
			.field("checked", &self.state.checked.get())
			.finish()
	}
}

/// Listener handle issued by [`MemoryForm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryListener {
	id: usize,
	kind: FormEventKind,
}

#[derive(Default)]
struct FormState {
	controls: RefCell<Vec<MemoryControl>>,
	listeners: RefCell<Vec<(MemoryListener, EventHandler<MemoryControl>)>>,
	next_listener: Cell<usize>,
	report_validity_calls: Cell<usize>,
}

/// An in-memory `<form>`
///
/// Clones share the same controls and listeners.
#[derive(Clone, Default)]
pub struct MemoryForm {
	state: Rc<FormState>,
}

impl MemoryForm {
	/// Creates an empty form
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a control (builder style)
	pub fn with_control(self, control: MemoryControl) -> Self {
		self.push(control);
		self
	}

	/// Appends a control to the end of the form
	pub fn push(&self, control: MemoryControl) {
		self.state.controls.borrow_mut().push(control);
	}

	/// Number of attached listeners
	pub fn listener_count(&self) -> usize {
		self.state.listeners.borrow().len()
	}

	/// Number of attached listeners of one kind
	pub fn listener_count_for(&self, kind: FormEventKind) -> usize {
		self.state
			.listeners
			.borrow()
			.iter()
			.filter(|(listener, _)| listener.kind == kind)
			.count()
	}

	/// How many times `report_validity` ran
	pub fn report_validity_calls(&self) -> usize {
		self.state.report_validity_calls.get()
	}

	/// Dispatches an event to every listener of its kind
	///
	/// Returns `false` if a handler prevented the default action, like
	/// `EventTarget.dispatchEvent`.
	pub fn dispatch(&self, kind: FormEventKind, target: Option<&MemoryControl>) -> bool {
		let event = FormEvent::new(kind, target.cloned());
		let handlers: Vec<EventHandler<MemoryControl>> = self
			.state
			.listeners
			.borrow()
			.iter()
			.filter(|(listener, _)| listener.kind == kind)
			.map(|(_, handler)| handler.clone())
			.collect();
		for handler in handlers {
			handler(&event);
		}
		!event.default_prevented()
	}

	/// Types `text` into a text-like control (replaces the value, fires `input`)
	pub fn type_into(&self, control: &MemoryControl, text: &str) {
		control.set_value(text);
		self.dispatch(FormEventKind::Input, Some(control));
	}

	/// Fires `change` on a control, as the browser does when a text edit is
	/// committed
	pub fn commit(&self, control: &MemoryControl) {
		self.dispatch(FormEventKind::Change, Some(control));
	}

	/// Clicks a checkbox or radio button
	///
	/// Checkboxes flip; a radio becomes checked and unchecks its same-named
	/// siblings. Like a browser, `input` fires before `change`.
	pub fn toggle(&self, control: &MemoryControl) {
		match control.input_type().as_str() {
			"radio" => {
				let name = control.name();
				for sibling in self.state.controls.borrow().iter() {
					if sibling.input_type() == "radio" && sibling.name() == name {
						sibling.set_checked(sibling.is_same(control));
					}
				}
			}
			_ => control.set_checked(!control.checked()),
		}
		self.dispatch(FormEventKind::Input, Some(control));
		self.dispatch(FormEventKind::Change, Some(control));
	}

	/// Moves focus away from a control (fires `focusout`)
	pub fn blur(&self, control: &MemoryControl) {
		self.dispatch(FormEventKind::FocusOut, Some(control));
	}

	/// Submits the form
	///
	/// Returns `true` when the default submission would have proceeded.
	pub fn submit(&self) -> bool {
		self.dispatch(FormEventKind::Submit, None)
	}
}

impl FormElement for MemoryForm {
	type Control = MemoryControl;
	type Listener = MemoryListener;

	fn controls(&self) -> Vec<MemoryControl> {
		self.state.controls.borrow().clone()
	}

	fn report_validity(&self) -> bool {
		self.state
			.report_validity_calls
			.set(self.state.report_validity_calls.get() + 1);
		self.state
			.controls
			.borrow()
			.iter()
			.all(|control| control.validity_message().is_empty())
	}

	fn add_listener(
		&self,
		kind: FormEventKind,
		handler: EventHandler<MemoryControl>,
	) -> Result<MemoryListener, FormError> {
		let id = self.state.next_listener.get();
		self.state.next_listener.set(id + 1);

		let listener = MemoryListener { id, kind };
		self.state.listeners.borrow_mut().push((listener, handler));
		Ok(listener)
	}

	fn remove_listener(&self, listener: MemoryListener) -> Result<(), FormError> {
		let mut listeners = self.state.listeners.borrow_mut();
		let before = listeners.len();
		listeners.retain(|(existing, _)| *existing != listener);
		if listeners.len() == before {
			return Err(FormError::Listener {
				event: listener.kind.as_str(),
				reason: format!("listener #{} is not attached", listener.id),
			});
		}
		Ok(())
	}
}

impl fmt::Debug for MemoryForm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryForm")
			.field("controls", &*self.state.controls.borrow())
			.field("listeners", &self.listener_count())
			.finish()
	}
}
