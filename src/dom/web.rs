//! `web_sys` backend (WASM only)
//!
//! Wraps an `HtmlFormElement` and its controls. Listeners are
//! `wasm_bindgen` closures kept alive by the returned [`WebListener`] and
//! removed with `removeEventListener` on destroy, never leaked with
//! `Closure::forget`.

use super::{ControlTag, EventHandler, FormControl, FormElement, FormEvent, FormEventKind};
use crate::error::FormError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

/// A control element of a bound `<form>`
#[derive(Debug, Clone)]
pub struct WebControl(Element);

impl WebControl {
	/// Wraps a DOM element
	pub fn new(element: Element) -> Self {
		Self(element)
	}

	/// Underlying DOM element
	pub fn element(&self) -> &Element {
		&self.0
	}

	fn as_input(&self) -> Option<&HtmlInputElement> {
		self.0.dyn_ref::<HtmlInputElement>()
	}

	fn as_textarea(&self) -> Option<&HtmlTextAreaElement> {
		self.0.dyn_ref::<HtmlTextAreaElement>()
	}
}

impl FormControl for WebControl {
	fn tag(&self) -> ControlTag {
		if self.as_input().is_some() {
			ControlTag::Input
		} else if self.as_textarea().is_some() {
			ControlTag::TextArea
		} else {
			ControlTag::Other
		}
	}

	fn name(&self) -> String {
		if let Some(input) = self.as_input() {
			input.name()
		} else if let Some(textarea) = self.as_textarea() {
			textarea.name()
		} else {
			self.0.get_attribute("name").unwrap_or_default()
		}
	}

	fn input_type(&self) -> String {
		// HTMLInputElement.type already falls back to "text"
		self.as_input()
			.map(|input| input.type_().to_ascii_lowercase())
			.unwrap_or_default()
	}

	fn value(&self) -> String {
		if let Some(input) = self.as_input() {
			input.value()
		} else if let Some(textarea) = self.as_textarea() {
			textarea.value()
		} else {
			String::new()
		}
	}

	fn checked(&self) -> bool {
		self.as_input().is_some_and(HtmlInputElement::checked)
	}

	fn set_value(&self, value: &str) {
		if let Some(input) = self.as_input() {
			// File inputs only accept the empty string
			if input.type_() != "file" {
				input.set_value(value);
			}
		} else if let Some(textarea) = self.as_textarea() {
			textarea.set_value(value);
		}
	}

	fn set_checked(&self, checked: bool) {
		if let Some(input) = self.as_input() {
			input.set_checked(checked);
		}
	}

	fn set_custom_validity(&self, message: &str) {
		if let Some(input) = self.as_input() {
			input.set_custom_validity(message);
		} else if let Some(textarea) = self.as_textarea() {
			textarea.set_custom_validity(message);
		}
	}

	fn is_same(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

/// Attached DOM listener
///
/// Owns the JS closure; dropping it without calling
/// [`FormElement::remove_listener`] leaves a dangling callback in the page.
pub struct WebListener {
	kind: FormEventKind,
	closure: Closure<dyn FnMut(Event)>,
}

/// A `<form>` element in the live document
#[derive(Debug, Clone)]
pub struct WebForm(HtmlFormElement);

impl WebForm {
	/// Wraps a form element
	pub fn new(form: HtmlFormElement) -> Self {
		Self(form)
	}

	/// Wraps a generic element if it is a `<form>`
	pub fn from_element(element: Element) -> Option<Self> {
		element.dyn_into::<HtmlFormElement>().ok().map(Self)
	}

	/// Underlying form element
	pub fn element(&self) -> &HtmlFormElement {
		&self.0
	}
}

impl FormElement for WebForm {
	type Control = WebControl;
	type Listener = WebListener;

	fn controls(&self) -> Vec<WebControl> {
		let elements = self.0.elements();
		(0..elements.length())
			.filter_map(|i| elements.item(i))
			.map(WebControl)
			.collect()
	}

	fn report_validity(&self) -> bool {
		self.0.report_validity()
	}

	fn add_listener(
		&self,
		kind: FormEventKind,
		handler: EventHandler<WebControl>,
	) -> Result<WebListener, FormError> {
		let closure = Closure::wrap(Box::new(move |event: Event| {
			let target = event
				.target()
				.and_then(|target| target.dyn_into::<Element>().ok())
				.map(WebControl);
			let form_event = FormEvent::new(kind, target);
			handler(&form_event);
			if form_event.default_prevented() {
				event.prevent_default();
			}
		}) as Box<dyn FnMut(Event)>);

		self.0
			.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
			.map_err(|err| FormError::Listener {
				event: kind.as_str(),
				reason: format!("{:?}", err),
			})?;

		Ok(WebListener { kind, closure })
	}

	fn remove_listener(&self, listener: WebListener) -> Result<(), FormError> {
		self.0
			.remove_event_listener_with_callback(
				listener.kind.as_str(),
				listener.closure.as_ref().unchecked_ref(),
			)
			.map_err(|err| FormError::Listener {
				event: listener.kind.as_str(),
				reason: format!("{:?}", err),
			})
	}
}
