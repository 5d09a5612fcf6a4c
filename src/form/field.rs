//! Field codec
//!
//! Converts between a control's DOM state and a [`FormValue`] leaf.
//!
//! | Control | Leaf |
//! |---------|------|
//! | `number`, `range` | `Number` (NaN when unparsable or empty) |
//! | lone `checkbox` | `Bool` (checked state) |
//! | grouped `checkbox` | `List` of checked values, in document order |
//! | `radio` group | `Text` of the checked value, or `Unset` |
//! | any other input, `textarea` | `Text`, unmodified |
//!
//! Controls that are neither `<input>` nor `<textarea>` are
//! [`ControlKind::Unsupported`] and never reach the codec.

use super::index::ControlIndex;
use crate::dom::{ControlTag, FormControl};
use crate::record::{FormValue, Record};

/// Closed classification of a control, computed before any dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
	/// Text, email, password, file, textarea, ...
	TextLike {
		/// `number` or `range`
		numeric: bool,
	},
	/// `<input type="checkbox">`
	Checkbox,
	/// `<input type="radio">`
	Radio,
	/// Not an input or textarea
	Unsupported,
}

impl ControlKind {
	/// Classifies a control
	pub fn of<C: FormControl>(control: &C) -> Self {
		Self::from_parts(control.tag(), &control.input_type())
	}

	/// Classifies from a tag and an input type
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_form_binder::dom::ControlTag;
	/// use reinhardt_form_binder::form::field::ControlKind;
	///
	/// assert_eq!(ControlKind::from_parts(ControlTag::Input, "range"), ControlKind::TextLike { numeric: true });
	/// assert_eq!(ControlKind::from_parts(ControlTag::TextArea, ""), ControlKind::TextLike { numeric: false });
	/// assert_eq!(ControlKind::from_parts(ControlTag::Other, ""), ControlKind::Unsupported);
	/// ```
	pub fn from_parts(tag: ControlTag, input_type: &str) -> Self {
		match tag {
			ControlTag::Input => match input_type {
				"checkbox" => Self::Checkbox,
				"radio" => Self::Radio,
				"number" | "range" => Self::TextLike { numeric: true },
				_ => Self::TextLike { numeric: false },
			},
			ControlTag::TextArea => Self::TextLike { numeric: false },
			ControlTag::Other => Self::Unsupported,
		}
	}

	/// Whether the binding tracks this kind at all
	pub fn is_supported(&self) -> bool {
		!matches!(self, Self::Unsupported)
	}
}

/// Parses a numeric control value
///
/// Unparsable input, including the empty string, yields NaN rather than an
/// error; consumers validate it explicitly.
pub fn parse_number(raw: &str) -> f64 {
	raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Formats a number for writing back into a numeric control
pub fn format_number(value: f64) -> String {
	if value.is_finite() {
		value.to_string()
	} else {
		String::new()
	}
}

/// Value of a text-like control
pub fn text_value<C: FormControl>(control: &C, numeric: bool) -> FormValue {
	let raw = control.value();
	if numeric {
		FormValue::Number(parse_number(&raw))
	} else {
		FormValue::Text(raw)
	}
}

/// Value of a checkbox given its same-named siblings
///
/// More than one sibling makes it a group; zero or one sibling (a control
/// added after the index was built has none) makes it a lone boolean.
pub fn checkbox_value<C: FormControl>(control: &C, siblings: &[C]) -> FormValue {
	if siblings.len() > 1 {
		FormValue::List(
			siblings
				.iter()
				.filter(|sibling| sibling.checked())
				.map(FormControl::value)
				.collect(),
		)
	} else {
		FormValue::Bool(control.checked())
	}
}

/// Value of a radio group: the checked sibling's value, or `Unset`
pub fn radio_value<C: FormControl>(control: &C, siblings: &[C]) -> FormValue {
	let checked = if siblings.is_empty() {
		control.checked().then(|| control.value())
	} else {
		siblings
			.iter()
			.find(|sibling| sibling.checked())
			.map(FormControl::value)
	};
	checked.map_or(FormValue::Unset, FormValue::Text)
}

/// Decodes a control into its field value, consulting the index for groups
///
/// Returns `None` for unsupported controls.
pub fn decode<C: FormControl>(control: &C, index: &ControlIndex<C>) -> Option<FormValue> {
	let value = match ControlKind::of(control) {
		ControlKind::TextLike { numeric } => text_value(control, numeric),
		ControlKind::Checkbox => checkbox_value(control, index.group(&control.name())),
		ControlKind::Radio => radio_value(control, index.group(&control.name())),
		ControlKind::Unsupported => return None,
	};
	Some(value)
}

/// Writes a field value back into one control, without firing events
///
/// Values whose shape does not fit the control (a list into a text box, an
/// object anywhere) leave the control untouched.
pub fn apply_value<C: FormControl>(control: &C, value: &FormValue) {
	match (ControlKind::of(control), value) {
		(ControlKind::TextLike { .. }, FormValue::Text(text)) => control.set_value(text),
		(ControlKind::TextLike { .. }, FormValue::Number(n)) => control.set_value(&format_number(*n)),
		(ControlKind::TextLike { .. }, FormValue::Unset) => control.set_value(""),
		(ControlKind::Checkbox, FormValue::Bool(checked)) => control.set_checked(*checked),
		(ControlKind::Checkbox, FormValue::List(values)) => {
			let own = control.value();
			control.set_checked(values.iter().any(|v| *v == own));
		}
		(ControlKind::Radio, FormValue::Text(selected)) => control.set_checked(control.value() == *selected),
		(ControlKind::Radio, FormValue::Unset) => control.set_checked(false),
		_ => {}
	}
}

/// Writes every indexed field present in `record` back into its controls
pub fn apply_record<C: FormControl>(index: &ControlIndex<C>, record: &Record) {
	for (name, controls) in index.iter() {
		if let Some(value) = record.get_path(name) {
			for control in controls {
				apply_value(control, value);
			}
		}
	}
}
