//! Nested data records
//!
//! A [`Record`] is the structured view of a form: dotted control names such
//! as `profile.picture` become nested maps (`{ profile: { picture: .. } }`).
//! The same type carries validation errors, where a truthy leaf is a failure
//! message for that path.
//!
//! ## Example
//!
//! ```
//! use reinhardt_form_binder::{FormValue, Record};
//!
//! let mut record = Record::new();
//! record.set_path("account.email", FormValue::from("a@b.com"));
//!
//! assert_eq!(
//!     record.get_path("account.email"),
//!     Some(&FormValue::Text("a@b.com".to_string()))
//! );
//! assert!(record.get("account").is_some_and(FormValue::is_object));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between path segments in control names
pub const PATH_SEPARATOR: char = '.';

/// A single value inside a [`Record`]
///
/// Serializes untagged, so a record round-trips through plain JSON objects.
/// `Unset` is written as `null`; a NaN number is written as `null` as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
	/// No value (an unchecked radio group)
	#[default]
	Unset,
	/// Checked state of a lone checkbox
	Bool(bool),
	/// Value of a `number`/`range` control; NaN for unparsable input
	Number(f64),
	/// Raw value of any other text-like control
	Text(String),
	/// Values of the checked members of a checkbox group
	List(Vec<String>),
	/// Nested fields
	Object(Record),
}

impl FormValue {
	/// Whether this is a nested object
	pub fn is_object(&self) -> bool {
		matches!(self, Self::Object(_))
	}

	/// Text content, if this is a text leaf
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Number content, if this is a number leaf
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Boolean content, if this is a boolean leaf
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// List content, if this is a list leaf
	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Truthiness of a leaf when read as a validation error
	///
	/// Empty text, `false`, zero, NaN, `Unset` and lists without a non-empty
	/// message are falsy. An object is truthy when any of its leaves is.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Unset => false,
			Self::Bool(b) => *b,
			Self::Number(n) => *n != 0.0 && !n.is_nan(),
			Self::Text(s) => !s.is_empty(),
			Self::List(items) => items.iter().any(|s| !s.is_empty()),
			Self::Object(record) => record.has_truthy_leaf(),
		}
	}

	/// Error message carried by this leaf, if it denotes a failure
	///
	/// Lists of messages are joined with newlines.
	pub fn error_message(&self) -> Option<String> {
		match self {
			Self::Text(s) if !s.is_empty() => Some(s.clone()),
			Self::List(items) => {
				let messages: Vec<&str> = items
					.iter()
					.map(String::as_str)
					.filter(|s| !s.is_empty())
					.collect();
				(!messages.is_empty()).then(|| messages.join("\n"))
			}
			Self::Bool(true) => Some(String::from("Invalid value")),
			_ => None,
		}
	}

	/// Equality used when reconciling touched state
	///
	/// Unlike `PartialEq`, two NaN numbers compare equal here so that an
	/// untouched numeric field holding NaN is not reported as changed.
	pub fn same_as(&self, other: &FormValue) -> bool {
		match (self, other) {
			(Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
			(Self::Object(a), Self::Object(b)) => {
				a.len() == b.len()
					&& a
						.iter()
						.all(|(key, value)| b.get(key).is_some_and(|other| value.same_as(other)))
			}
			_ => self == other,
		}
	}
}

impl From<&str> for FormValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FormValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for FormValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for FormValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<Vec<String>> for FormValue {
	fn from(value: Vec<String>) -> Self {
		Self::List(value)
	}
}

impl From<Record> for FormValue {
	fn from(value: Record) -> Self {
		Self::Object(value)
	}
}

/// A nested mapping from field keys to [`FormValue`]s
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
	fields: BTreeMap<String, FormValue>,
}

impl Record {
	/// Create an empty record
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of top-level keys
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the record has no keys
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Top-level lookup
	pub fn get(&self, key: &str) -> Option<&FormValue> {
		self.fields.get(key)
	}

	/// Top-level insert, returning the previous value
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FormValue>) -> Option<FormValue> {
		self.fields.insert(key.into(), value.into())
	}

	/// Iterate over top-level entries in key order
	pub fn iter(&self) -> impl Iterator<Item = (&String, &FormValue)> {
		self.fields.iter()
	}

	/// Look up the value at a dotted path
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_form_binder::{FormValue, Record};
	///
	/// let mut record = Record::new();
	/// record.set_path("profile.picture", FormValue::from("me.png"));
	///
	/// assert_eq!(record.get_path("profile.picture").and_then(FormValue::as_str), Some("me.png"));
	/// assert_eq!(record.get_path("profile.missing"), None);
	/// assert_eq!(record.get_path("profile.picture.deeper"), None);
	/// ```
	pub fn get_path(&self, path: &str) -> Option<&FormValue> {
		let mut segments = path.split(PATH_SEPARATOR);
		let first = segments.next()?;
		let mut current = self.fields.get(first)?;
		for segment in segments {
			match current {
				FormValue::Object(record) => current = record.fields.get(segment)?,
				_ => return None,
			}
		}
		Some(current)
	}

	/// Store a value at a dotted path, creating intermediate objects
	///
	/// A non-object value sitting where an intermediate object is needed is
	/// replaced by an object.
	pub fn set_path(&mut self, path: &str, value: FormValue) {
		match path.split_once(PATH_SEPARATOR) {
			None => {
				self.fields.insert(path.to_string(), value);
			}
			Some((head, rest)) => {
				let slot = self
					.fields
					.entry(head.to_string())
					.or_insert_with(|| FormValue::Object(Record::new()));
				if !slot.is_object() {
					*slot = FormValue::Object(Record::new());
				}
				if let FormValue::Object(child) = slot {
					child.set_path(rest, value);
				}
			}
		}
	}

	/// Mutable lookup at a dotted path
	pub fn get_path_mut(&mut self, path: &str) -> Option<&mut FormValue> {
		match path.split_once(PATH_SEPARATOR) {
			None => self.fields.get_mut(path),
			Some((head, rest)) => match self.fields.get_mut(head)? {
				FormValue::Object(child) => child.get_path_mut(rest),
				_ => None,
			},
		}
	}

	/// Whether any leaf anywhere in the record is truthy
	///
	/// For an errors record this is "the form is invalid".
	pub fn has_truthy_leaf(&self) -> bool {
		self.fields.values().any(FormValue::is_truthy)
	}

	/// Dotted paths of every leaf, depth first in key order
	pub fn leaf_paths(&self) -> Vec<String> {
		let mut paths = Vec::new();
		self.collect_leaf_paths("", &mut paths);
		paths
	}

	fn collect_leaf_paths(&self, prefix: &str, paths: &mut Vec<String>) {
		for (key, value) in &self.fields {
			let path = if prefix.is_empty() {
				key.clone()
			} else {
				format!("{prefix}{PATH_SEPARATOR}{key}")
			};
			match value {
				FormValue::Object(child) => child.collect_leaf_paths(&path, paths),
				_ => paths.push(path),
			}
		}
	}
}

impl FromIterator<(String, FormValue)> for Record {
	fn from_iter<I: IntoIterator<Item = (String, FormValue)>>(iter: I) -> Self {
		Self {
			fields: iter.into_iter().collect(),
		}
	}
}
