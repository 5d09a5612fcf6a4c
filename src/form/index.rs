//! Name → controls index
//!
//! Built once when a form is bound. Checkbox and radio aggregation looks up
//! siblings here instead of querying the document by name on every event.
//! Controls added to the form after binding are not tracked.

use super::field::ControlKind;
use crate::dom::FormControl;
use std::collections::HashMap;

/// Same-named controls of a bound form, grouped by name
#[derive(Debug, Clone)]
pub struct ControlIndex<C> {
	groups: HashMap<String, Vec<C>>,
	// Field names in first-seen document order
	order: Vec<String>,
}

impl<C: FormControl> ControlIndex<C> {
	/// Indexes every named, supported control
	pub fn build(controls: &[C]) -> Self {
		let mut groups: HashMap<String, Vec<C>> = HashMap::new();
		let mut order = Vec::new();

		for control in controls {
			if !ControlKind::of(control).is_supported() {
				continue;
			}
			let name = control.name();
			if name.is_empty() {
				continue;
			}
			let members = groups.entry(name.clone()).or_insert_with(|| {
				order.push(name);
				Vec::new()
			});
			// Only push a control the first time it is seen
			if !members.iter().any(|member| member.is_same(control)) {
				members.push(control.clone());
			}
		}

		Self { groups, order }
	}

	/// Controls named `name`, in document order (empty when unknown)
	pub fn group(&self, name: &str) -> &[C] {
		self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Whether `name` was present at bind time
	pub fn contains(&self, name: &str) -> bool {
		self.groups.contains_key(name)
	}

	/// Field names in document order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.order.iter().map(String::as_str)
	}

	/// `(name, controls)` pairs in document order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[C])> {
		self.order
			.iter()
			.map(|name| (name.as_str(), self.group(name)))
	}

	/// Number of distinct field names
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether no field was indexed
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}
}
