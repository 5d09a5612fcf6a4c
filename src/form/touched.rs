//! Per-field interaction flags
//!
//! Keys are control names as written in the markup (`account.email`), not
//! exploded into nested objects like the data record.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat map from field name to "the user has interacted with it"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchedMap {
	fields: BTreeMap<String, bool>,
}

impl TouchedMap {
	/// Creates an empty map
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `name` as untouched, keeping an existing entry as is
	pub fn register(&mut self, name: impl Into<String>) {
		self.fields.entry(name.into()).or_insert(false);
	}

	/// Marks `name` as touched, returning `true` if that changed anything
	pub fn mark(&mut self, name: &str) -> bool {
		match self.fields.get_mut(name) {
			Some(true) => false,
			Some(flag) => {
				*flag = true;
				true
			}
			None => {
				self.fields.insert(name.to_string(), true);
				true
			}
		}
	}

	/// Marks every registered field as touched
	pub fn mark_all(&mut self) {
		self.fields.values_mut().for_each(|flag| *flag = true);
	}

	/// Clears every flag back to untouched
	pub fn reset(&mut self) {
		self.fields.values_mut().for_each(|flag| *flag = false);
	}

	/// Whether `name` is touched (unknown names are not)
	pub fn is_touched(&self, name: &str) -> bool {
		self.fields.get(name).copied().unwrap_or(false)
	}

	/// Raw lookup
	pub fn get(&self, name: &str) -> Option<bool> {
		self.fields.get(name).copied()
	}

	/// Whether every registered field is touched
	pub fn all_touched(&self) -> bool {
		self.fields.values().all(|flag| *flag)
	}

	/// Number of registered fields
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether no field is registered
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// `(name, touched)` pairs in name order
	pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
		self.fields.iter().map(|(name, flag)| (name.as_str(), *flag))
	}

	/// Marks untouched fields whose value in `next` differs from `initial`
	///
	/// Used when the whole record is replaced programmatically, so that a
	/// field changed by code shows its validation state like one edited by the
	/// user. Touched fields stay touched.
	pub fn reconcile(&mut self, initial: &Record, next: &Record) {
		for (name, flag) in self.fields.iter_mut() {
			if *flag {
				continue;
			}
			let changed = match (initial.get_path(name), next.get_path(name)) {
				(Some(before), Some(after)) => !before.same_as(after),
				(None, None) => false,
				_ => true,
			};
			if changed {
				*flag = true;
			}
		}
	}
}
