//! Snapshot builder
//!
//! Walks the controls of a form once, in document order, and produces the
//! initial data record together with an all-false touched map.

use super::field::{self, ControlKind};
use super::index::ControlIndex;
use super::touched::TouchedMap;
use crate::dom::FormControl;
use crate::record::{FormValue, Record};

/// Result of walking a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
	/// Nested data record
	pub data: Record,
	/// One untouched entry per distinct field name
	pub touched: TouchedMap,
}

/// Builds the snapshot of `controls`
///
/// For a checkbox group the first control seen decides between a boolean and
/// a list; later members only append their value to an existing list.
/// Unnamed and unsupported controls are skipped.
pub fn build_snapshot<C: FormControl>(controls: &[C], index: &ControlIndex<C>) -> Snapshot {
	let mut snapshot = Snapshot::default();

	for control in controls {
		let kind = ControlKind::of(control);
		if !kind.is_supported() {
			continue;
		}
		let name = control.name();
		if name.is_empty() {
			continue;
		}

		let first_seen = snapshot.touched.get(&name).is_none();
		snapshot.touched.register(name.as_str());

		match kind {
			ControlKind::Checkbox if first_seen => {
				let value = if index.group(&name).len() > 1 {
					FormValue::List(control.checked().then(|| control.value()).into_iter().collect())
				} else {
					FormValue::Bool(control.checked())
				};
				snapshot.data.set_path(&name, value);
			}
			ControlKind::Checkbox => {
				if control.checked()
					&& let Some(FormValue::List(values)) = snapshot.data.get_path_mut(&name)
				{
					values.push(control.value());
				}
			}
			ControlKind::Radio if first_seen => {
				let value = if control.checked() {
					FormValue::Text(control.value())
				} else {
					FormValue::Unset
				};
				snapshot.data.set_path(&name, value);
			}
			ControlKind::Radio => {
				if control.checked() {
					snapshot.data.set_path(&name, FormValue::Text(control.value()));
				}
			}
			ControlKind::TextLike { numeric } => {
				snapshot.data.set_path(&name, field::text_value(control, numeric));
			}
			ControlKind::Unsupported => {}
		}
	}

	snapshot
}
