//! Mutation router
//!
//! Translates DOM events on the bound form into updates of the data record
//! and the touched map. Events are applied synchronously in the order the
//! backend delivers them.
//!
//! | Event | Controls | Effect |
//! |-------|----------|--------|
//! | `input` | text-like | touched, value stored at the field path |
//! | `change` | checkbox | touched, boolean or group list recomputed |
//! | `change` | radio | touched, checked sibling's value stored |
//! | `change` | text-like | touched only |
//! | `focusout` | any | touched only |

use super::field::{self, ControlKind};
use super::index::ControlIndex;
use super::touched::TouchedMap;
use crate::debug_log;
use crate::dom::{FormControl, FormEvent, FormEventKind};
use crate::reactive::Signal;
use crate::record::{FormValue, Record};
use std::rc::Rc;

/// Routes control events into the form's containers
pub struct MutationRouter<C> {
	index: Rc<ControlIndex<C>>,
	data: Signal<Record>,
	touched: Signal<TouchedMap>,
}

impl<C: FormControl> MutationRouter<C> {
	/// Creates a router writing into `data` and `touched`
	pub fn new(index: Rc<ControlIndex<C>>, data: Signal<Record>, touched: Signal<TouchedMap>) -> Self {
		Self {
			index,
			data,
			touched,
		}
	}

	/// Handles one event; submit events and foreign targets are ignored
	pub fn handle(&self, event: &FormEvent<C>) {
		let Some(control) = event.target() else {
			return;
		};
		let kind = ControlKind::of(control);
		if !kind.is_supported() {
			return;
		}
		let name = control.name();
		if name.is_empty() {
			return;
		}

		match event.kind() {
			FormEventKind::Input => self.on_value_changed(control, kind, &name),
			FormEventKind::Change => self.on_selection_changed(control, kind, &name),
			FormEventKind::FocusOut => self.mark_touched(&name),
			FormEventKind::Submit => {}
		}
	}

	fn on_value_changed(&self, control: &C, kind: ControlKind, name: &str) {
		let ControlKind::TextLike { numeric } = kind else {
			// Checkbox and radio are handled on `change`
			return;
		};
		debug_log!("input on '{}'", name);
		self.mark_touched(name);
		self.store(name, field::text_value(control, numeric));
	}

	fn on_selection_changed(&self, control: &C, kind: ControlKind, name: &str) {
		self.mark_touched(name);
		let siblings = self.index.group(name);
		let value = match kind {
			ControlKind::Checkbox => field::checkbox_value(control, siblings),
			ControlKind::Radio => field::radio_value(control, siblings),
			_ => return,
		};
		debug_log!("selection on '{}': {:?}", name, value);
		self.store(name, value);
	}

	fn mark_touched(&self, name: &str) {
		if !self.touched.with(|touched| touched.is_touched(name)) {
			self.touched.update(|touched| {
				touched.mark(name);
			});
		}
	}

	fn store(&self, name: &str, value: FormValue) {
		self.data.update(|data| data.set_path(name, value));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::MemoryControl;
	use crate::form::snapshot::build_snapshot;
	use rstest::rstest;

	struct Harness {
		router: MutationRouter<MemoryControl>,
		data: Signal<Record>,
		touched: Signal<TouchedMap>,
	}

	fn harness(controls: &[MemoryControl]) -> Harness {
		let index = Rc::new(ControlIndex::build(controls));
		let snapshot = build_snapshot(controls, &index);
		let data = Signal::new(snapshot.data);
		let touched = Signal::new(snapshot.touched);
		Harness {
			router: MutationRouter::new(index, data.clone(), touched.clone()),
			data,
			touched,
		}
	}

	fn fire(router: &MutationRouter<MemoryControl>, kind: FormEventKind, control: &MemoryControl) {
		router.handle(&FormEvent::new(kind, Some(control.clone())));
	}

	#[rstest]
	fn test_input_updates_value_and_touched() {
		let email = MemoryControl::input("email", "account.email", "");
		let h = harness(std::slice::from_ref(&email));

		email.set_value("a@b.com");
		fire(&h.router, FormEventKind::Input, &email);

		assert_eq!(
			h.data.with(|d| d.get_path("account.email").cloned()),
			Some(FormValue::Text("a@b.com".into()))
		);
		assert!(h.touched.with(|t| t.is_touched("account.email")));
	}

	#[rstest]
	fn test_input_on_checkbox_is_ignored() {
		let agree = MemoryControl::checkbox("agree", "yes", false);
		let h = harness(std::slice::from_ref(&agree));

		agree.set_checked(true);
		fire(&h.router, FormEventKind::Input, &agree);

		assert_eq!(h.data.with(|d| d.get_path("agree").cloned()), Some(FormValue::Bool(false)));
		assert!(!h.touched.with(|t| t.is_touched("agree")));
	}

	#[rstest]
	fn test_numeric_input_yields_nan_for_garbage() {
		let age = MemoryControl::input("number", "age", "30");
		let h = harness(std::slice::from_ref(&age));

		age.set_value("thirty");
		fire(&h.router, FormEventKind::Input, &age);

		assert!(h.data.with(|d| d.get_path("age").and_then(FormValue::as_f64)).is_some_and(f64::is_nan));
	}

	#[rstest]
	fn test_change_recomputes_checkbox_group_in_document_order() {
		let technology = MemoryControl::checkbox("preferences", "technology", false);
		let films = MemoryControl::checkbox("preferences", "films", false);
		let h = harness(&[technology.clone(), films.clone()]);

		films.set_checked(true);
		fire(&h.router, FormEventKind::Change, &films);
		technology.set_checked(true);
		fire(&h.router, FormEventKind::Change, &technology);

		assert_eq!(
			h.data.with(|d| d.get_path("preferences").cloned()),
			Some(FormValue::List(vec!["technology".into(), "films".into()]))
		);
	}

	#[rstest]
	fn test_change_on_unindexed_checkbox_is_boolean() {
		let h = harness(&[]);
		let late = MemoryControl::checkbox("late", "yes", true);

		fire(&h.router, FormEventKind::Change, &late);

		assert_eq!(h.data.with(|d| d.get_path("late").cloned()), Some(FormValue::Bool(true)));
		assert!(h.touched.with(|t| t.is_touched("late")));
	}

	#[rstest]
	fn test_change_on_radio_takes_checked_sibling() {
		let free = MemoryControl::radio("plan", "free", true);
		let pro = MemoryControl::radio("plan", "pro", false);
		let h = harness(&[free.clone(), pro.clone()]);

		free.set_checked(false);
		pro.set_checked(true);
		fire(&h.router, FormEventKind::Change, &pro);

		assert_eq!(h.data.with(|d| d.get_path("plan").cloned()), Some(FormValue::Text("pro".into())));
	}

	#[rstest]
	fn test_focus_out_marks_touched_without_data_change() {
		let bio = MemoryControl::textarea("bio", "draft");
		let h = harness(std::slice::from_ref(&bio));
		let before = h.data.get();

		bio.set_value("changed without input event");
		fire(&h.router, FormEventKind::FocusOut, &bio);

		assert!(h.touched.with(|t| t.is_touched("bio")));
		assert_eq!(h.data.get(), before);
	}

	#[rstest]
	fn test_unnamed_and_unsupported_targets_are_ignored() {
		let anonymous = MemoryControl::input("text", "", "");
		let select = MemoryControl::other("country", "jp");
		let h = harness(&[anonymous.clone(), select.clone()]);

		fire(&h.router, FormEventKind::Input, &anonymous);
		fire(&h.router, FormEventKind::Change, &select);
		fire(&h.router, FormEventKind::FocusOut, &select);

		assert!(h.data.with(Record::is_empty));
		assert!(h.touched.with(TouchedMap::is_empty));
	}
}
