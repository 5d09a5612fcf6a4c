//! Data record store
//!
//! [`DataStore`] wraps the form's data signal. Reads and subscriptions behave
//! like the signal itself; programmatic writes are also written into the
//! bound controls, and `set` additionally marks untouched fields whose value
//! moved away from the bind-time value.

use super::state::FormInner;
use crate::reactive::Subscription;
use crate::record::Record;
use std::fmt;
use std::rc::Rc;

/// Handle to a form's data record
#[derive(Clone)]
pub struct DataStore {
	inner: Rc<FormInner>,
}

impl DataStore {
	pub(crate) fn new(inner: Rc<FormInner>) -> Self {
		Self { inner }
	}

	/// Clone of the current record
	pub fn get(&self) -> Record {
		self.inner.data.get()
	}

	/// Borrow the current record for the duration of `f`
	pub fn with<R>(&self, f: impl FnOnce(&Record) -> R) -> R {
		self.inner.data.with(f)
	}

	/// Replaces the whole record
	///
	/// Every untouched field whose new value differs from its bind-time value
	/// is marked touched before subscribers see the new record.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_form_binder::dom::{FormControl, MemoryControl, MemoryForm};
	/// use reinhardt_form_binder::{FormConfig, FormValue, create_form};
	///
	/// let email = MemoryControl::input("email", "email", "");
	/// let element = MemoryForm::new().with_control(email.clone());
	/// let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	/// let _binding = form.bind(element).unwrap();
	///
	/// let mut data = form.data().get();
	/// data.set_path("email", FormValue::from("a@b.com"));
	/// form.data().set(data);
	///
	/// assert!(form.touched().with(|t| t.is_touched("email")));
	/// assert_eq!(email.value(), "a@b.com");
	/// ```
	pub fn set(&self, value: Record) {
		let reconciled = {
			let initial = self.inner.initial.borrow();
			self.inner.touched.with(|touched| {
				let mut next = touched.clone();
				next.reconcile(&initial, &value);
				(next != *touched).then_some(next)
			})
		};
		if let Some(next) = reconciled {
			self.inner.touched.set(next);
		}
		self.inner.reflect(&value);
		self.inner.data.set(value);
	}

	/// Mutates the record in place
	///
	/// Unlike [`DataStore::set`] this leaves touched flags alone.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut Record),
	{
		self.inner.data.update(f);
		self.inner.data.with(|data| self.inner.reflect(data));
	}

	/// Subscribes to the record; see [`Signal::subscribe`](crate::Signal::subscribe)
	#[must_use = "dropping the Subscription unsubscribes immediately"]
	pub fn subscribe<F>(&self, f: F) -> Subscription
	where
		F: Fn(&Record) + 'static,
	{
		self.inner.data.subscribe(f)
	}
}

impl fmt::Debug for DataStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("DataStore").field(&self.inner.data).finish()
	}
}
