//! Binding lifecycle
//!
//! [`Form::bind`] connects a form to an element: it snapshots the controls,
//! attaches the `input`, `change`, `focusout` and `submit` listeners and,
//! with constraint API integration, mirrors error messages into the controls'
//! native validity state. The returned [`Binding`] undoes all of that on
//! [`Binding::destroy`] or when dropped.
//!
//! ## Example
//!
//! ```
//! use reinhardt_form_binder::dom::{MemoryControl, MemoryForm};
//! use reinhardt_form_binder::{FormConfig, FormValue, create_form};
//!
//! let email = MemoryControl::input("email", "account.email", "");
//! let element = MemoryForm::new().with_control(email.clone());
//!
//! let form = create_form(FormConfig::new(|_| async { Ok(()) }));
//! let binding = form.bind(element.clone()).unwrap();
//!
//! element.type_into(&email, "a@b.com");
//! assert_eq!(
//!     form.data().with(|d| d.get_path("account.email").cloned()),
//!     Some(FormValue::from("a@b.com"))
//! );
//!
//! binding.destroy().unwrap();
//! assert_eq!(element.listener_count(), 0);
//! ```

use super::field;
use super::index::ControlIndex;
use super::router::MutationRouter;
use super::snapshot::build_snapshot;
use super::state::{BoundSurface, Form};
use super::submit;
use crate::dom::{EventHandler, FormControl, FormElement, FormEvent, FormEventKind};
use crate::error::{FormError, FormResult};
use crate::reactive::Subscription;
use crate::record::{FormValue, Record};
use crate::logging;
use crate::{error_log, info_log, warn_log};
use futures::FutureExt;
use std::fmt;
use std::rc::Rc;

impl Form {
	/// Binds the form to `element`
	///
	/// Configured initial values are written into the controls first; the
	/// data record and touched map are then rebuilt from the controls.
	///
	/// # Errors
	///
	/// - [`FormError::AlreadyBound`] if this form is bound elsewhere
	/// - [`FormError::Listener`] if the element rejects a listener; listeners
	///   attached so far are removed again
	pub fn bind<E: FormElement>(&self, element: E) -> FormResult<Binding<E>> {
		let inner = &self.inner;
		if inner.bound.borrow().is_some() {
			return Err(FormError::AlreadyBound);
		}

		let element = Rc::new(element);
		let controls = element.controls();
		let index = Rc::new(ControlIndex::build(&controls));
		if let Some(initial) = &inner.configured_initial {
			field::apply_record(&index, initial);
		}

		let snapshot = build_snapshot(&controls, &index);
		info_log!(
			"binding form with {} field(s) from {} control(s)",
			snapshot.touched.len(),
			controls.len()
		);
		*inner.initial.borrow_mut() = snapshot.data.clone();
		inner.touched.set(snapshot.touched);
		inner.data.set(snapshot.data);

		*inner.bound.borrow_mut() = Some(BoundSurface {
			report_validity: {
				let element = Rc::clone(&element);
				Rc::new(move || element.report_validity())
			},
			reflect: {
				let index = Rc::clone(&index);
				Rc::new(move |record: &Record| field::apply_record(&index, record))
			},
		});

		// From here on, dropping `binding` undoes the partial setup
		let mut binding = Binding {
			element: Rc::clone(&element),
			form: self.clone(),
			listeners: Vec::with_capacity(FormEventKind::ALL.len()),
			validity: None,
			destroyed: false,
		};

		let router = Rc::new(MutationRouter::new(
			Rc::clone(&index),
			inner.data.clone(),
			inner.touched.clone(),
		));
		for kind in [
			FormEventKind::Input,
			FormEventKind::Change,
			FormEventKind::FocusOut,
		] {
			let router = Rc::clone(&router);
			let handler: EventHandler<E::Control> =
				Rc::new(move |event: &FormEvent<E::Control>| router.handle(event));
			binding.listeners.push(element.add_listener(kind, handler)?);
		}

		let weak = Rc::downgrade(inner);
		let on_submit: EventHandler<E::Control> =
			Rc::new(move |event: &FormEvent<E::Control>| {
				event.prevent_default();
				let Some(inner) = weak.upgrade() else {
					return;
				};
				let spawner = Rc::clone(&inner.spawner);
				spawner(
					async move {
						if let Err(error) = submit::run_submit(inner).await {
							logging::report_uncaught(&error);
						}
					}
					.boxed_local(),
				);
			});
		binding
			.listeners
			.push(element.add_listener(FormEventKind::Submit, on_submit)?);

		if inner.options.use_constraint_api {
			let index = Rc::clone(&index);
			binding.validity = Some(
				inner
					.errors
					.subscribe(move |errors: &Record| push_validity(&index, errors)),
			);
		}

		Ok(binding)
	}
}

/// Writes each field's error message (or an empty one) into its controls
fn push_validity<C: FormControl>(index: &ControlIndex<C>, errors: &Record) {
	for (name, controls) in index.iter() {
		let message = errors
			.get_path(name)
			.and_then(FormValue::error_message)
			.unwrap_or_default();
		for control in controls {
			control.set_custom_validity(&message);
		}
	}
}

/// A form bound to an element
///
/// Dropping the binding detaches it, like [`Binding::destroy`] but with
/// failures only logged. A submission already in flight keeps running.
pub struct Binding<E: FormElement> {
	element: Rc<E>,
	form: Form,
	listeners: Vec<E::Listener>,
	validity: Option<Subscription>,
	destroyed: bool,
}

impl<E: FormElement> Binding<E> {
	/// The bound element
	pub fn element(&self) -> &E {
		&self.element
	}

	/// The bound form
	pub fn form(&self) -> &Form {
		&self.form
	}

	/// Number of listeners currently attached by this binding
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Detaches every listener and the validity subscription
	///
	/// The form keeps its data and can be bound again.
	///
	/// # Errors
	///
	/// Returns the first [`FormError::Listener`] reported by the element. The
	/// remaining listeners are still removed.
	pub fn destroy(mut self) -> FormResult<()> {
		self.teardown()
	}

	fn teardown(&mut self) -> FormResult<()> {
		if self.destroyed {
			return Ok(());
		}
		self.destroyed = true;

		if let Some(subscription) = self.validity.take() {
			subscription.unsubscribe();
		}
		self.form.inner.bound.borrow_mut().take();

		let mut first_error = None;
		for listener in self.listeners.drain(..) {
			if let Err(error) = self.element.remove_listener(listener) {
				warn_log!("failed to detach listener: {}", error);
				first_error.get_or_insert(error);
			}
		}
		info_log!("form unbound");

		match first_error {
			Some(error) => Err(error),
			None => Ok(()),
		}
	}
}

impl<E: FormElement> Drop for Binding<E> {
	fn drop(&mut self) {
		if let Err(error) = self.teardown() {
			error_log!("form binding teardown failed: {}", error);
		}
	}
}

impl<E: FormElement> fmt::Debug for Binding<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binding")
			.field("listeners", &self.listeners.len())
			.field("constraint_api", &self.validity.is_some())
			.field("destroyed", &self.destroyed)
			.finish()
	}
}
