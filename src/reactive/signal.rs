//! Signal - Observable Value Container
//!
//! `Signal<T>` holds a value and notifies subscribers whenever it is replaced
//! through `set()` or mutated through `update()`.
//!
//! ## Key Features
//!
//! - **Shared state**: clones share the same value via `Rc<RefCell<Rc<T>>>`
//! - **Re-entrant**: subscribers may read or write any signal, including the
//!   one notifying them
//! - **Explicit subscriptions**: `subscribe()` returns a [`Subscription`] that
//!   unsubscribes when dropped or when [`Subscription::unsubscribe`] is called
//! - **Immediate delivery**: a new subscriber is called once with the current
//!   value, then on every change
//!
//! ## Example
//!
//! ```
//! use reinhardt_form_binder::reactive::Signal;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(0);
//! let seen = Rc::new(Cell::new(0));
//!
//! let seen_clone = seen.clone();
//! let subscription = count.subscribe(move |n| seen_clone.set(*n));
//!
//! count.set(42);
//! assert_eq!(seen.get(), 42);
//!
//! count.update(|n| *n += 1);
//! assert_eq!(seen.get(), 43);
//!
//! subscription.unsubscribe();
//! count.set(0);
//! assert_eq!(seen.get(), 43);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::rc::{Rc, Weak};

/// Unique identifier for a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

type SubscriberFn<T> = Rc<dyn Fn(&T)>;

struct SignalInner<T> {
	// Replaced, never mutated in place while shared, so readers can hold a
	// snapshot without keeping the cell borrowed
	value: RefCell<Rc<T>>,
	subscribers: RefCell<Vec<(usize, SubscriberFn<T>)>>,
	next_subscriber: Cell<usize>,
}

/// An observable value shared between clones
///
/// ## Type Parameter
///
/// * `T` - The stored value. Must be `'static` because subscribers are boxed
///   closures that outlive the call site.
pub struct Signal<T: 'static> {
	id: NodeId,
	inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			inner: self.inner.clone(),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	///
	/// # Arguments
	///
	/// * `value` - Initial value for the signal
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			inner: Rc::new(SignalInner {
				value: RefCell::new(Rc::new(value)),
				subscribers: RefCell::new(Vec::new()),
				next_subscriber: Cell::new(0),
			}),
		}
	}

	/// Get a clone of the current value
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		T::clone(&self.snapshot())
	}

	/// Borrow the current value for the duration of `f`
	///
	/// Avoids cloning large records when only a part is needed.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.snapshot())
	}

	/// Replace the value and notify subscribers
	pub fn set(&self, value: T) {
		*self.inner.value.borrow_mut() = Rc::new(value);
		self.notify();
	}

	/// Mutate the value in place and notify subscribers once
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_form_binder::reactive::Signal;
	///
	/// let count = Signal::new(0);
	/// count.update(|n| *n += 1);
	/// assert_eq!(count.get(), 1);
	/// ```
	pub fn update<F>(&self, f: F)
	where
		T: Clone,
		F: FnOnce(&mut T),
	{
		{
			let mut value = self.inner.value.borrow_mut();
			// Clones only when a subscriber still holds the previous snapshot
			f(Rc::make_mut(&mut value));
		}
		self.notify();
	}

	/// Register a subscriber
	///
	/// The subscriber is called immediately with the current value and then
	/// after every `set()`/`update()`. It stays registered until the returned
	/// [`Subscription`] is dropped or unsubscribed.
	#[must_use = "dropping the Subscription unsubscribes immediately"]
	pub fn subscribe<F>(&self, f: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		let key = self.inner.next_subscriber.get();
		self.inner.next_subscriber.set(key + 1);

		let subscriber: SubscriberFn<T> = Rc::new(f);
		self.inner
			.subscribers
			.borrow_mut()
			.push((key, subscriber.clone()));
		subscriber(&self.snapshot());

		let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
		Subscription {
			cancel: Some(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.subscribers.borrow_mut().retain(|(k, _)| *k != key);
				}
			})),
		}
	}

	/// Number of live subscribers
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}

	fn snapshot(&self) -> Rc<T> {
		Rc::clone(&self.inner.value.borrow())
	}

	fn notify(&self) {
		// Snapshot the list so subscribers may subscribe, unsubscribe, read or
		// write this signal while being notified. Each subscriber sees the
		// value current at its own call, so a write made by an earlier
		// subscriber is not followed by a stale delivery.
		let subscribers: Vec<SubscriberFn<T>> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, f)| f.clone())
			.collect();
		for subscriber in subscribers {
			let value = self.snapshot();
			subscriber(&value);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.snapshot())
			.finish()
	}
}

/// Handle to a signal subscription
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Unsubscribe explicitly
	pub fn unsubscribe(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_signal_creation() {
		let signal = Signal::new(42);
		assert_eq!(signal.get(), 42);
	}

	#[rstest]
	fn test_signal_clone_shares_value() {
		let signal1 = Signal::new(42);
		let signal2 = signal1.clone();

		signal1.set(100);
		assert_eq!(signal2.get(), 100);
		assert_eq!(signal1.id(), signal2.id());
	}

	#[rstest]
	fn test_subscribe_receives_current_value_immediately() {
		let signal = Signal::new("initial".to_string());
		let seen = Rc::new(RefCell::new(Vec::new()));

		let seen_clone = seen.clone();
		let _sub = signal.subscribe(move |v| seen_clone.borrow_mut().push(v.clone()));
		signal.set("next".to_string());

		assert_eq!(*seen.borrow(), vec!["initial", "next"]);
	}

	#[rstest]
	fn test_update_notifies_once() {
		let signal = Signal::new(vec![1]);
		let calls = Rc::new(Cell::new(0));

		let calls_clone = calls.clone();
		let _sub = signal.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));
		signal.update(|v| {
			v.push(2);
			v.push(3);
		});

		// One call on subscribe, one for the update
		assert_eq!(calls.get(), 2);
		assert_eq!(signal.get(), vec![1, 2, 3]);
	}

	#[rstest]
	fn test_dropping_subscription_unsubscribes() {
		let signal = Signal::new(0);
		let seen = Rc::new(Cell::new(0));

		let seen_clone = seen.clone();
		let sub = signal.subscribe(move |n| seen_clone.set(*n));
		assert_eq!(signal.subscriber_count(), 1);

		drop(sub);
		signal.set(7);

		assert_eq!(signal.subscriber_count(), 0);
		assert_eq!(seen.get(), 0);
	}

	#[rstest]
	fn test_subscriber_may_read_signal_during_notification() {
		let signal = Signal::new(1);
		let mirrored = Rc::new(Cell::new(0));

		let reader = signal.clone();
		let mirrored_clone = mirrored.clone();
		let _sub = signal.subscribe(move |_| mirrored_clone.set(reader.get() * 10));
		signal.set(5);

		assert_eq!(mirrored.get(), 50);
	}

	#[rstest]
	fn test_subscriber_may_write_observed_signal() {
		let signal = Signal::new(0);
		let seen = Rc::new(RefCell::new(Vec::new()));

		// Clamps anything above 10 back down to 10
		let writer = signal.clone();
		let _clamp = signal.subscribe(move |n| {
			if *n > 10 {
				writer.set(10);
			}
		});
		let seen_clone = seen.clone();
		let _log = signal.subscribe(move |n| seen_clone.borrow_mut().push(*n));

		signal.set(25);

		assert_eq!(signal.get(), 10);
		// The nested set delivers 10 first; the outer pass then re-reads 10
		assert_eq!(*seen.borrow(), vec![0, 10, 10]);
	}

	#[rstest]
	fn test_subscriber_may_update_other_signal() {
		let source = Signal::new(vec![1]);
		let total = Signal::new(0);

		let total_clone = total.clone();
		let _sub = source.subscribe(move |v: &Vec<i32>| {
			let sum: i32 = v.iter().sum();
			total_clone.update(|t| *t = sum);
		});
		source.update(|v| v.push(4));

		assert_eq!(total.get(), 5);
	}

	#[rstest]
	fn test_update_inside_with_leaves_snapshot_intact() {
		let signal = Signal::new(vec![1, 2]);

		let len_seen = signal.with(|v| {
			signal.update(|v| v.push(3));
			v.len()
		});

		assert_eq!(len_seen, 2);
		assert_eq!(signal.get(), vec![1, 2, 3]);
	}

	#[rstest]
	fn test_subscription_outliving_signal_is_harmless() {
		let signal = Signal::new(0);
		let sub = signal.subscribe(|_| {});
		drop(signal);
		sub.unsubscribe();
	}
}
