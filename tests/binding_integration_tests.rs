//! Form Binding Integration Tests
//!
//! Drives bound forms through the in-memory DOM backend the way a user would
//! (typing, toggling, leaving fields, submitting) and checks the resulting
//! data, touched and validity state.
//!
//! Test Categories:
//! - Category 1: Bind snapshot
//! - Category 2: User interaction
//! - Category 3: Submission
//! - Category 4: Constraint API
//! - Category 5: Lifecycle and programmatic updates

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use reinhardt_form_binder::dom::{FormControl, FormEventKind, MemoryControl, MemoryForm};
use reinhardt_form_binder::{
	FormConfig, FormError, FormValue, OverlapPolicy, Record, SubmitOutcome, create_form,
};
use rstest::{fixture, rstest};
use std::cell::RefCell;
use std::rc::Rc;

struct AccountForm {
	element: MemoryForm,
	email: MemoryControl,
	password: MemoryControl,
}

#[fixture]
fn account_form() -> AccountForm {
	let email = MemoryControl::input("email", "account.email", "");
	let password = MemoryControl::input("password", "account.password", "");
	let element = MemoryForm::new()
		.with_control(email.clone())
		.with_control(password.clone())
		.with_control(MemoryControl::other("save", ""));
	AccountForm {
		element,
		email,
		password,
	}
}

fn not_email(data: &Record) -> Record {
	let mut errors = Record::new();
	let email = data.get_path("account.email").and_then(FormValue::as_str);
	if !email.is_some_and(|e| e.contains('@')) {
		errors.set_path("account.email", FormValue::from("Not email"));
	}
	errors
}

type Calls = Rc<RefCell<Vec<Record>>>;

fn recording_config(calls: &Calls) -> FormConfig {
	let calls = Rc::clone(calls);
	FormConfig::new(move |data: Record| {
		calls.borrow_mut().push(data);
		async { Ok(()) }
	})
}

// ============================================================================
// Category 1: Bind snapshot
// ============================================================================

/// Tests that blank account fields produce a nested record and untouched flags
#[rstest]
fn test_bind_builds_nested_snapshot(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(account_form.element).unwrap();

	let data = serde_json::to_value(form.data().get()).unwrap();
	assert_eq!(
		data,
		serde_json::json!({ "account": { "email": "", "password": "" } })
	);
	let touched = form.touched().get();
	assert_eq!(touched.len(), 2);
	assert_eq!(touched.get("account.email"), Some(false));
	assert_eq!(touched.get("account.password"), Some(false));
}

/// Tests that a pre-checked member of a checkbox group seeds the list
#[rstest]
fn test_bind_checkbox_group_snapshot() {
	let element = MemoryForm::new()
		.with_control(MemoryControl::checkbox("preferences", "technology", true))
		.with_control(MemoryControl::checkbox("preferences", "films", false));
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(element).unwrap();

	assert_eq!(
		form.data().with(|d| d.get_path("preferences").cloned()),
		Some(FormValue::List(vec!["technology".to_string()]))
	);
}

// ============================================================================
// Category 2: User interaction
// ============================================================================

/// Tests that typing updates data and touched before any submit
#[rstest]
fn test_typing_updates_data_and_touched(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(account_form.element.clone()).unwrap();

	account_form
		.element
		.type_into(&account_form.email, "a@b.com");

	assert_eq!(
		form.data().with(|d| d.get_path("account.email").cloned()),
		Some(FormValue::from("a@b.com"))
	);
	assert!(form.touched().with(|t| t.is_touched("account.email")));
	assert!(!form.touched().with(|t| t.is_touched("account.password")));
}

/// Tests that checking a second group member appends in document order
#[rstest]
fn test_checking_group_member_keeps_document_order() {
	let technology = MemoryControl::checkbox("preferences", "technology", true);
	let films = MemoryControl::checkbox("preferences", "films", false);
	let element = MemoryForm::new()
		.with_control(technology.clone())
		.with_control(films.clone());
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(element.clone()).unwrap();

	element.toggle(&films);

	assert_eq!(
		form.data().with(|d| d.get_path("preferences").cloned()),
		Some(FormValue::List(vec![
			"technology".to_string(),
			"films".to_string()
		]))
	);
	assert!(form.touched().with(|t| t.is_touched("preferences")));
}

/// Tests lone checkbox, radio group and numeric field interaction
#[rstest]
#[case::lone_checkbox("newsletter", FormValue::Bool(true))]
#[case::radio_group("plan", FormValue::from("pro"))]
fn test_toggle_controls(#[case] name: &str, #[case] expected: FormValue) {
	let newsletter = MemoryControl::checkbox("newsletter", "on", false);
	let free = MemoryControl::radio("plan", "free", true);
	let pro = MemoryControl::radio("plan", "pro", false);
	let element = MemoryForm::new()
		.with_control(newsletter.clone())
		.with_control(free)
		.with_control(pro.clone());
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(element.clone()).unwrap();

	element.toggle(&newsletter);
	element.toggle(&pro);

	assert_eq!(form.data().with(|d| d.get_path(name).cloned()), Some(expected));
}

/// Tests that unparsable numeric input yields NaN instead of an error
#[rstest]
fn test_number_input_propagates_nan() {
	let age = MemoryControl::input("number", "age", "41");
	let element = MemoryForm::new().with_control(age.clone());
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(element.clone()).unwrap();
	assert_eq!(
		form.data().with(|d| d.get_path("age").and_then(FormValue::as_f64)),
		Some(41.0)
	);

	element.type_into(&age, "forty");

	assert!(
		form.data()
			.with(|d| d.get_path("age").and_then(FormValue::as_f64))
			.is_some_and(f64::is_nan)
	);
}

/// Tests that leaving a field marks it touched without changing data
#[rstest]
fn test_blur_only_touches(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(account_form.element.clone()).unwrap();
	let before = form.data().get();

	account_form.element.blur(&account_form.password);

	assert!(form.touched().with(|t| t.is_touched("account.password")));
	assert_eq!(form.data().get(), before);
}

// ============================================================================
// Category 3: Submission
// ============================================================================

/// Tests that a failing validator blocks the handler and touches every field
#[rstest]
fn test_invalid_submit_never_calls_handler(account_form: AccountForm) {
	let calls = Calls::default();
	let form = create_form(recording_config(&calls).validate(not_email));
	let _binding = form.bind(account_form.element.clone()).unwrap();

	let proceeded = account_form.element.submit();

	assert!(!proceeded, "native submission must be suppressed");
	assert!(calls.borrow().is_empty());
	assert_eq!(
		form.errors().with(|e| e.get_path("account.email").cloned()),
		Some(FormValue::from("Not email"))
	);
	assert!(form.touched().with(|t| t.all_touched()));
	assert!(!form.is_submitting().get());
}

/// Tests that a valid form submits exactly once with the current data
#[rstest]
fn test_valid_submit_calls_handler_once(account_form: AccountForm) {
	let calls = Calls::default();
	let form = create_form(recording_config(&calls).validate(not_email));
	let _binding = form.bind(account_form.element.clone()).unwrap();

	account_form
		.element
		.type_into(&account_form.email, "a@b.com");
	account_form.element.submit();

	let calls = calls.borrow();
	assert_eq!(calls.len(), 1);
	assert_eq!(
		calls[0].get_path("account.email"),
		Some(&FormValue::from("a@b.com"))
	);
	assert!(!form.is_submitting().get());
}

/// Tests that `is_submitting` is raised for exactly the handler's lifetime
#[rstest]
fn test_is_submitting_tracks_pending_handler(account_form: AccountForm) {
	let (tx, rx) = futures::channel::oneshot::channel::<()>();
	let rx = Rc::new(RefCell::new(Some(rx)));
	let mut pool = LocalPool::new();
	let spawner = pool.spawner();

	let form = create_form(
		FormConfig::new(move |_| {
			let rx = rx.borrow_mut().take();
			async move {
				match rx {
					Some(rx) => rx.await.map_err(anyhow::Error::from),
					None => Ok(()),
				}
			}
		})
		.spawner(move |task| {
			spawner.spawn_local(task).unwrap();
		}),
	);
	let _binding = form.bind(account_form.element.clone()).unwrap();

	account_form.element.submit();
	pool.run_until_stalled();
	assert!(form.is_submitting().get());

	tx.send(()).unwrap();
	pool.run_until_stalled();
	assert!(!form.is_submitting().get());
}

/// Tests that a second submit while one is pending is rejected by default
#[rstest]
fn test_overlapping_dom_submit_is_rejected(account_form: AccountForm) {
	let gates = Rc::new(RefCell::new(Vec::new()));
	let mut pool = LocalPool::new();
	let spawner = pool.spawner();

	let form = create_form(
		FormConfig::new({
			let gates = Rc::clone(&gates);
			move |_| {
				let (tx, rx) = futures::channel::oneshot::channel::<()>();
				gates.borrow_mut().push(tx);
				async move { rx.await.map_err(anyhow::Error::from) }
			}
		})
		.spawner(move |task| {
			spawner.spawn_local(task).unwrap();
		}),
	);
	assert_eq!(form.options().overlapping_submit, OverlapPolicy::Reject);
	let _binding = form.bind(account_form.element.clone()).unwrap();

	account_form.element.submit();
	account_form.element.submit();
	pool.run_until_stalled();

	assert_eq!(gates.borrow().len(), 1);
}

/// Tests that handler failures reach the error handler
#[rstest]
fn test_handler_error_is_delegated(account_form: AccountForm) {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let form = create_form(
		FormConfig::new(|_| async { Err(anyhow::anyhow!("503 Service Unavailable")) }).on_error({
			let seen = Rc::clone(&seen);
			move |error| seen.borrow_mut().push(error.to_string())
		}),
	);
	let _binding = form.bind(account_form.element.clone()).unwrap();

	account_form.element.submit();

	assert_eq!(*seen.borrow(), vec!["503 Service Unavailable".to_string()]);
	assert!(!form.is_submitting().get());
}

/// Tests that `handle_submit` surfaces handler failures without an error handler
#[rstest]
fn test_handle_submit_returns_handler_error(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Err(anyhow::anyhow!("timeout")) }));
	let _binding = form.bind(account_form.element).unwrap();

	let result = futures::executor::block_on(form.handle_submit());

	assert!(matches!(result, Err(FormError::Submit(_))));
	assert!(!form.is_submitting().get());
}

/// Tests that async validators are awaited before submitting
#[rstest]
fn test_async_validator_blocks_submit(account_form: AccountForm) {
	let calls = Calls::default();
	let form = create_form(
		recording_config(&calls).validate_async(|data: Record| async move { not_email(&data) }),
	);
	let _binding = form.bind(account_form.element.clone()).unwrap();

	let outcome = futures::executor::block_on(form.handle_submit()).unwrap();
	assert_eq!(outcome, SubmitOutcome::Invalid);

	account_form
		.element
		.type_into(&account_form.email, "a@b.com");
	let outcome = futures::executor::block_on(form.handle_submit()).unwrap();

	assert_eq!(outcome, SubmitOutcome::Submitted);
	assert_eq!(calls.borrow().len(), 1);
}

// ============================================================================
// Category 4: Constraint API
// ============================================================================

/// Tests that messages are pushed into controls and reported on submit
#[rstest]
fn test_constraint_api_reports_validity(account_form: AccountForm) {
	let form = create_form(
		FormConfig::new(|_| async { Ok(()) })
			.validate(not_email)
			.use_constraint_api(true),
	);
	let _binding = form.bind(account_form.element.clone()).unwrap();

	assert_eq!(account_form.email.validity_message(), "Not email");
	assert_eq!(account_form.password.validity_message(), "");

	account_form.element.submit();
	assert_eq!(account_form.element.report_validity_calls(), 1);

	account_form
		.element
		.type_into(&account_form.email, "a@b.com");
	assert_eq!(account_form.email.validity_message(), "");
}

// ============================================================================
// Category 5: Lifecycle and programmatic updates
// ============================================================================

/// Tests that destroy removes all four listeners
#[rstest]
fn test_destroy_removes_all_listeners(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Ok(()) }).use_constraint_api(true));
	let binding = form.bind(account_form.element.clone()).unwrap();
	assert_eq!(account_form.element.listener_count(), 4);
	assert_eq!(binding.listener_count(), 4);

	binding.destroy().unwrap();

	for kind in FormEventKind::ALL {
		assert_eq!(account_form.element.listener_count_for(kind), 0);
	}
	account_form
		.element
		.type_into(&account_form.email, "ignored");
	assert_eq!(
		form.data().with(|d| d.get_path("account.email").cloned()),
		Some(FormValue::from(""))
	);
}

/// Tests that programmatic `set` reconciles touched and reaches controls
#[rstest]
fn test_programmatic_set(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(account_form.element.clone()).unwrap();

	let mut next = form.data().get();
	next.set_path("account.password", FormValue::from("hunter2"));
	form.data().set(next);

	assert_eq!(account_form.password.value(), "hunter2");
	assert!(form.touched().with(|t| t.is_touched("account.password")));
	assert!(!form.touched().with(|t| t.is_touched("account.email")));
}

/// Tests that reset restores bind-time values into data and controls
#[rstest]
fn test_reset_restores_bind_time_state(account_form: AccountForm) {
	let form = create_form(FormConfig::new(|_| async { Ok(()) }));
	let _binding = form.bind(account_form.element.clone()).unwrap();
	account_form
		.element
		.type_into(&account_form.email, "a@b.com");

	form.reset();

	assert_eq!(account_form.email.value(), "");
	assert_eq!(
		form.data().with(|d| d.get_path("account.email").cloned()),
		Some(FormValue::from(""))
	);
	assert!(!form.touched().with(|t| t.is_touched("account.email")));
}
