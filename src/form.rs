//! Form binding engine
//!
//! Keeps a nested data record, a touched map and the validity state of one
//! `<form>` in sync with what the user does, and runs validation before the
//! submit handler.
//!
//! ## Architecture
//!
//! ```text
//!                 bind()                       DOM events
//! ┌──────────┐   ┌──────────────┐   input/change/focusout   ┌────────────────┐
//! │ Form     │──▶│ ControlIndex │◀──────────────────────────│ MutationRouter │
//! │  data    │   │ Snapshot     │                           └───────┬────────┘
//! │  errors  │   └──────────────┘                                   │
//! │  touched │◀────────────────────────────────────────────────────┘
//! │  ...     │            submit            ┌────────────┐
//! │          │─────────────────────────────▶│ run_submit │──▶ on_submit
//! └──────────┘                              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`field`]: control classification and value codec
//! - [`index`]: name → controls index built at bind
//! - [`snapshot`]: initial data record and touched map
//! - [`router`]: DOM event → data/touched updates
//! - [`submit`]: validate-then-submit pipeline
//! - [`binding`]: attach/detach lifecycle
//! - [`config`], [`state`], [`store`], [`touched`]: configuration and state

pub mod binding;
pub mod config;
pub mod field;
pub mod index;
pub mod router;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod submit;
pub mod touched;

pub use binding::Binding;
pub use config::{FormConfig, FormOptions, OverlapPolicy, Spawner, SubmitFuture, ValidateFuture};
pub use field::ControlKind;
pub use index::ControlIndex;
pub use router::MutationRouter;
pub use snapshot::{Snapshot, build_snapshot};
pub use state::{Form, create_form};
pub use store::DataStore;
pub use submit::SubmitOutcome;
pub use touched::TouchedMap;
