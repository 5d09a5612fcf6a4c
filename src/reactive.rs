//! Reactive containers for form state
//!
//! Every bound form owns five containers (data, errors, touched, validity and
//! the in-flight submission flag). They are plain single-threaded value
//! holders with subscribe/set/update semantics; there is no global runtime,
//! so containers of two forms never observe each other.

pub mod signal;

pub use signal::{NodeId, Signal, Subscription};
