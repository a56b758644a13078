//! Port definitions: traits the embedding application may implement.
//!
//! The engines never read the system clock directly; they ask a [`Clock`].

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
