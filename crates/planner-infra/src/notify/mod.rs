//! Deferred notice dismissal.

mod timer;

pub use timer::DismissTimer;
