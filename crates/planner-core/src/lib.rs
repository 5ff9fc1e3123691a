//! # Planner Core
//!
//! The domain layer of the content planner.
//! This crate holds post records, drafts, the filter view and the editing
//! session. Storage and the AI collaborator are reached only through the
//! traits in [`ports`].

pub mod assist;
pub mod domain;
pub mod error;
pub mod ports;
pub mod session;

pub use error::{DomainError, RepoError};
pub use session::{Action, Outcome, Session, View};
