//! # Planner Infrastructure
//!
//! Concrete implementations of the ports defined in `planner-core`.
//! This crate contains local storage, the post repository over it, the
//! notice dismiss timer and the Gemini assistant client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No network client, local storage only
//! - `gemini` - Gemini assistant via reqwest

pub mod notify;
pub mod repository;
pub mod store;

#[cfg(feature = "gemini")]
pub mod assistant;

// Re-exports
pub use notify::DismissTimer;
pub use repository::{POSTS_KEY, StoredPostRepository};
pub use store::{FileStore, InMemoryStore};

#[cfg(feature = "gemini")]
pub use assistant::{GeminiAssistant, GeminiConfig};
