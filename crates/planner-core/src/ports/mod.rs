//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod assistant;
mod repository;
mod store;

pub use assistant::{AssistError, ContentAssistant};
pub use repository::PostRepository;
pub use store::{KeyValueStore, KeyValueStoreExt, StoreError};
