//! Application state - the session plus the collaborators around it.

use std::sync::Arc;

use planner_core::Session;
use planner_core::assist::AssistService;
use planner_core::ports::{KeyValueStore, StoreError};
use planner_infra::{FileStore, InMemoryStore, StoredPostRepository};

use crate::config::AppConfig;

/// Everything the shell and one-shot commands operate on.
pub struct AppState {
    pub session: Session<StoredPostRepository>,
    pub assistant: Option<AssistService>,
}

impl AppState {
    /// Build the application state with the configured implementations.
    pub fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn KeyValueStore> = if config.ephemeral {
            tracing::info!("Ephemeral mode - posts are kept in memory only");
            Arc::new(InMemoryStore::new())
        } else {
            let files = FileStore::open(&config.data_dir)?;
            tracing::info!(data_dir = %files.root().display(), "Posts are stored on disk");
            Arc::new(files)
        };

        let repository = StoredPostRepository::load(store.clone());
        let session = Session::new(repository, store);
        let assistant = build_assistant(config);

        tracing::info!(
            posts = session.posts().len(),
            assistant = assistant.is_some(),
            "Application state initialized"
        );

        Ok(Self { session, assistant })
    }
}

#[cfg(feature = "gemini")]
fn build_assistant(config: &AppConfig) -> Option<AssistService> {
    use planner_infra::GeminiAssistant;

    let Some(gemini) = config.gemini.clone() else {
        tracing::warn!("GEMINI_API_KEY not set. AI features are disabled.");
        return None;
    };

    match GeminiAssistant::new(gemini) {
        Ok(assistant) => Some(AssistService::new(Arc::new(assistant))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build Gemini client. AI features are disabled.");
            None
        }
    }
}

#[cfg(not(feature = "gemini"))]
fn build_assistant(_config: &AppConfig) -> Option<AssistService> {
    tracing::info!("Built without gemini feature - AI features are disabled");
    None
}
