//! Assistant port - the generative AI collaborator.

use async_trait::async_trait;

use crate::domain::PostScore;

/// Remote text-generation service used by the editor, brainstorm and
/// analyzer views. Calls are not retried.
#[async_trait]
pub trait ContentAssistant: Send + Sync {
    /// Free-text feedback on whether a post or thread is ready to publish.
    async fn check_readiness(
        &self,
        content: &[String],
        tones: &[String],
    ) -> Result<String, AssistError>;

    /// Markdown list of popular and niche hashtags.
    async fn suggest_hashtags(&self, content: &[String]) -> Result<String, AssistError>;

    /// Three post ideas, optionally about `topic`.
    async fn brainstorm_ideas(&self, topic: Option<&str>) -> Result<Vec<String>, AssistError>;

    /// Reworded version of a single post.
    async fn rephrase(&self, text: &str, tones: &[String]) -> Result<String, AssistError>;

    /// Same wording with spacing, emojis and lists added.
    async fn format(&self, text: &str, tones: &[String]) -> Result<String, AssistError>;

    /// Markdown review of an already published post.
    async fn analyze_post(&self, text: &str) -> Result<String, AssistError>;

    /// Scores for engagement, clarity, tone alignment and overall.
    async fn score_post(
        &self,
        content: &[String],
        tones: &[String],
    ) -> Result<PostScore, AssistError>;
}

/// Assistant errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistError {
    /// Rejected before any remote call; the message is shown as-is.
    #[error("{0}")]
    EmptyContent(&'static str),

    #[error("request failed: {0}")]
    Remote(String),

    #[error("unexpected response format: {0}")]
    InvalidResponse(String),

    #[error("assistant is not configured (set GEMINI_API_KEY)")]
    NotConfigured,
}
