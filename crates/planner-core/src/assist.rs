//! Assistant service - input validation and error scoping in front of the
//! [`ContentAssistant`] port.
//!
//! Empty input is rejected before any remote call. Remote failures are
//! reported against the action that triggered them and never touch the
//! repository; the user retries by issuing the action again.

use std::fmt;
use std::sync::Arc;

use crate::domain::{PostBody, PostScore};
use crate::ports::{AssistError, ContentAssistant};

/// What the user asked the assistant to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistAction {
    Readiness,
    Hashtags,
    Brainstorm,
    Rephrase,
    Format,
    Analyze,
    Score,
}

impl AssistAction {
    fn failure_prefix(&self) -> &'static str {
        match self {
            AssistAction::Readiness => "AI analysis failed",
            AssistAction::Hashtags => "AI hashtag suggestion failed",
            AssistAction::Brainstorm => "AI brainstorming failed",
            AssistAction::Rephrase => "AI rephrase failed",
            AssistAction::Format => "AI formatting failed",
            AssistAction::Analyze => "AI post analysis failed",
            AssistAction::Score => "AI scoring failed",
        }
    }
}

/// An assistant error tied to the action that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistFailure {
    pub action: AssistAction,
    pub source: AssistError,
}

impl fmt::Display for AssistFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            AssistError::EmptyContent(msg) => f.write_str(msg),
            other => write!(f, "{}: {}", self.action.failure_prefix(), other),
        }
    }
}

impl std::error::Error for AssistFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Validating front for the assistant.
#[derive(Clone)]
pub struct AssistService {
    inner: Arc<dyn ContentAssistant>,
}

impl AssistService {
    pub fn new(inner: Arc<dyn ContentAssistant>) -> Self {
        Self { inner }
    }

    pub async fn check_readiness(&self, body: &PostBody) -> Result<String, AssistFailure> {
        let action = AssistAction::Readiness;
        require_content(body, action, "Cannot check readiness of an empty post.")?;
        self.inner
            .check_readiness(&body.content().texts(), body.tones().as_slice())
            .await
            .map_err(|e| fail(action, e))
    }

    pub async fn suggest_hashtags(&self, body: &PostBody) -> Result<String, AssistFailure> {
        let action = AssistAction::Hashtags;
        require_content(body, action, "Cannot suggest hashtags for an empty post.")?;
        self.inner
            .suggest_hashtags(&body.content().texts())
            .await
            .map_err(|e| fail(action, e))
    }

    pub async fn score(&self, body: &PostBody) -> Result<PostScore, AssistFailure> {
        let action = AssistAction::Score;
        require_content(body, action, "Cannot score an empty post.")?;
        self.inner
            .score_post(&body.content().texts(), body.tones().as_slice())
            .await
            .map_err(|e| fail(action, e))
    }

    /// Rewording of unit `index`. The caller applies it to the draft.
    pub async fn rephrase(&self, body: &PostBody, index: usize) -> Result<String, AssistFailure> {
        let action = AssistAction::Rephrase;
        let text = unit_text(body, index, action, "Cannot rephrase an empty post.")?;
        self.inner
            .rephrase(text, body.tones().as_slice())
            .await
            .map_err(|e| fail(action, e))
    }

    /// Formatted version of unit `index`. The caller applies it to the draft.
    pub async fn format(&self, body: &PostBody, index: usize) -> Result<String, AssistFailure> {
        let action = AssistAction::Format;
        let text = unit_text(body, index, action, "Cannot format an empty post.")?;
        self.inner
            .format(text, body.tones().as_slice())
            .await
            .map_err(|e| fail(action, e))
    }

    /// A blank topic means "whatever is trending".
    pub async fn brainstorm(&self, topic: Option<&str>) -> Result<Vec<String>, AssistFailure> {
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());
        self.inner
            .brainstorm_ideas(topic)
            .await
            .map_err(|e| fail(AssistAction::Brainstorm, e))
    }

    pub async fn analyze(&self, text: &str) -> Result<String, AssistFailure> {
        let action = AssistAction::Analyze;
        if text.trim().is_empty() {
            return Err(fail(action, AssistError::EmptyContent("Post text cannot be empty.")));
        }
        self.inner
            .analyze_post(text)
            .await
            .map_err(|e| fail(action, e))
    }
}

fn fail(action: AssistAction, source: AssistError) -> AssistFailure {
    if !matches!(source, AssistError::EmptyContent(_)) {
        tracing::warn!(?action, error = %source, "Assistant call failed");
    }
    AssistFailure { action, source }
}

fn require_content(
    body: &PostBody,
    action: AssistAction,
    message: &'static str,
) -> Result<(), AssistFailure> {
    if body.content().is_blank() {
        return Err(fail(action, AssistError::EmptyContent(message)));
    }
    Ok(())
}

fn unit_text<'a>(
    body: &'a PostBody,
    index: usize,
    action: AssistAction,
    message: &'static str,
) -> Result<&'a str, AssistFailure> {
    match body.content().get(index) {
        Ok(unit) if !unit.is_blank() => Ok(&unit.text),
        _ => Err(fail(action, AssistError::EmptyContent(message))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::ScoreMetric;

    /// Counts calls; fails every call when `fail_with` is set.
    #[derive(Default)]
    struct FakeAssistant {
        calls: AtomicUsize,
        fail_with: Option<AssistError>,
    }

    impl FakeAssistant {
        fn outcome<T>(&self, value: T) -> Result<T, AssistError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(value),
            }
        }
    }

    #[async_trait]
    impl ContentAssistant for FakeAssistant {
        async fn check_readiness(
            &self,
            content: &[String],
            _tones: &[String],
        ) -> Result<String, AssistError> {
            self.outcome(format!("{} posts look good", content.len()))
        }

        async fn suggest_hashtags(&self, _content: &[String]) -> Result<String, AssistError> {
            self.outcome("**Popular**\n#rust".to_string())
        }

        async fn brainstorm_ideas(&self, topic: Option<&str>) -> Result<Vec<String>, AssistError> {
            self.outcome(vec![topic.unwrap_or("trending").to_string()])
        }

        async fn rephrase(&self, text: &str, _tones: &[String]) -> Result<String, AssistError> {
            self.outcome(text.to_uppercase())
        }

        async fn format(&self, text: &str, _tones: &[String]) -> Result<String, AssistError> {
            self.outcome(format!("✨ {text}"))
        }

        async fn analyze_post(&self, text: &str) -> Result<String, AssistError> {
            self.outcome(format!("### Overall Assessment\n{text}"))
        }

        async fn score_post(
            &self,
            _content: &[String],
            _tones: &[String],
        ) -> Result<PostScore, AssistError> {
            let metric = || ScoreMetric {
                score: 8,
                rationale: "fine".into(),
            };
            self.outcome(PostScore {
                engagement: metric(),
                clarity: metric(),
                tone_alignment: metric(),
                overall: metric(),
            })
        }
    }

    fn service(fake: FakeAssistant) -> (AssistService, Arc<FakeAssistant>) {
        let fake = Arc::new(fake);
        (AssistService::new(fake.clone()), fake)
    }

    #[tokio::test]
    async fn test_empty_post_rejected_without_remote_call() {
        let (service, fake) = service(FakeAssistant::default());
        let body = PostBody::seeded("   ", Utc::now());

        let err = service.score(&body).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot score an empty post.");

        let err = service.check_readiness(&body).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot check readiness of an empty post.");

        let err = service.rephrase(&body, 0).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot rephrase an empty post.");

        let err = service.analyze("").await.unwrap_err();
        assert_eq!(err.to_string(), "Post text cannot be empty.");

        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_scoped_to_action() {
        let (service, fake) = service(FakeAssistant {
            fail_with: Some(AssistError::Remote("503 Service Unavailable".into())),
            ..Default::default()
        });
        let body = PostBody::seeded("hello", Utc::now());

        let err = service.score(&body).await.unwrap_err();
        assert_eq!(err.action, AssistAction::Score);
        assert_eq!(
            err.to_string(),
            "AI scoring failed: request failed: 503 Service Unavailable"
        );
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rephrase_targets_one_unit() {
        let (service, _) = service(FakeAssistant::default());
        let mut body = PostBody::seeded("first", Utc::now());
        let idx = body.push_unit();
        body.set_text(idx, "second").unwrap();

        assert_eq!(service.rephrase(&body, 1).await.unwrap(), "SECOND");
        assert!(service.format(&body, 5).await.is_err());
    }

    #[tokio::test]
    async fn test_blank_topic_means_trending() {
        let (service, _) = service(FakeAssistant::default());
        assert_eq!(service.brainstorm(Some("  ")).await.unwrap(), vec!["trending"]);
        assert_eq!(service.brainstorm(Some("rust")).await.unwrap(), vec!["rust"]);
    }
}
