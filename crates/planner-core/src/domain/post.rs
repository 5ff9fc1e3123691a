use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tones::Tones;
use crate::error::DomainError;

/// Maximum characters in a single content unit of a thread.
pub const X_CHAR_LIMIT: usize = 280;

/// Permanent identity of a saved post.
///
/// Issued by the repository on first save, derived from the wall clock in
/// milliseconds. Drafts never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The millisecond value this id was derived from, if it is numeric.
    pub fn millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Readiness of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Idea,
    Perfect,
    #[serde(rename = "Ready to Post")]
    ReadyToPost,
}

impl Status {
    /// All statuses in display order.
    pub const ALL: [Status; 3] = [Status::Idea, Status::Perfect, Status::ReadyToPost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idea => "Idea",
            Status::Perfect => "Perfect",
            Status::ReadyToPost => "Ready to Post",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Status::Idea => "Rough thoughts and creative sparks.",
            Status::Perfect => "Refined content, needs final review.",
            Status::ReadyToPost => "Finalized and ready to be published.",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DomainError;

    /// Accepts the display name in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = status_key(s);
        if wanted == "ready" {
            return Ok(Status::ReadyToPost);
        }

        Status::ALL
            .into_iter()
            .find(|status| status_key(status.as_str()) == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown status '{}'", s.trim())))
    }
}

fn status_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// One post of a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUnit {
    pub text: String,
    /// Opaque image reference (data URL or path).
    #[serde(default)]
    pub image: Option<String>,
}

impl ContentUnit {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn over_limit(&self) -> bool {
        self.char_count() > X_CHAR_LIMIT
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered, never-empty sequence of content units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ContentUnit>", into = "Vec<ContentUnit>")]
pub struct Thread(Vec<ContentUnit>);

impl Thread {
    pub fn new(first: ContentUnit) -> Self {
        Self(vec![first])
    }

    pub fn units(&self) -> &[ContentUnit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &ContentUnit {
        &self.0[0]
    }

    pub fn get(&self, index: usize) -> Result<&ContentUnit, DomainError> {
        self.0.get(index).ok_or_else(|| out_of_range(index, self.0.len()))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut ContentUnit, DomainError> {
        let len = self.0.len();
        self.0.get_mut(index).ok_or_else(|| out_of_range(index, len))
    }

    /// Appends a unit and returns its index.
    pub fn push(&mut self, unit: ContentUnit) -> usize {
        self.0.push(unit);
        self.0.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<ContentUnit, DomainError> {
        if index >= self.0.len() {
            return Err(out_of_range(index, self.0.len()));
        }
        if self.0.len() == 1 {
            return Err(DomainError::validation(
                "a thread must keep at least one post",
            ));
        }
        Ok(self.0.remove(index))
    }

    /// True when every unit is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(ContentUnit::is_blank)
    }

    pub fn texts(&self) -> Vec<String> {
        self.0.iter().map(|u| u.text.clone()).collect()
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new(ContentUnit::default())
    }
}

impl TryFrom<Vec<ContentUnit>> for Thread {
    type Error = DomainError;

    fn try_from(units: Vec<ContentUnit>) -> Result<Self, Self::Error> {
        if units.is_empty() {
            return Err(DomainError::validation("post content cannot be empty"));
        }
        Ok(Self(units))
    }
}

impl From<Thread> for Vec<ContentUnit> {
    fn from(thread: Thread) -> Self {
        thread.0
    }
}

fn out_of_range(index: usize, len: usize) -> DomainError {
    DomainError::validation(format!(
        "post #{} does not exist (thread has {})",
        index + 1,
        len
    ))
}

/// Every field of a post except its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    content: Thread,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    tones: Tones,
    created_at: DateTime<Utc>,
    #[serde(default)]
    scheduled_at: Option<DateTime<Utc>>,
}

impl PostBody {
    /// A fresh body: one empty unit, status Idea, no tones, no schedule.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self::seeded("", created_at)
    }

    /// A fresh body whose first unit holds `text`.
    pub fn seeded(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            content: Thread::new(ContentUnit::new(text)),
            status: Status::Idea,
            tones: Tones::default(),
            created_at,
            scheduled_at: None,
        }
    }

    pub fn content(&self) -> &Thread {
        &self.content
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tones(&self) -> &Tones {
        &self.tones
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.scheduled_at
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), DomainError> {
        self.content.get_mut(index)?.text = text.into();
        Ok(())
    }

    pub fn attach_image(
        &mut self,
        index: usize,
        reference: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.content.get_mut(index)?.image = Some(reference.into());
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Result<(), DomainError> {
        self.content.get_mut(index)?.image = None;
        Ok(())
    }

    /// Appends an empty unit to the thread and returns its index.
    pub fn push_unit(&mut self) -> usize {
        self.content.push(ContentUnit::default())
    }

    pub fn remove_unit(&mut self, index: usize) -> Result<ContentUnit, DomainError> {
        self.content.remove(index)
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn tones_mut(&mut self) -> &mut Tones {
        &mut self.tones
    }

    pub fn schedule(&mut self, at: DateTime<Utc>) {
        self.scheduled_at = Some(at);
    }

    pub fn clear_schedule(&mut self) {
        self.scheduled_at = None;
    }

    /// Appends the first `#word` found in `tag` to unit `index`.
    ///
    /// Returns `Ok(None)` when the unit already contains the hashtag, and the
    /// inserted hashtag otherwise.
    pub fn insert_hashtag(&mut self, index: usize, tag: &str) -> Result<Option<String>, DomainError> {
        let hashtag = first_hashtag(tag)
            .or_else(|| first_hashtag(&format!("#{}", tag.trim())))
            .ok_or_else(|| DomainError::validation("hashtag cannot be empty"))?;

        let unit = self.content.get_mut(index)?;
        if unit.text.contains(&hashtag) {
            return Ok(None);
        }

        let current = unit.text.trim();
        let updated = if current.is_empty() {
            hashtag.clone()
        } else {
            format!("{current} {hashtag}")
        };

        if updated.chars().count() > X_CHAR_LIMIT {
            return Err(DomainError::validation(format!(
                "Adding \"{hashtag}\" exceeds the character limit for this post."
            )));
        }

        unit.text = updated;
        Ok(Some(hashtag))
    }

    /// The whole thread as one block of text, units separated by a blank line.
    pub fn thread_text(&self) -> String {
        self.content.texts().join("\n\n")
    }
}

/// Extracts the first `#word` (word = alphanumerics or underscore).
fn first_hashtag(input: &str) -> Option<String> {
    let start = input.find('#')?;
    let rest = &input[start + 1..];
    let end = rest
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    if end == 0 {
        // A lone '#': keep looking further along.
        return first_hashtag(rest);
    }
    Some(format!("#{}", &rest[..end]))
}

/// Post entity - a saved record owned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    #[serde(flatten)]
    body: PostBody,
}

impl Post {
    pub fn new(id: PostId, body: PostBody) -> Self {
        Self { id, body }
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn body(&self) -> &PostBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PostBody {
        &mut self.body
    }

    pub fn status(&self) -> Status {
        self.body.status
    }

    pub fn into_parts(self) -> (PostId, PostBody) {
        (self.id, self.body)
    }
}

/// A post being edited in the session.
///
/// `New` has never been saved and has no identity; `Existing` is a by-value
/// copy of a saved record, so edits never reach the repository before save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    New(PostBody),
    Existing(Post),
}

impl Draft {
    pub fn id(&self) -> Option<&PostId> {
        match self {
            Draft::New(_) => None,
            Draft::Existing(post) => Some(post.id()),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Draft::New(_))
    }

    pub fn body(&self) -> &PostBody {
        match self {
            Draft::New(body) => body,
            Draft::Existing(post) => post.body(),
        }
    }

    pub fn body_mut(&mut self) -> &mut PostBody {
        match self {
            Draft::New(body) => body,
            Draft::Existing(post) => post.body_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> PostBody {
        PostBody::new(Utc::now())
    }

    #[test]
    fn test_new_body_defaults() {
        let body = body();
        assert_eq!(body.content().len(), 1);
        assert_eq!(body.content().first().text, "");
        assert_eq!(body.status(), Status::Idea);
        assert!(body.tones().is_empty());
        assert!(body.scheduled_at().is_none());
    }

    #[test]
    fn test_thread_never_drops_below_one_unit() {
        let mut body = body();
        assert!(body.remove_unit(0).is_err());

        let second = body.push_unit();
        assert_eq!(second, 1);
        body.remove_unit(0).unwrap();
        assert_eq!(body.content().len(), 1);
        assert!(body.remove_unit(0).is_err());
    }

    #[test]
    fn test_empty_thread_rejected_on_deserialize() {
        let json = r#"{"content":[],"status":"Idea","tones":[],"createdAt":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<PostBody>(json).is_err());
    }

    #[test]
    fn test_status_serializes_with_display_names() {
        assert_eq!(
            serde_json::to_string(&Status::ReadyToPost).unwrap(),
            "\"Ready to Post\""
        );
        assert_eq!("ready to post".parse::<Status>().unwrap(), Status::ReadyToPost);
        assert_eq!("ready-to-post".parse::<Status>().unwrap(), Status::ReadyToPost);
        assert_eq!("PERFECT".parse::<Status>().unwrap(), Status::Perfect);
        assert_eq!(" Ready ".parse::<Status>().unwrap(), Status::ReadyToPost);
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert!("Published".parse::<Status>().is_err());
    }

    #[test]
    fn test_post_uses_camel_case_layout() {
        let mut body = body();
        body.schedule(Utc::now());
        let post = Post::new(PostId::from_millis(42), body);

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["id"], "42");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("scheduledAt").is_some());
        assert_eq!(value["content"][0]["image"], serde_json::Value::Null);
    }

    #[test]
    fn test_insert_hashtag_appends_once() {
        let mut body = PostBody::seeded("Shipping today ", Utc::now());

        let added = body.insert_hashtag(0, "**#RustLang** (popular)").unwrap();
        assert_eq!(added.as_deref(), Some("#RustLang"));
        assert_eq!(body.content().first().text, "Shipping today #RustLang");

        assert_eq!(body.insert_hashtag(0, "#RustLang").unwrap(), None);
        assert_eq!(body.content().first().text, "Shipping today #RustLang");
    }

    #[test]
    fn test_insert_hashtag_into_blank_unit() {
        let mut body = body();
        body.insert_hashtag(0, "#buildinpublic").unwrap();
        assert_eq!(body.content().first().text, "#buildinpublic");
    }

    #[test]
    fn test_insert_hashtag_without_marker() {
        let mut body = PostBody::seeded("Hello", Utc::now());
        assert_eq!(body.insert_hashtag(0, " rust ").unwrap().as_deref(), Some("#rust"));
        assert!(body.insert_hashtag(0, "  ").is_err());
    }

    #[test]
    fn test_insert_hashtag_respects_char_limit() {
        let mut body = PostBody::seeded("x".repeat(X_CHAR_LIMIT - 3), Utc::now());
        let err = body.insert_hashtag(0, "#long").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(body.content().first().char_count(), X_CHAR_LIMIT - 3);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut body = body();
        assert!(body.set_text(3, "nope").is_err());
        assert!(body.attach_image(1, "data:image/png;base64,").is_err());
    }

    #[test]
    fn test_thread_text_joins_with_blank_line() {
        let mut body = PostBody::seeded("one", Utc::now());
        let idx = body.push_unit();
        body.set_text(idx, "two").unwrap();
        assert_eq!(body.thread_text(), "one\n\ntwo");
    }

    #[test]
    fn test_draft_identity() {
        let draft = Draft::New(body());
        assert!(draft.is_new());
        assert!(draft.id().is_none());

        let post = Post::new(PostId::from("17"), body());
        let draft = Draft::Existing(post);
        assert_eq!(draft.id().map(PostId::as_str), Some("17"));
    }
}
