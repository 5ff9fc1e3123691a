use std::fmt;
use std::time::Duration;

use uuid::Uuid;

/// How long a notice stays up before it is dismissed.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Identity of one notice. A dismissal only applies to the notice it was
/// scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeId(Uuid);

impl NoticeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One-shot success message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: NoticeId::new(),
            message: message.into(),
        }
    }
}
