//! Domain entities - posts, drafts and the values around them.

mod filter;
mod notice;
mod post;
mod schedule;
mod score;
mod theme;
mod tones;

pub use filter::{StatusFilter, filtered_posts};
pub use notice::{NOTICE_TTL, Notice, NoticeId};
pub use post::{ContentUnit, Draft, Post, PostBody, PostId, Status, Thread, X_CHAR_LIMIT};
pub use schedule::{TimeLeft, time_left};
pub use score::{PostScore, ScoreMetric};
pub use theme::{THEME_KEY, Theme};
pub use tones::{PRESET_TONES, Tones};
