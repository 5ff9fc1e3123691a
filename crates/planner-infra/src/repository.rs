//! Post repository persisted through a key-value store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use planner_core::domain::{Post, PostBody, PostId};
use planner_core::error::RepoError;
use planner_core::ports::{KeyValueStore, KeyValueStoreExt, PostRepository};

/// Storage key of the post list.
pub const POSTS_KEY: &str = "x-content-planner-posts";

/// Current layout version of the stored post list.
const POSTS_VERSION: u32 = 1;

#[derive(Serialize)]
struct PostsEnvelopeRef<'a> {
    version: u32,
    posts: &'a [Post],
}

#[derive(Deserialize)]
struct PostsEnvelope {
    version: u32,
    posts: Vec<Post>,
}

/// Everything that may be found under [`POSTS_KEY`].
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPosts {
    Versioned(PostsEnvelope),
    /// Bare array written before the layout was versioned.
    Legacy(Vec<Post>),
}

/// Ids further ahead of the clock than this were not issued by a clock and
/// do not take part in id ordering.
const MAX_CLOCK_SKEW_MS: i64 = 366 * 24 * 60 * 60 * 1000;

/// Post repository that mirrors every change to a [`KeyValueStore`].
///
/// The in-memory list is authoritative for the running session: a failed
/// write is logged and not rolled back. Data stored in a newer layout is
/// never overwritten.
pub struct StoredPostRepository {
    store: Arc<dyn KeyValueStore>,
    posts: Vec<Post>,
    last_issued: i64,
    foreign_version: Option<u64>,
}

impl StoredPostRepository {
    /// Load the post list from `store`. Missing, corrupt or newer-versioned
    /// data yields an empty list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let (mut posts, foreign_version) = match store.read_json::<Value>(POSTS_KEY) {
            Ok(Some(raw)) => decode(raw),
            Ok(None) => (Vec::new(), None),
            Err(e) => {
                tracing::error!(error = %e, "Error reading stored posts, starting empty");
                (Vec::new(), None)
            }
        };

        let mut seen = HashSet::new();
        let before = posts.len();
        posts.retain(|p| seen.insert(p.id().clone()));
        if posts.len() != before {
            tracing::warn!(
                dropped = before - posts.len(),
                "Stored posts contained duplicate ids, keeping the first of each"
            );
        }

        let horizon = Utc::now().timestamp_millis().saturating_add(MAX_CLOCK_SKEW_MS);
        let last_issued = posts
            .iter()
            .filter_map(|p| p.id().millis())
            .filter(|millis| *millis <= horizon)
            .max()
            .unwrap_or(0);

        tracing::debug!(count = posts.len(), "Post repository loaded");

        Self {
            store,
            posts,
            last_issued,
            foreign_version,
        }
    }

    /// Layout version of stored data this build cannot read, if any. While
    /// set, changes stay in memory only.
    pub fn foreign_version(&self) -> Option<u64> {
        self.foreign_version
    }

    /// Clock-derived id, strictly greater than every id issued or loaded.
    fn next_id(&mut self) -> PostId {
        let now = Utc::now().timestamp_millis();
        self.last_issued = now.max(self.last_issued.saturating_add(1));
        PostId::from_millis(self.last_issued)
    }

    fn persist(&self) {
        if let Some(version) = self.foreign_version {
            tracing::error!(
                version,
                supported = POSTS_VERSION,
                count = self.posts.len(),
                "Stored posts use a newer layout, changes are not saved"
            );
            return;
        }

        let envelope = PostsEnvelopeRef {
            version: POSTS_VERSION,
            posts: &self.posts,
        };
        if let Err(e) = self.store.write_json(POSTS_KEY, &envelope) {
            tracing::error!(error = %e, count = self.posts.len(), "Error saving posts");
        }
    }

    fn position(&self, id: &PostId) -> Option<usize> {
        self.posts.iter().position(|p| p.id() == id)
    }
}

/// Posts from a raw stored value, plus the version when it is newer than
/// this build understands.
fn decode(raw: Value) -> (Vec<Post>, Option<u64>) {
    let version = raw.get("version").and_then(Value::as_u64);
    if let Some(version) = version.filter(|v| *v > u64::from(POSTS_VERSION)) {
        tracing::warn!(
            version,
            supported = POSTS_VERSION,
            "Stored posts use a newer layout, starting empty"
        );
        return (Vec::new(), Some(version));
    }

    let posts = match serde_json::from_value::<StoredPosts>(raw) {
        Ok(StoredPosts::Versioned(envelope)) => {
            tracing::trace!(version = envelope.version, "Reading versioned post list");
            envelope.posts
        }
        Ok(StoredPosts::Legacy(posts)) => {
            tracing::info!(count = posts.len(), "Migrating unversioned post list");
            posts
        }
        Err(e) => {
            tracing::error!(error = %e, "Stored posts are corrupt, starting empty");
            Vec::new()
        }
    };
    (posts, None)
}

impl PostRepository for StoredPostRepository {
    fn add(&mut self, body: PostBody) -> Post {
        let post = Post::new(self.next_id(), body);
        self.posts.insert(0, post.clone());
        self.persist();

        tracing::debug!(post_id = %post.id(), "Post added");
        post
    }

    fn update(&mut self, post: Post) -> Result<Post, RepoError> {
        let index = self
            .position(post.id())
            .ok_or_else(|| RepoError::NotFound(post.id().clone()))?;

        self.posts[index] = post.clone();
        self.persist();

        tracing::debug!(post_id = %post.id(), index, "Post updated");
        Ok(post)
    }

    fn delete(&mut self, id: &PostId) -> Result<Post, RepoError> {
        let index = self
            .position(id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))?;

        let removed = self.posts.remove(index);
        self.persist();

        tracing::debug!(post_id = %id, "Post removed");
        Ok(removed)
    }

    fn list(&self) -> &[Post] {
        &self.posts
    }
}
