use crate::domain::{Post, PostBody, PostId};
use crate::error::RepoError;

/// Owner of the canonical post list.
///
/// The list is ordered most-recently-added first. Implementations persist
/// after every successful mutation; a failed write is logged and the
/// in-memory list stays authoritative.
pub trait PostRepository {
    /// Assign a fresh permanent id, prepend the record and persist it.
    fn add(&mut self, body: PostBody) -> Post;

    /// Replace the record with the same id, keeping its position.
    fn update(&mut self, post: Post) -> Result<Post, RepoError>;

    /// Remove the record with `id` and return it.
    fn delete(&mut self, id: &PostId) -> Result<Post, RepoError>;

    /// Current records, newest first.
    fn list(&self) -> &[Post];

    /// By-value copy of the record with `id`.
    fn get(&self, id: &PostId) -> Option<Post> {
        self.list().iter().find(|p| p.id() == id).cloned()
    }
}
