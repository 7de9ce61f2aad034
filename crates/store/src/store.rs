use async_trait::async_trait;
use sqlx::types::Uuid;

use crate::error::StoreError;
use crate::model::{Comment, Reply, User};
use crate::query::CommentQuery;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations behind the HTTP layer, implemented by the Postgres
/// backend and by the in-memory backend used for tests and local runs.
///
/// Deleting a user removes their comments; deleting a comment removes its
/// replies. Both like operations are atomic increments that return the
/// updated record.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> StoreResult<()>;

    /// Registers the identity if it is not known yet. Idempotent; a second
    /// call returns the existing record unchanged.
    async fn ensure_user(&self, id: &str) -> StoreResult<User>;
    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;
    async fn delete_user(&self, id: &str) -> StoreResult<u64>;

    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment>;
    async fn list_comments(&self, query: &CommentQuery) -> StoreResult<Vec<Comment>>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    async fn update_comment_content(&self, id: Uuid, content: &str) -> StoreResult<Comment>;
    async fn delete_comment(&self, id: Uuid) -> StoreResult<u64>;
    async fn like_comment(&self, id: Uuid) -> StoreResult<Comment>;

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply>;
    async fn list_replies(&self) -> StoreResult<Vec<Reply>>;
    /// Replies for a batch of comments, in creation order. One call per
    /// listing, not one per comment.
    async fn replies_for(&self, comment_ids: &[Uuid]) -> StoreResult<Vec<Reply>>;
    async fn find_reply(&self, id: Uuid) -> StoreResult<Option<Reply>>;
    async fn update_reply_content(&self, id: Uuid, content: &str) -> StoreResult<Reply>;
    async fn delete_reply(&self, id: Uuid) -> StoreResult<u64>;
    async fn like_reply(&self, id: Uuid) -> StoreResult<Reply>;
}
