use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use sqlx::types::Uuid;

use remark_common::get_current_timestamp;

use crate::error::StoreError;
use crate::model::{Comment, Reply, User};
use crate::query::{CommentQuery, OrderBy, OrderDirection};
use crate::store::{Store, StoreResult};

/// In-memory backend with the same semantics as the Postgres one. Backs
/// the test suite and local runs that have no database at hand.
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<MemData>>,
}

#[derive(Default)]
struct MemData {
    users: HashMap<String, User>,
    comments: Vec<Comment>,
    replies: Vec<Reply>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemData>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemData>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))
    }
}

// Matches the Postgres ordering: primary column in the requested
// direction, ties in creation order.
fn compare(a: &Comment, b: &Comment, order_by: &OrderBy) -> std::cmp::Ordering {
    let ordering = match order_by.column {
        "id" => a.id.cmp(&b.id),
        "content" => a.content.cmp(&b.content),
        "user" => a.user.cmp(&b.user),
        "likes_comments" => a.likes_comments.cmp(&b.likes_comments),
        // Postgres puts NULLs last ascending (first descending), so
        // never-updated rows sort after updated ones here too.
        "updated_at" => a
            .updated_at
            .is_none()
            .cmp(&b.updated_at.is_none())
            .then(a.updated_at.cmp(&b.updated_at)),
        _ => a.created_at.cmp(&b.created_at),
    };
    let ordering = match order_by.direction {
        OrderDirection::Asc => ordering,
        OrderDirection::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.created_at.cmp(&b.created_at))
}

fn matches_search(comment: &Comment, needle: &str) -> bool {
    comment.content.to_lowercase().contains(needle) || comment.user.to_lowercase().contains(needle)
}

#[async_trait]
impl Store for MemStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.read()?;
        Ok(())
    }

    async fn ensure_user(&self, id: &str) -> StoreResult<User> {
        let mut data = self.write()?;
        let user = data
            .users
            .entry(id.to_string())
            .or_insert_with(|| User::new(id));
        Ok(user.clone())
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<u64> {
        let mut data = self.write()?;
        if data.users.remove(id).is_none() {
            return Ok(0);
        }
        let removed: Vec<Uuid> = data
            .comments
            .iter()
            .filter(|c| c.user == id)
            .map(|c| c.id)
            .collect();
        data.comments.retain(|c| c.user != id);
        data.replies.retain(|r| !removed.contains(&r.comment));
        Ok(1)
    }

    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let mut data = self.write()?;
        if !data.users.contains_key(&comment.user) {
            return Err(StoreError::InvalidReference(format!(
                "user {}",
                comment.user
            )));
        }
        data.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, query: &CommentQuery) -> StoreResult<Vec<Comment>> {
        let data = self.read()?;
        let mut comments: Vec<Comment> = match &query.search {
            Some(search) => {
                let needle = search.to_lowercase();
                data.comments
                    .iter()
                    .filter(|c| matches_search(c, &needle))
                    .cloned()
                    .collect()
            }
            None => data.comments.clone(),
        };

        let order_by = query.ordering.unwrap_or_default();
        comments.sort_by(|a, b| compare(a, b, &order_by));
        Ok(comments)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.read()?.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_comment_content(&self, id: Uuid, content: &str) -> StoreResult<Comment> {
        let mut data = self.write()?;
        let comment = data
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("comment {id}")))?;
        comment.content = content.to_string();
        comment.updated_at = Some(get_current_timestamp());
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<u64> {
        let mut data = self.write()?;
        let before = data.comments.len();
        data.comments.retain(|c| c.id != id);
        let deleted = (before - data.comments.len()) as u64;
        if deleted > 0 {
            data.replies.retain(|r| r.comment != id);
        }
        Ok(deleted)
    }

    async fn like_comment(&self, id: Uuid) -> StoreResult<Comment> {
        let mut data = self.write()?;
        let comment = data
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("comment {id}")))?;
        comment.likes_comments += 1;
        Ok(comment.clone())
    }

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply> {
        let mut data = self.write()?;
        if !data.comments.iter().any(|c| c.id == reply.comment) {
            return Err(StoreError::InvalidReference(format!(
                "comment {}",
                reply.comment
            )));
        }
        data.replies.push(reply.clone());
        Ok(reply)
    }

    async fn list_replies(&self) -> StoreResult<Vec<Reply>> {
        let mut replies = self.read()?.replies.clone();
        replies.sort_by_key(|r| r.created_at);
        Ok(replies)
    }

    async fn replies_for(&self, comment_ids: &[Uuid]) -> StoreResult<Vec<Reply>> {
        if comment_ids.is_empty() {
            return Ok(vec![]);
        }
        let mut replies: Vec<Reply> = self
            .read()?
            .replies
            .iter()
            .filter(|r| comment_ids.contains(&r.comment))
            .cloned()
            .collect();
        replies.sort_by_key(|r| r.created_at);
        Ok(replies)
    }

    async fn find_reply(&self, id: Uuid) -> StoreResult<Option<Reply>> {
        Ok(self.read()?.replies.iter().find(|r| r.id == id).cloned())
    }

    async fn update_reply_content(&self, id: Uuid, content: &str) -> StoreResult<Reply> {
        let mut data = self.write()?;
        let reply = data
            .replies
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("reply {id}")))?;
        reply.content = content.to_string();
        reply.updated_at = Some(get_current_timestamp());
        Ok(reply.clone())
    }

    async fn delete_reply(&self, id: Uuid) -> StoreResult<u64> {
        let mut data = self.write()?;
        let before = data.replies.len();
        data.replies.retain(|r| r.id != id);
        Ok((before - data.replies.len()) as u64)
    }

    async fn like_reply(&self, id: Uuid) -> StoreResult<Reply> {
        let mut data = self.write()?;
        let reply = data
            .replies
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("reply {id}")))?;
        reply.likes_replies += 1;
        Ok(reply.clone())
    }
}
