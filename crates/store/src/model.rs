use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

use remark_common::get_current_timestamp;

/// Author identity asserted by the upstream authenticator. Owned
/// externally; mirrored here so comments have a row to reference.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub created_at: i64,
}

impl User {
    pub const TABLE: &'static str = "users";
    pub const COLUMNS: &'static [&'static str] = &["id", "created_at"];

    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            created_at: get_current_timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub user: String,
    pub likes_comments: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl Comment {
    pub const TABLE: &'static str = "comments";
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "content",
        "user",
        "likes_comments",
        "created_at",
        "updated_at",
    ];

    pub fn new(content: &str, user: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            user: user.to_string(),
            likes_comments: 0,
            created_at: get_current_timestamp(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reply {
    pub id: Uuid,
    pub content: String,
    pub comment: Uuid,
    pub likes_replies: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl Reply {
    pub const TABLE: &'static str = "replies";
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "content",
        "comment",
        "likes_replies",
        "created_at",
        "updated_at",
    ];

    pub fn new(content: &str, comment: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            comment,
            likes_replies: 0,
            created_at: get_current_timestamp(),
            updated_at: None,
        }
    }
}
