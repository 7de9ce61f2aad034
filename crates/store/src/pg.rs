use async_trait::async_trait;
use sqlx::types::Uuid;
use sqlx::PgPool;

use remark_common::get_current_timestamp;

use crate::error::StoreError;
use crate::model::{Comment, Reply, User};
use crate::query::CommentQuery;
use crate::store::{Store, StoreResult};

// "user" is a reserved word in Postgres, so every identifier is quoted.
const SCHEMA_SQL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS "users" (
        "id" TEXT PRIMARY KEY,
        "created_at" BIGINT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "comments" (
        "id" UUID PRIMARY KEY,
        "content" TEXT NOT NULL,
        "user" TEXT NOT NULL REFERENCES "users"("id") ON DELETE CASCADE,
        "likes_comments" BIGINT NOT NULL DEFAULT 0,
        "created_at" BIGINT NOT NULL,
        "updated_at" BIGINT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS "replies" (
        "id" UUID PRIMARY KEY,
        "content" TEXT NOT NULL,
        "comment" UUID NOT NULL REFERENCES "comments"("id") ON DELETE CASCADE,
        "likes_replies" BIGINT NOT NULL DEFAULT 0,
        "created_at" BIGINT NOT NULL,
        "updated_at" BIGINT
    )"#,
    r#"CREATE INDEX IF NOT EXISTS "comments_user_idx" ON "comments"("user")"#,
    r#"CREATE INDEX IF NOT EXISTS "comments_created_at_idx" ON "comments"("created_at")"#,
    r#"CREATE INDEX IF NOT EXISTS "replies_comment_idx" ON "replies"("comment")"#,
];

// Postgres error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to the database and makes sure the tables, foreign keys
    /// and indexes exist.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        for statement in SCHEMA_SQL {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }
}

fn reference_error(err: sqlx::Error, what: String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            StoreError::InvalidReference(what)
        }
        _ => StoreError::Database(err),
    }
}

// ILIKE treats % and _ as wildcards; client input is matched literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_user(&self, id: &str) -> StoreResult<User> {
        let user = User::new(id);
        let inserted = sqlx::query_as::<_, User>(
            r#"INSERT INTO "users" ("id", "created_at") VALUES ($1, $2)
               ON CONFLICT ("id") DO NOTHING RETURNING *"#,
        )
        .bind(&user.id)
        .bind(user.created_at)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(user) => Ok(user),
            None => self
                .find_user(id)
                .await?
                .ok_or_else(|| StoreError::Internal(format!("user {id} vanished mid-insert"))),
        }
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> StoreResult<u64> {
        let result = sqlx::query(r#"DELETE FROM "users" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"INSERT INTO "comments"
               ("id", "content", "user", "likes_comments", "created_at", "updated_at")
               VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"#,
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(&comment.user)
        .bind(comment.likes_comments)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| reference_error(e, format!("user {}", comment.user)))
    }

    async fn list_comments(&self, query: &CommentQuery) -> StoreResult<Vec<Comment>> {
        let mut sql = String::from(r#"SELECT * FROM "comments""#);
        if query.search.is_some() {
            sql.push_str(r#" WHERE "content" ILIKE $1 OR "user" ILIKE $1"#);
        }

        let order_by = query.ordering.unwrap_or_default();
        sql.push_str(&format!(
            r#" ORDER BY "{}" {}"#,
            order_by.column,
            order_by.direction.as_sql()
        ));
        // Secondary key keeps equal rows in creation order, matching the
        // in-memory backend.
        if order_by.column != "created_at" {
            sql.push_str(r#", "created_at" ASC"#);
        }

        let mut q = sqlx::query_as::<_, Comment>(&sql);
        if let Some(search) = &query.search {
            q = q.bind(format!("%{}%", escape_like(search)));
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(r#"SELECT * FROM "comments" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn update_comment_content(&self, id: Uuid, content: &str) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"UPDATE "comments" SET "content" = $2, "updated_at" = $3
               WHERE "id" = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(content)
        .bind(get_current_timestamp())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("comment {id}")))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(r#"DELETE FROM "comments" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn like_comment(&self, id: Uuid) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"UPDATE "comments" SET "likes_comments" = "likes_comments" + 1
               WHERE "id" = $1 RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("comment {id}")))
    }

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply> {
        sqlx::query_as::<_, Reply>(
            r#"INSERT INTO "replies"
               ("id", "content", "comment", "likes_replies", "created_at", "updated_at")
               VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"#,
        )
        .bind(reply.id)
        .bind(&reply.content)
        .bind(reply.comment)
        .bind(reply.likes_replies)
        .bind(reply.created_at)
        .bind(reply.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| reference_error(e, format!("comment {}", reply.comment)))
    }

    async fn list_replies(&self) -> StoreResult<Vec<Reply>> {
        let replies =
            sqlx::query_as::<_, Reply>(r#"SELECT * FROM "replies" ORDER BY "created_at" ASC"#)
                .fetch_all(&self.pool)
                .await?;
        Ok(replies)
    }

    async fn replies_for(&self, comment_ids: &[Uuid]) -> StoreResult<Vec<Reply>> {
        if comment_ids.is_empty() {
            return Ok(vec![]);
        }
        let replies = sqlx::query_as::<_, Reply>(
            r#"SELECT * FROM "replies" WHERE "comment" = ANY($1) ORDER BY "created_at" ASC"#,
        )
        .bind(comment_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(replies)
    }

    async fn find_reply(&self, id: Uuid) -> StoreResult<Option<Reply>> {
        let reply = sqlx::query_as::<_, Reply>(r#"SELECT * FROM "replies" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reply)
    }

    async fn update_reply_content(&self, id: Uuid, content: &str) -> StoreResult<Reply> {
        sqlx::query_as::<_, Reply>(
            r#"UPDATE "replies" SET "content" = $2, "updated_at" = $3
               WHERE "id" = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(content)
        .bind(get_current_timestamp())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("reply {id}")))
    }

    async fn delete_reply(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(r#"DELETE FROM "replies" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn like_reply(&self, id: Uuid) -> StoreResult<Reply> {
        sqlx::query_as::<_, Reply>(
            r#"UPDATE "replies" SET "likes_replies" = "likes_replies" + 1
               WHERE "id" = $1 RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("reply {id}")))
    }
}
