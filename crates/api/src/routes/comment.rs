use std::collections::HashMap;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::json;
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode, middleware,
    routing::{get, put}, Json, Router,
};
use sqlx::types::Uuid;

use remark_store::{Comment, CommentQuery, OrderBy, Reply};

use crate::{
    middleware::authenticate,
    response::{AppError, AppSuccess},
    GlobalState,
};

pub fn comment_routes() -> Router<GlobalState> {
    Router::new()
        .route("/api/comment/",
            get(list_comments)
            .post(create_comment)
        )
        .route("/api/comment/{id}/",
            get(get_comment)
            .patch(update_comment)
            .delete(delete_comment)
        )
        .route("/api/comment/{id}/like",
            put(like_comment)
        )
        .route_layer(middleware::from_fn(authenticate))
}

/// A comment as it goes over the wire: every stored field plus the full
/// reply records nested under `replies`.
#[derive(Debug, Serialize)]
struct CommentView {
    #[serde(flatten)]
    comment: Comment,
    replies: Vec<Reply>,
}

async fn hydrate(state: &GlobalState, comment: Comment) -> Result<CommentView, AppError> {
    let replies = state.store.replies_for(&[comment.id]).await?;
    Ok(CommentView { comment, replies })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCommentsParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

async fn list_comments(
    State(state): State<GlobalState>,
    Query(params): Query<ListCommentsParams>,
) -> Result<AppSuccess, AppError> {
    let ordering = match params.ordering.as_deref() {
        Some(raw) if !raw.is_empty() => Some(OrderBy::parse(raw)?),
        _ => None,
    };
    let query = CommentQuery {
        search: params.search.filter(|s| !s.trim().is_empty()),
        ordering,
    };

    let comments = state.store.list_comments(&query).await?;
    let ids = comments.iter().map(|c| c.id).collect::<Vec<_>>();
    let replies = state.store.replies_for(&ids).await?;

    let mut by_comment: HashMap<Uuid, Vec<Reply>> = HashMap::new();
    for reply in replies {
        by_comment.entry(reply.comment).or_default().push(reply);
    }
    let views = comments
        .into_iter()
        .map(|comment| {
            let replies = by_comment.remove(&comment.id).unwrap_or_default();
            CommentView { comment, replies }
        })
        .collect::<Vec<_>>();

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Comments fetched successfully",
        json!(views),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub user: Option<String>,
}

async fn create_comment(
    State(state): State<GlobalState>,
    Extension(user_id): Extension<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<AppSuccess, AppError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("[/api/comment/] content must not be blank"),
        ));
    }

    // An explicit author has to be a known user; by default the comment is
    // attributed to the caller, registered on first write.
    let author = match payload.user {
        Some(user) => {
            state.store.find_user(&user).await?.ok_or_else(|| {
                AppError::new(
                    StatusCode::BAD_REQUEST,
                    anyhow!("[/api/comment/] unknown user {user}"),
                )
            })?;
            user
        }
        None => state.store.ensure_user(&user_id).await?.id,
    };

    let comment = state
        .store
        .create_comment(Comment::new(content, &author))
        .await?;

    Ok(AppSuccess::new(
        StatusCode::CREATED,
        "Comment created successfully",
        json!(CommentView {
            comment,
            replies: vec![]
        }),
    ))
}

async fn get_comment(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
) -> Result<AppSuccess, AppError> {
    let comment = state.store.find_comment(id).await?.ok_or_else(|| {
        AppError::new(
            StatusCode::NOT_FOUND,
            anyhow!("[/api/comment/{id}/] comment not found"),
        )
    })?;

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Comment fetched successfully",
        json!(hydrate(&state, comment).await?),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

async fn update_comment(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<AppSuccess, AppError> {
    let comment = match payload.content {
        Some(content) => {
            let content = content.trim().to_string();
            if content.is_empty() {
                return Err(AppError::new(
                    StatusCode::BAD_REQUEST,
                    anyhow!("[/api/comment/{id}/] content must not be blank"),
                ));
            }
            state.store.update_comment_content(id, &content).await?
        }
        // Nothing to change; a partial update with no fields still has to
        // resolve the resource.
        None => state.store.find_comment(id).await?.ok_or_else(|| {
            AppError::new(
                StatusCode::NOT_FOUND,
                anyhow!("[/api/comment/{id}/] comment not found"),
            )
        })?,
    };

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Comment updated successfully",
        json!(hydrate(&state, comment).await?),
    ))
}

async fn delete_comment(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
) -> Result<AppSuccess, AppError> {
    let deleted = state.store.delete_comment(id).await?;
    if deleted == 0 {
        return Err(AppError::new(
            StatusCode::NOT_FOUND,
            anyhow!("[/api/comment/{id}/] comment not found"),
        ));
    }

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Comment deleted successfully",
        json!(()),
    ))
}

async fn like_comment(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
) -> Result<AppSuccess, AppError> {
    let comment = state.store.like_comment(id).await?;

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Comment liked successfully",
        json!(hydrate(&state, comment).await?),
    ))
}
