use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::json;
use axum::{
    extract::{Path, State},
    http::StatusCode, middleware,
    routing::{get, put}, Json, Router,
};
use sqlx::types::Uuid;

use remark_store::Reply;

use crate::{
    middleware::authenticate,
    response::{AppError, AppSuccess},
    GlobalState,
};

pub fn reply_routes() -> Router<GlobalState> {
    Router::new()
        .route("/api/reply/",
            get(list_replies)
            .post(create_reply)
        )
        .route("/api/reply/{id}/",
            get(get_reply)
            .patch(update_reply)
            .delete(delete_reply)
        )
        .route("/api/reply/{id}/like",
            put(like_reply)
        )
        .route_layer(middleware::from_fn(authenticate))
}

async fn list_replies(State(state): State<GlobalState>) -> Result<AppSuccess, AppError> {
    let replies = state.store.list_replies().await?;

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Replies fetched successfully",
        json!(replies),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    pub content: String,
    pub comment: Uuid,
}

async fn create_reply(
    State(state): State<GlobalState>,
    Json(payload): Json<CreateReplyRequest>,
) -> Result<AppSuccess, AppError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("[/api/reply/] content must not be blank"),
        ));
    }

    state
        .store
        .find_comment(payload.comment)
        .await?
        .ok_or_else(|| {
            AppError::new(
                StatusCode::BAD_REQUEST,
                anyhow!("[/api/reply/] unknown comment {}", payload.comment),
            )
        })?;

    let reply = state
        .store
        .create_reply(Reply::new(content, payload.comment))
        .await?;

    Ok(AppSuccess::new(
        StatusCode::CREATED,
        "Reply created successfully",
        json!(reply),
    ))
}

async fn get_reply(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
) -> Result<AppSuccess, AppError> {
    let reply = state.store.find_reply(id).await?.ok_or_else(|| {
        AppError::new(
            StatusCode::NOT_FOUND,
            anyhow!("[/api/reply/{id}/] reply not found"),
        )
    })?;

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Reply fetched successfully",
        json!(reply),
    ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateReplyRequest {
    pub content: Option<String>,
}

async fn update_reply(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReplyRequest>,
) -> Result<AppSuccess, AppError> {
    let reply = match payload.content {
        Some(content) => {
            let content = content.trim().to_string();
            if content.is_empty() {
                return Err(AppError::new(
                    StatusCode::BAD_REQUEST,
                    anyhow!("[/api/reply/{id}/] content must not be blank"),
                ));
            }
            state.store.update_reply_content(id, &content).await?
        }
        None => state.store.find_reply(id).await?.ok_or_else(|| {
            AppError::new(
                StatusCode::NOT_FOUND,
                anyhow!("[/api/reply/{id}/] reply not found"),
            )
        })?,
    };

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Reply updated successfully",
        json!(reply),
    ))
}

async fn delete_reply(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
) -> Result<AppSuccess, AppError> {
    let deleted = state.store.delete_reply(id).await?;
    if deleted == 0 {
        return Err(AppError::new(
            StatusCode::NOT_FOUND,
            anyhow!("[/api/reply/{id}/] reply not found"),
        ));
    }

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Reply deleted successfully",
        json!(()),
    ))
}

async fn like_reply(
    State(state): State<GlobalState>,
    Path(id): Path<Uuid>,
) -> Result<AppSuccess, AppError> {
    let reply = state.store.like_reply(id).await?;

    Ok(AppSuccess::new(
        StatusCode::OK,
        "Reply liked successfully",
        json!(reply),
    ))
}
