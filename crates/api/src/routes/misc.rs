use axum::{extract::State, routing::get, Router};

use crate::response::AppError;
use crate::GlobalState;

pub fn misc_routes() -> Router<GlobalState> {
    Router::new()
        .route("/health",
            get(health)
        )
}

async fn health(State(state): State<GlobalState>) -> Result<&'static str, AppError> {
    state.store.health_check().await?;
    Ok("OK")
}
