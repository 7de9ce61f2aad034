mod env;
mod global_state;
mod middleware;
mod response;
mod routes;
mod utils;

pub use routes::{
    comment_routes,
    misc_routes,
    reply_routes,
};

pub use env::ApiServerEnv;
pub use global_state::GlobalState;
pub use middleware::authenticate;
pub use response::{AppError, AppSuccess, GenericResponse};
pub use utils::setup_tracing;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// The full application router. The server binary serves it; the
/// integration tests drive it directly.
pub fn app(state: GlobalState) -> Router {
    Router::new()
        .merge(comment_routes())
        .merge(reply_routes())
        .merge(misc_routes())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
