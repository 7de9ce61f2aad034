use std::sync::Arc;

use anyhow::Result;
use remark_common::EnvVars;
use remark_service_api::{app, setup_tracing, ApiServerEnv, GlobalState};
use remark_store::{MemStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let env = ApiServerEnv::load();

    let store: Arc<dyn Store> = match env.get_env_var("STORE_BACKEND").as_str() {
        "memory" => {
            tracing::warn!("USING IN-MEMORY STORE, DATA WILL NOT SURVIVE A RESTART");
            Arc::new(MemStore::new())
        }
        _ => Arc::new(PgStore::connect(&env.get_env_var("DATABASE_URL")).await?),
    };

    let app = app(GlobalState::new(store));

    let port: u16 = env
        .get_env_var("PORT")
        .parse()
        .expect("failed to convert to number");

    let listener = tokio::net::TcpListener::bind(format!(":::{port}"))
        .await
        .unwrap();

    tracing::info!("LISTENING ON {port}");
    axum::serve(listener, app.into_make_service()).await.unwrap();
    Ok(())
}
