//! Example consumer: serves the grids described in `GRIDS_PATH` over a PostgreSQL database.
//!
//! Run from repo root: `cargo run -p example-consumer`

use datagrid_sdk::{common_routes, grid_routes, load_grids_from_path, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("datagrid_sdk=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/datagrid".into());
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let grids_path = std::env::var("GRIDS_PATH").unwrap_or_else(|_| "grids.json".into());
    let grids = load_grids_from_path(&grids_path).await?;
    let state = AppState {
        pool,
        grids: Arc::new(grids),
    };

    let app = axum::Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", grid_routes(state));
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
