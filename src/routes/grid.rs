//! Grid routes built from the configured grid settings.

use crate::handlers::get_grid;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn grid_routes(state: AppState) -> Router {
    Router::new()
        .route("/grids/:grid_id", get(get_grid))
        .with_state(state)
}
