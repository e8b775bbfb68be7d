//! Grid handler: build a configured grid and return columns + rows.

use crate::error::AppError;
use crate::service::{BuildResult, TableBuildService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn get_grid(
    State(state): State<AppState>,
    Path(grid_id): Path<String>,
) -> Result<(StatusCode, Json<BuildResult>), AppError> {
    let settings = state
        .grids
        .get(&grid_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("grid '{}'", grid_id)))?;
    let mut service = TableBuildService::postgres(state.pool.clone());
    service.configure(settings);
    let result = service.build(None).await;
    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(result)))
}
