//! Axum routers.

mod common;
mod grid;

pub use common::common_routes;
pub use grid::grid_routes;
