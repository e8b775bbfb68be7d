//! HTTP handlers for grid endpoints.

pub mod grid;
pub use grid::*;
