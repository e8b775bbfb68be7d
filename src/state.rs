//! Shared application state for all routes.

use crate::config::TableSettings;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Named grids served under /grids/:grid_id. Each request builds from its own clone.
    pub grids: Arc<HashMap<String, TableSettings>>,
}
