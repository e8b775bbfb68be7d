//! Query execution collaborators.

mod postgres;

pub use postgres::PgQueryExecutor;

use crate::error::AppError;
use crate::sql::QueryPlan;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run the plan and return each row as a JSON object keyed by column (or alias).
    async fn fetch_all(&self, plan: &QueryPlan) -> Result<Vec<Value>, AppError>;
}
