//! Schema introspection collaborators.

mod memory;
mod postgres;

pub use crate::column::SchemaColumn;
pub use memory::StaticSchema;
pub use postgres::{normalize_pg_type, PgSchemaIntrospector};

use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    /// Columns of `table` in declaration order. Empty when the table does not exist.
    async fn describe_columns(&self, table: &str) -> Result<Vec<SchemaColumn>, AppError>;

    async fn has_column(&self, table: &str, field: &str) -> Result<bool, AppError>;
}
