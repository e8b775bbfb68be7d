//! Fixed, in-memory schema for callers that already know their tables.

use super::{SchemaColumn, SchemaIntrospector};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct StaticSchema {
    tables: HashMap<String, Vec<SchemaColumn>>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table from `(field, raw_type)` pairs.
    pub fn with_table(mut self, table: impl Into<String>, columns: &[(&str, &str)]) -> Self {
        let columns = columns
            .iter()
            .map(|(field, raw)| SchemaColumn::new(*field, *raw))
            .collect();
        self.tables.insert(table.into(), columns);
        self
    }
}

#[async_trait]
impl SchemaIntrospector for StaticSchema {
    async fn describe_columns(&self, table: &str) -> Result<Vec<SchemaColumn>, AppError> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    async fn has_column(&self, table: &str, field: &str) -> Result<bool, AppError> {
        Ok(self
            .tables
            .get(table)
            .map(|cols| cols.iter().any(|c| c.field == field))
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_from_registered_tables() {
        let schema = StaticSchema::new().with_table("users", &[("rec_id", "int"), ("name", "varchar(80)")]);
        let cols = schema.describe_columns("users").await.unwrap();
        assert_eq!(cols[1], SchemaColumn::new("name", "varchar(80)"));
        assert!(schema.has_column("users", "rec_id").await.unwrap());
        assert!(!schema.has_column("users", "email").await.unwrap());
        assert!(!schema.has_column("orders", "id").await.unwrap());
        assert!(schema.describe_columns("orders").await.unwrap().is_empty());
    }
}
