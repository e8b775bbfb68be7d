//! PostgreSQL introspection via pg_catalog.

use super::{SchemaColumn, SchemaIntrospector};
use crate::config::datagrid_schema;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

const DESCRIBE_SQL: &str = r#"
    SELECT a.attname::text AS field,
           format_type(a.atttypid, a.atttypmod) AS raw_type,
           CASE WHEN t.typtype = 'e' THEN (
               SELECT array_agg(e.enumlabel::text ORDER BY e.enumsortorder)
                 FROM pg_enum e
                WHERE e.enumtypid = t.oid
           ) END AS enum_labels
      FROM pg_attribute a
      JOIN pg_class c ON c.oid = a.attrelid
      JOIN pg_namespace n ON n.oid = c.relnamespace
      JOIN pg_type t ON t.oid = a.atttypid
     WHERE n.nspname = $1
       AND c.relname = $2
       AND a.attnum > 0
       AND NOT a.attisdropped
     ORDER BY a.attnum
"#;

const HAS_COLUMN_SQL: &str = r#"
    SELECT EXISTS (
      SELECT 1
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
       WHERE n.nspname = $1
         AND c.relname = $2
         AND a.attname = $3
         AND a.attnum > 0
         AND NOT a.attisdropped
    )
"#;

/// Rewrite a `format_type` name into the vocabulary the type mapper understands
/// (`decimal`, `float`, `double`, `varchar`, `datetime`, `enum('a','b')`).
pub fn normalize_pg_type(formatted: &str, enum_labels: Option<&[String]>) -> String {
    if let Some(labels) = enum_labels {
        let quoted: Vec<String> = labels
            .iter()
            .map(|l| format!("'{}'", l.replace('\'', "''")))
            .collect();
        return format!("enum({})", quoted.join(","));
    }
    if let Some(rest) = formatted.strip_prefix("numeric") {
        return format!("decimal{}", rest);
    }
    if let Some(rest) = formatted.strip_prefix("character varying") {
        return format!("varchar{}", rest);
    }
    if formatted.starts_with("timestamp") {
        return "datetime".into();
    }
    if formatted.starts_with("time") {
        return "time".into();
    }
    match formatted {
        "real" => "float".into(),
        "double precision" => "double".into(),
        other => other.to_string(),
    }
}

/// One DESCRIBE row: the mapper sees the normalized name, casts use `format_type`'s.
fn schema_column(field: String, formatted: String, enum_labels: Option<Vec<String>>) -> SchemaColumn {
    SchemaColumn::new(field, normalize_pg_type(&formatted, enum_labels.as_deref())).with_sql_type(formatted)
}

#[derive(Clone)]
pub struct PgSchemaIntrospector {
    pool: PgPool,
    schema: String,
}

impl PgSchemaIntrospector {
    /// Introspect tables in the schema named by `DATAGRID_SCHEMA` (default `public`).
    pub fn new(pool: PgPool) -> Self {
        Self::with_schema(pool, datagrid_schema())
    }

    pub fn with_schema(pool: PgPool, schema: impl Into<String>) -> Self {
        PgSchemaIntrospector {
            pool,
            schema: schema.into(),
        }
    }
}

#[async_trait]
impl SchemaIntrospector for PgSchemaIntrospector {
    async fn describe_columns(&self, table: &str) -> Result<Vec<SchemaColumn>, AppError> {
        tracing::debug!(schema = %self.schema, table = %table, "describe columns");
        let rows = sqlx::query_as::<_, (String, String, Option<Vec<String>>)>(DESCRIBE_SQL)
            .bind(&self.schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(field, raw, labels)| schema_column(field, raw, labels))
            .collect())
    }

    async fn has_column(&self, table: &str, field: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(HAS_COLUMN_SQL)
            .bind(&self.schema)
            .bind(table)
            .bind(field)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_pg_type, schema_column, DESCRIBE_SQL, HAS_COLUMN_SQL};
    use crate::column::{map_type, FilterType, RenderType};

    #[test]
    fn normalizes_postgres_names() {
        assert_eq!(normalize_pg_type("numeric(10,2)", None), "decimal(10,2)");
        assert_eq!(normalize_pg_type("numeric", None), "decimal");
        assert_eq!(normalize_pg_type("character varying(255)", None), "varchar(255)");
        assert_eq!(normalize_pg_type("timestamp with time zone", None), "datetime");
        assert_eq!(normalize_pg_type("timestamp(3) without time zone", None), "datetime");
        assert_eq!(normalize_pg_type("time without time zone", None), "time");
        assert_eq!(normalize_pg_type("double precision", None), "double");
        assert_eq!(normalize_pg_type("real", None), "float");
        assert_eq!(normalize_pg_type("integer", None), "integer");
        assert_eq!(normalize_pg_type("jsonb", None), "jsonb");
    }

    #[test]
    fn enums_are_spelled_out() {
        let labels = vec!["open".to_string(), "won't fix".to_string()];
        let raw = normalize_pg_type("order_status", Some(&labels));
        assert_eq!(raw, "enum('open','won''t fix')");
        assert_eq!(map_type(&raw), (RenderType::Select, FilterType::MultiSelect));
    }

    #[test]
    fn normalized_names_map_to_grid_types() {
        let cases = [
            ("numeric(10,2)", RenderType::Number),
            ("timestamp without time zone", RenderType::DateTime),
            ("date", RenderType::Date),
            ("boolean", RenderType::Boolean),
            ("bigint", RenderType::Number),
            ("text", RenderType::Text),
        ];
        for (pg, expected) in cases {
            assert_eq!(map_type(&normalize_pg_type(pg, None)).0, expected, "{}", pg);
        }
    }

    #[test]
    fn described_columns_keep_database_type_name() {
        let col = schema_column("total".into(), "numeric(10,2)".into(), None);
        assert_eq!(col.raw_type, "decimal(10,2)");
        assert_eq!(col.sql_type.as_deref(), Some("numeric(10,2)"));
    }

    #[test]
    fn existence_check_reads_the_same_catalog_as_describe() {
        for sql in [DESCRIBE_SQL, HAS_COLUMN_SQL] {
            assert!(sql.contains("FROM pg_attribute a"));
            assert!(sql.contains("NOT a.attisdropped"));
            assert!(!sql.contains("information_schema"));
        }
    }
}
