//! Plan execution against PostgreSQL.

use super::QueryExecutor;
use crate::error::AppError;
use crate::sql::{bind_all, select_plan, QueryPlan};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgQueryExecutor {
    pool: PgPool,
}

impl PgQueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        PgQueryExecutor { pool }
    }
}

#[async_trait]
impl QueryExecutor for PgQueryExecutor {
    async fn fetch_all(&self, plan: &QueryPlan) -> Result<Vec<Value>, AppError> {
        let q = select_plan(plan);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, col.ordinal()));
    }
    Value::Object(map)
}

/// Try the decodings a grid column can reasonably hold; anything else becomes null.
/// Decoded by ordinal: joined `table.*` selections may repeat column names.
fn cell_to_value(row: &sqlx::postgres::PgRow, idx: usize) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(t)) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return Value::String(t.format("%H:%M:%S").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<bigdecimal::BigDecimal>, _>(idx) {
        return decimal_to_value(&d);
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    enum_label(row, idx).map(Value::String).unwrap_or(Value::Null)
}

/// Numeric values keep their scale as a string, the same shape `::text` selects produce.
fn decimal_to_value(d: &bigdecimal::BigDecimal) -> Value {
    Value::String(d.to_string())
}

/// Enum values arrive as their label; `String` refuses the custom type, so decode raw.
fn enum_label(row: &sqlx::postgres::PgRow, idx: usize) -> Option<String> {
    use sqlx::postgres::PgTypeKind;
    use sqlx::{Decode, Postgres, Row, TypeInfo, ValueRef};
    let raw = row.try_get_raw(idx).ok()?;
    if raw.is_null() {
        return None;
    }
    let info = raw.type_info();
    if !matches!(info.kind(), PgTypeKind::Enum(_)) {
        tracing::debug!(column = idx, pg_type = %info.name(), "undecodable column");
        return None;
    }
    <String as Decode<Postgres>>::decode(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::decimal_to_value;
    use bigdecimal::BigDecimal;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn decimals_keep_their_scale() {
        let d = BigDecimal::from_str("42.50").unwrap();
        assert_eq!(decimal_to_value(&d), json!("42.50"));
    }
}
