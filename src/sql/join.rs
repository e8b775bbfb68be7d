//! Expand join specs against the live schema into join clauses and extra select items.

use crate::config::{JoinSpec, WILDCARD};
use crate::schema::{SchemaColumn, SchemaIntrospector};
use crate::sql::{selects_as_text, ColumnRef, JoinClause, SelectItem};

/// Missing columns and lookup failures both read as "absent": the join is dropped, not fatal.
async fn column_exists(introspector: &dyn SchemaIntrospector, table: &str, field: &str) -> bool {
    match introspector.has_column(table, field).await {
        Ok(exists) => exists,
        Err(e) => {
            tracing::warn!(table = %table, field = %field, error = %e, "column lookup failed");
            false
        }
    }
}

/// Related table columns for typing joined selects. A failure only loses the typing.
async fn related_columns(introspector: &dyn SchemaIntrospector, table: &str) -> Vec<SchemaColumn> {
    match introspector.describe_columns(table).await {
        Ok(columns) => columns,
        Err(e) => {
            tracing::warn!(table = %table, error = %e, "describe failed for joined table");
            Vec::new()
        }
    }
}

/// For each spec in order: keep it only when both join fields exist, emit
/// `KIND JOIN related ON base.field = related.related_field`, then append its select entries
/// to `selected`. A `*` entry adds `related.*` and ends that spec's list; concrete columns are
/// added as `related.column AS "related.column"` when they exist, numeric and enum columns
/// cast to text.
pub async fn plan_joins(
    base_table: &str,
    specs: &[JoinSpec],
    mut selected: Vec<SelectItem>,
    introspector: &dyn SchemaIntrospector,
) -> (Vec<JoinClause>, Vec<SelectItem>) {
    let mut joins = Vec::new();
    for spec in specs {
        let local_ok = column_exists(introspector, base_table, &spec.field).await;
        let related_ok = local_ok
            && column_exists(introspector, &spec.related_table, &spec.related_field).await;
        if !related_ok {
            tracing::debug!(
                base = %base_table,
                field = %spec.field,
                related_table = %spec.related_table,
                related_field = %spec.related_field,
                "dropping join: field missing"
            );
            continue;
        }

        joins.push(JoinClause {
            kind: spec.kind,
            table: spec.related_table.clone(),
            left: ColumnRef::new(base_table, spec.field.clone()),
            right: ColumnRef::new(spec.related_table.clone(), spec.related_field.clone()),
        });

        let typed = match spec.select.first() {
            Some(first) if first != WILDCARD => related_columns(introspector, &spec.related_table).await,
            _ => Vec::new(),
        };

        for entry in &spec.select {
            if entry == WILDCARD {
                selected.push(SelectItem::AllOf(spec.related_table.clone()));
                break;
            }
            if column_exists(introspector, &spec.related_table, entry).await {
                let column = ColumnRef::new(spec.related_table.clone(), entry.clone());
                let alias = column.dotted();
                let as_text = typed
                    .iter()
                    .any(|c| c.field == *entry && selects_as_text(&c.raw_type));
                selected.push(if as_text {
                    SelectItem::aliased_text(column, alias)
                } else {
                    SelectItem::aliased(column, alias)
                });
            } else {
                tracing::debug!(table = %spec.related_table, column = %entry, "skipping unknown join column");
            }
        }
    }
    (joins, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoinKind;
    use crate::error::AppError;
    use crate::schema::StaticSchema;
    use async_trait::async_trait;

    fn schema() -> StaticSchema {
        StaticSchema::new()
            .with_table("orders", &[("id", "int"), ("owner_id", "int"), ("customer_id", "int")])
            .with_table("users", &[("rec_id", "int"), ("name", "varchar(80)"), ("email", "varchar(120)")])
            .with_table(
                "customers",
                &[
                    ("id", "int"),
                    ("name", "varchar(80)"),
                    ("vat", "varchar(20)"),
                    ("balance", "decimal(12,2)"),
                    ("tier", "enum('open','gold')"),
                ],
            )
    }

    fn base_selects() -> Vec<SelectItem> {
        vec![
            SelectItem::column(ColumnRef::new("orders", "id")),
            SelectItem::column(ColumnRef::new("orders", "owner_id")),
        ]
    }

    #[tokio::test]
    async fn emits_join_and_aliased_columns() {
        let specs = vec![JoinSpec::default_owner()];
        let (joins, selects) = plan_joins("orders", &specs, base_selects(), &schema()).await;
        assert_eq!(
            joins,
            vec![JoinClause {
                kind: JoinKind::Left,
                table: "users".into(),
                left: ColumnRef::new("orders", "owner_id"),
                right: ColumnRef::new("users", "rec_id"),
            }]
        );
        assert_eq!(selects.len(), 4);
        assert_eq!(
            selects[2],
            SelectItem::aliased(ColumnRef::new("users", "name"), "users.name")
        );
        assert_eq!(
            selects[3],
            SelectItem::aliased(ColumnRef::new("users", "email"), "users.email")
        );
    }

    #[tokio::test]
    async fn missing_related_field_drops_join() {
        let specs = vec![JoinSpec::new("customer_id", "customers", "uuid").select(["name"])];
        let (joins, selects) = plan_joins("orders", &specs, base_selects(), &schema()).await;
        assert!(joins.is_empty());
        assert_eq!(selects, base_selects());
    }

    #[tokio::test]
    async fn missing_local_field_drops_join() {
        let specs = vec![JoinSpec::new("region_id", "customers", "id").select(["*"])];
        let (joins, selects) = plan_joins("orders", &specs, base_selects(), &schema()).await;
        assert!(joins.is_empty());
        assert_eq!(selects, base_selects());
    }

    #[tokio::test]
    async fn wildcard_short_circuits_remaining_entries() {
        let specs = vec![JoinSpec::new("customer_id", "customers", "id").select(["vat", "*", "name"])];
        let (joins, selects) = plan_joins("orders", &specs, Vec::new(), &schema()).await;
        assert_eq!(joins.len(), 1);
        assert_eq!(joins[0].kind, JoinKind::Inner);
        assert_eq!(
            selects,
            vec![
                SelectItem::aliased(ColumnRef::new("customers", "vat"), "customers.vat"),
                SelectItem::AllOf("customers".into()),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_join_columns_are_skipped_but_join_kept() {
        let specs = vec![JoinSpec::new("customer_id", "customers", "id").select(["nope", "name"])];
        let (joins, selects) = plan_joins("orders", &specs, Vec::new(), &schema()).await;
        assert_eq!(joins.len(), 1);
        assert_eq!(
            selects,
            vec![SelectItem::aliased(ColumnRef::new("customers", "name"), "customers.name")]
        );
    }

    #[tokio::test]
    async fn joins_keep_declaration_order() {
        let specs = vec![
            JoinSpec::new("customer_id", "customers", "id").kind(JoinKind::Right),
            JoinSpec::default_owner(),
        ];
        let (joins, _) = plan_joins("orders", &specs, Vec::new(), &schema()).await;
        let tables: Vec<_> = joins.iter().map(|j| j.table.as_str()).collect();
        assert_eq!(tables, ["customers", "users"]);
        assert_eq!(joins[0].kind, JoinKind::Right);
    }

    #[tokio::test]
    async fn joined_numeric_and_enum_columns_select_as_text() {
        let specs = vec![JoinSpec::new("customer_id", "customers", "id").select(["name", "balance", "tier"])];
        let (_, selects) = plan_joins("orders", &specs, Vec::new(), &schema()).await;
        assert_eq!(
            selects,
            vec![
                SelectItem::aliased(ColumnRef::new("customers", "name"), "customers.name"),
                SelectItem::aliased_text(ColumnRef::new("customers", "balance"), "customers.balance"),
                SelectItem::aliased_text(ColumnRef::new("customers", "tier"), "customers.tier"),
            ]
        );
    }

    struct FailingSchema;

    #[async_trait]
    impl SchemaIntrospector for FailingSchema {
        async fn describe_columns(&self, _table: &str) -> Result<Vec<SchemaColumn>, AppError> {
            Err(AppError::NotFound("schema".into()))
        }

        async fn has_column(&self, _table: &str, _field: &str) -> Result<bool, AppError> {
            Err(AppError::NotFound("schema".into()))
        }
    }

    #[tokio::test]
    async fn introspection_failure_drops_join() {
        let specs = vec![JoinSpec::default_owner()];
        let (joins, selects) = plan_joins("orders", &specs, base_selects(), &FailingSchema).await;
        assert!(joins.is_empty());
        assert_eq!(selects, base_selects());
    }
}
