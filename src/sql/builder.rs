//! Renders a query plan as a parameterized PostgreSQL SELECT.

use crate::config::{ComparisonOperator, Connector};
use crate::sql::{ColumnRef, Predicate, QueryPlan, SelectItem, ValueCast};
use serde_json::Value;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified(c: &ColumnRef) -> String {
    format!("{}.{}", quoted(&c.table), quoted(&c.column))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn select_item(item: &SelectItem) -> String {
    match item {
        SelectItem::AllOf(table) => format!("{}.*", quoted(table)),
        SelectItem::Column { column, alias, as_text } => {
            let expr = if *as_text {
                format!("{}::text", qualified(column))
            } else {
                qualified(column)
            };
            match alias {
                Some(a) => format!("{} AS {}", expr, quoted(a)),
                None => expr,
            }
        }
    }
}

/// One predicate without its connector. Null compares as IS [NOT] NULL and is never
/// ordered or matched otherwise. Pattern operators always compare text.
fn predicate(q: &mut QueryBuf, p: &Predicate) -> String {
    let col = qualified(&p.column);
    match (&p.value, p.op) {
        (Value::Null, ComparisonOperator::Eq) => format!("{} IS NULL", col),
        (Value::Null, ComparisonOperator::Ne | ComparisonOperator::NotEq) => {
            format!("{} IS NOT NULL", col)
        }
        (Value::Null, _) => "FALSE".to_string(),
        (v, op) => {
            let n = q.push_param(v.clone());
            let pattern = matches!(
                op,
                ComparisonOperator::Like | ComparisonOperator::NotLike | ComparisonOperator::ILike
            );
            match &p.cast {
                ValueCast::Text => format!("{}::text {} ${}::text", col, op.as_sql(), n),
                ValueCast::As(_) if pattern => {
                    format!("{}::text {} ${}::text", col, op.as_sql(), n)
                }
                ValueCast::As(ty) => format!("{} {} ${}::{}", col, op.as_sql(), n, ty),
                ValueCast::Untyped if v.is_string() => {
                    format!("{}::text {} ${}", col, op.as_sql(), n)
                }
                ValueCast::Untyped => format!("{} {} ${}", col, op.as_sql(), n),
            }
        }
    }
}

/// `SELECT .. FROM base [JOIN ..] [WHERE ..] [ORDER BY ..]`. Predicates are chained flat in
/// declaration order; the first one's connector is ignored.
pub fn select_plan(plan: &QueryPlan) -> QueryBuf {
    let mut q = QueryBuf::new();

    let cols = if plan.selects.is_empty() {
        format!("{}.*", quoted(&plan.base_table))
    } else {
        plan.selects.iter().map(select_item).collect::<Vec<_>>().join(", ")
    };

    let joins: String = plan
        .joins
        .iter()
        .map(|j| {
            format!(
                " {} {} ON {} = {}",
                j.kind.as_sql(),
                quoted(&j.table),
                qualified(&j.left),
                qualified(&j.right)
            )
        })
        .collect();

    let mut where_clause = String::new();
    for (i, p) in plan.predicates.iter().enumerate() {
        let cond = predicate(&mut q, p);
        if i == 0 {
            where_clause.push_str(" WHERE ");
        } else {
            where_clause.push_str(match p.connector {
                Connector::Where => " AND ",
                Connector::OrWhere => " OR ",
            });
        }
        where_clause.push_str(&cond);
    }

    let order_clause = plan
        .order_by
        .as_ref()
        .map(|o| format!(" ORDER BY {} {}", qualified(&o.column), o.direction.as_sql()))
        .unwrap_or_default();

    q.sql = format!(
        "SELECT {} FROM {}{}{}{}",
        cols,
        quoted(&plan.base_table),
        joins,
        where_clause,
        order_clause
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JoinKind, SortDirection};
    use crate::sql::JoinClause;
    use serde_json::json;

    #[test]
    fn renders_bare_table() {
        let q = select_plan(&QueryPlan::new("orders", 10));
        assert_eq!(q.sql, r#"SELECT "orders".* FROM "orders""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn renders_full_plan() {
        let plan = QueryPlan::new("orders", 10);
        let id = plan.base_column("id");
        let status = plan.base_column("status");
        let total = plan.base_column("total");
        let plan = plan
            .select([
                SelectItem::column(id.clone()),
                SelectItem::text(total.clone()),
                SelectItem::aliased(ColumnRef::new("users", "name"), "users.name"),
                SelectItem::AllOf("customers".into()),
            ])
            .join(JoinClause {
                kind: JoinKind::Left,
                table: "users".into(),
                left: ColumnRef::new("orders", "owner_id"),
                right: ColumnRef::new("users", "rec_id"),
            })
            .where_(status.clone(), ComparisonOperator::Eq, "open")
            .or_where(total, ComparisonOperator::Ge, 100)
            .where_(status, ComparisonOperator::Ne, Value::Null)
            .order_by(id, SortDirection::Desc);
        let q = select_plan(&plan);
        assert_eq!(
            q.sql,
            concat!(
                r#"SELECT "orders"."id", "orders"."total"::text AS "total", "users"."name" AS "users.name", "customers".* "#,
                r#"FROM "orders" LEFT JOIN "users" ON "orders"."owner_id" = "users"."rec_id" "#,
                r#"WHERE "orders"."status"::text = $1 OR "orders"."total" >= $2 AND "orders"."status" IS NOT NULL "#,
                r#"ORDER BY "orders"."id" DESC"#
            )
        );
        assert_eq!(q.params, vec![json!("open"), json!(100)]);
    }

    #[test]
    fn first_connector_is_ignored() {
        let plan = QueryPlan::new("t", 10);
        let a = plan.base_column("a");
        let plan = plan.or_where(a, ComparisonOperator::Eq, Value::Null);
        let q = select_plan(&plan);
        assert_eq!(q.sql, r#"SELECT "t".* FROM "t" WHERE "t"."a" IS NULL"#);
    }

    #[test]
    fn identifiers_are_quoted() {
        let plan = QueryPlan::new("we\"ird", 10);
        let q = select_plan(&plan);
        assert_eq!(q.sql, r#"SELECT "we""ird".* FROM "we""ird""#);
    }

    #[test]
    fn null_with_ordering_or_pattern_never_matches() {
        let plan = QueryPlan::new("orders", 10);
        let id = plan.base_column("id");
        let status = plan.base_column("status");
        let plan = plan
            .where_(id, ComparisonOperator::Lt, Value::Null)
            .or_where(status, ComparisonOperator::Like, Value::Null);
        let q = select_plan(&plan);
        assert_eq!(q.sql, r#"SELECT "orders".* FROM "orders" WHERE FALSE OR FALSE"#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn typed_predicates_cast_the_value() {
        let plan = QueryPlan::new("orders", 10);
        let total = plan.base_column("total");
        let status = plan.base_column("status");
        let plan = plan
            .filter_as(
                Connector::Where,
                total.clone(),
                ComparisonOperator::Gt,
                "100",
                ValueCast::As("numeric(10,2)".into()),
            )
            .filter_as(Connector::Where, status, ComparisonOperator::Eq, "open", ValueCast::Text)
            .filter_as(
                Connector::OrWhere,
                total,
                ComparisonOperator::Like,
                "9%",
                ValueCast::As("numeric".into()),
            );
        let q = select_plan(&plan);
        assert_eq!(
            q.sql,
            concat!(
                r#"SELECT "orders".* FROM "orders" WHERE "orders"."total" > $1::numeric(10,2) "#,
                r#"AND "orders"."status"::text = $2::text OR "orders"."total"::text LIKE $3::text"#
            )
        );
        assert_eq!(q.params, vec![json!("100"), json!("open"), json!("9%")]);
    }
}
