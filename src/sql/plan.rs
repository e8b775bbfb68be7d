//! Query plan value: accumulated joins, selects, predicates and sort for one build.
//! Every method consumes the plan and returns the extended one.

use crate::column::{map_type, RenderType, SchemaColumn};
use crate::config::{ComparisonOperator, Connector, JoinKind, SortDirection};
use serde_json::Value;

/// Types without a native JSON decoding (numeric, enums) are selected as text.
pub fn selects_as_text(raw_type: &str) -> bool {
    raw_type.contains("decimal") || raw_type.contains("enum")
}

/// `table.column`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }

    /// `table.column` as a plain string (used for join-column aliases).
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectItem {
    Column {
        column: ColumnRef,
        alias: Option<String>,
        /// Render as `col::text` so values without a native JSON mapping (numeric, enums) survive.
        as_text: bool,
    },
    /// `table.*`
    AllOf(String),
}

impl SelectItem {
    pub fn column(column: ColumnRef) -> Self {
        SelectItem::Column {
            column,
            alias: None,
            as_text: false,
        }
    }

    pub fn aliased(column: ColumnRef, alias: impl Into<String>) -> Self {
        SelectItem::Column {
            column,
            alias: Some(alias.into()),
            as_text: false,
        }
    }

    /// `table.column::text AS column`.
    pub fn text(column: ColumnRef) -> Self {
        let alias = column.column.clone();
        Self::aliased_text(column, alias)
    }

    pub fn aliased_text(column: ColumnRef, alias: impl Into<String>) -> Self {
        SelectItem::Column {
            column,
            alias: Some(alias.into()),
            as_text: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// How a bound value meets its column in a predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ValueCast {
    /// Column type unknown: strings compare against `col::text`, other values bind as-is.
    #[default]
    Untyped,
    /// `col::text OP $n::text`.
    Text,
    /// `col OP $n::<type>`.
    As(String),
}

impl ValueCast {
    /// Text-like and enum columns compare as text; everything else casts the value to the
    /// column's type, falling back to a type matching its render type.
    pub fn for_column(column: &SchemaColumn) -> Self {
        let fallback = match map_type(&column.raw_type).0 {
            RenderType::Text | RenderType::Select | RenderType::Json => return ValueCast::Text,
            RenderType::Number => "numeric",
            RenderType::Date => "date",
            RenderType::DateTime => "timestamp",
            RenderType::Time => "time",
            RenderType::Boolean => "boolean",
        };
        ValueCast::As(column.sql_type.clone().unwrap_or_else(|| fallback.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub connector: Connector,
    pub column: ColumnRef,
    pub op: ComparisonOperator,
    pub value: Value,
    pub cast: ValueCast,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: SortDirection,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryPlan {
    pub base_table: String,
    pub joins: Vec<JoinClause>,
    pub selects: Vec<SelectItem>,
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
    /// Client paging hint; not rendered as LIMIT.
    pub page_length: u32,
}

impl QueryPlan {
    pub fn new(base_table: impl Into<String>, page_length: u32) -> Self {
        QueryPlan {
            base_table: base_table.into(),
            joins: Vec::new(),
            selects: Vec::new(),
            predicates: Vec::new(),
            order_by: None,
            page_length,
        }
    }

    pub fn select(mut self, items: impl IntoIterator<Item = SelectItem>) -> Self {
        self.selects.extend(items);
        self
    }

    pub fn join(mut self, clause: JoinClause) -> Self {
        self.joins.push(clause);
        self
    }

    pub fn joins(self, clauses: impl IntoIterator<Item = JoinClause>) -> Self {
        clauses.into_iter().fold(self, QueryPlan::join)
    }

    pub fn filter(
        self,
        connector: Connector,
        column: ColumnRef,
        op: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Self {
        self.filter_as(connector, column, op, value, ValueCast::Untyped)
    }

    /// Like [`QueryPlan::filter`], with the value cast chosen by the caller.
    pub fn filter_as(
        mut self,
        connector: Connector,
        column: ColumnRef,
        op: ComparisonOperator,
        value: impl Into<Value>,
        cast: ValueCast,
    ) -> Self {
        self.predicates.push(Predicate {
            connector,
            column,
            op,
            value: value.into(),
            cast,
        });
        self
    }

    pub fn where_(self, column: ColumnRef, op: ComparisonOperator, value: impl Into<Value>) -> Self {
        self.filter(Connector::Where, column, op, value)
    }

    pub fn or_where(self, column: ColumnRef, op: ComparisonOperator, value: impl Into<Value>) -> Self {
        self.filter(Connector::OrWhere, column, op, value)
    }

    /// Replaces any earlier ordering.
    pub fn order_by(mut self, column: ColumnRef, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy { column, direction });
        self
    }

    /// Column on the base table.
    pub fn base_column(&self, column: impl Into<String>) -> ColumnRef {
        ColumnRef::new(self.base_table.clone(), column)
    }
}
