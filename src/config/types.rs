//! Grid settings as accepted from callers and JSON config files.

use crate::column::{FilterType, RenderType};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker in a join's `select` list meaning every column of the related table.
pub const WILDCARD: &str = "*";

fn default_true() -> bool {
    true
}

fn default_page_length() -> u32 {
    10
}

/// Per-request grid configuration. Consumed by exactly one build.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableSettings {
    pub table: String,
    #[serde(default = "default_page_length")]
    pub page_length: u32,
    /// `(field, title)` pairs; first match wins.
    #[serde(default)]
    pub rename_columns: Vec<(String, String)>,
    #[serde(default)]
    pub column_types: Vec<(String, RenderType)>,
    #[serde(default)]
    pub column_filters: Vec<(String, FilterType)>,
    /// Whitelist and per-column config. `None` selects every schema column.
    #[serde(default)]
    pub selected_columns: Option<Vec<ColumnConfig>>,
    /// Joins applied after the default owner join.
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    #[serde(default = "default_true")]
    pub default_join: bool,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl TableSettings {
    pub fn new(table: impl Into<String>) -> Result<Self, ConfigError> {
        let settings = TableSettings {
            table: table.into(),
            page_length: default_page_length(),
            rename_columns: Vec::new(),
            column_types: Vec::new(),
            column_filters: Vec::new(),
            selected_columns: None,
            joins: Vec::new(),
            default_join: true,
            sort: None,
        };
        super::validate(&settings)?;
        Ok(settings)
    }

    pub fn with_page_length(mut self, page_length: u32) -> Self {
        self.page_length = page_length;
        self
    }

    pub fn rename(mut self, field: impl Into<String>, title: impl Into<String>) -> Self {
        self.rename_columns.push((field.into(), title.into()));
        self
    }

    pub fn column_type(mut self, field: impl Into<String>, render: RenderType) -> Self {
        self.column_types.push((field.into(), render));
        self
    }

    pub fn column_filter(mut self, field: impl Into<String>, filter: FilterType) -> Self {
        self.column_filters.push((field.into(), filter));
        self
    }

    pub fn select(mut self, column: ColumnConfig) -> Self {
        self.selected_columns.get_or_insert_with(Vec::new).push(column);
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn without_default_join(mut self) -> Self {
        self.default_join = false;
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            field: field.into(),
            direction,
        });
        self
    }

    /// Default owner join (when enabled) followed by the configured joins.
    pub fn effective_joins(&self) -> Vec<JoinSpec> {
        let mut joins = Vec::with_capacity(self.joins.len() + 1);
        if self.default_join {
            joins.push(JoinSpec::default_owner());
        }
        joins.extend(self.joins.iter().cloned());
        joins
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Base table field this entry configures.
    pub data: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ColumnConfig {
    pub fn new(data: impl Into<String>) -> Self {
        ColumnConfig {
            data: data.into(),
            visible: true,
            order: None,
            conditions: Vec::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// `[operator, comparison, value]`, e.g. `["where", ">=", 10]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition(pub Connector, pub ComparisonOperator, pub Value);

impl Condition {
    pub fn where_(op: ComparisonOperator, value: impl Into<Value>) -> Self {
        Condition(Connector::Where, op, value.into())
    }

    pub fn or_where(op: ComparisonOperator, value: impl Into<Value>) -> Self {
        Condition(Connector::OrWhere, op, value.into())
    }
}

/// How a predicate attaches to the ones before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    #[serde(rename = "where")]
    Where,
    #[serde(rename = "orWhere")]
    OrWhere,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<>")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "like", alias = "LIKE")]
    Like,
    #[serde(rename = "not like", alias = "NOT LIKE")]
    NotLike,
    #[serde(rename = "ilike", alias = "ILIKE")]
    ILike,
}

impl ComparisonOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::NotEq => "<>",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::NotLike => "NOT LIKE",
            ComparisonOperator::ILike => "ILIKE",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
}

/// `left` and `right` pass through; anything else joins as inner.
impl From<&str> for JoinKind {
    fn from(s: &str) -> Self {
        match s {
            "left" => JoinKind::Left,
            "right" => JoinKind::Right,
            _ => JoinKind::Inner,
        }
    }
}

impl From<Option<String>> for JoinKind {
    fn from(s: Option<String>) -> Self {
        s.as_deref().map(JoinKind::from).unwrap_or_default()
    }
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Field on the base table.
    pub field: String,
    #[serde(default, rename = "type")]
    pub kind: JoinKind,
    pub related_table: String,
    pub related_field: String,
    /// Related columns to surface; `"*"` selects all of them.
    #[serde(default)]
    pub select: Vec<String>,
}

impl JoinSpec {
    pub fn new(
        field: impl Into<String>,
        related_table: impl Into<String>,
        related_field: impl Into<String>,
    ) -> Self {
        JoinSpec {
            field: field.into(),
            kind: JoinKind::Inner,
            related_table: related_table.into(),
            related_field: related_field.into(),
            select: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Record owner: `owner_id` -> `users.rec_id`, surfacing the owner's name and email.
    pub fn default_owner() -> Self {
        JoinSpec::new("owner_id", "users", "rec_id")
            .kind(JoinKind::Left)
            .select(["name", "email"])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Base table field, or `table.field` for a joined column.
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}
