//! Render/filter vocabulary shared by the mapper, the resolver and settings overrides.

use serde::{Deserialize, Serialize};

/// How the grid displays a column's values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    Text,
    Number,
    Date,
    DateTime,
    Time,
    Boolean,
    Select,
    Json,
}

/// Which filter control the grid offers for a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Text,
    Number,
    Date,
    DateTime,
    Time,
    Select,
    MultiSelect,
}

/// Column description handed to the front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub title: String,
    /// Source field on the base table.
    pub data: String,
    pub visible: bool,
    #[serde(rename = "type")]
    pub render_type: RenderType,
    #[serde(rename = "typefilter")]
    pub filter_type: FilterType,
    pub order: u32,
}

/// One column as reported by schema introspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaColumn {
    pub field: String,
    /// Type name in the mapper's vocabulary.
    pub raw_type: String,
    /// The database's own spelling of the type, usable in a cast.
    pub sql_type: Option<String>,
}

impl SchemaColumn {
    pub fn new(field: impl Into<String>, raw_type: impl Into<String>) -> Self {
        SchemaColumn {
            field: field.into(),
            raw_type: raw_type.into(),
            sql_type: None,
        }
    }

    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }
}
