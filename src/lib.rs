//! Datagrid SDK: schema-driven column metadata and filtered/joined row queries for table grids.

pub mod case;
pub mod column;
pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;

pub use column::{map_type, resolve_columns, ColumnMetadata, FilterType, RenderType, SchemaColumn};
pub use config::{
    load_grids_from_path, parse_grids, ColumnConfig, ComparisonOperator, Condition, Connector, JoinKind,
    JoinSpec, SortDirection, SortSpec, TableSettings,
};
pub use error::{AppError, ConfigError};
pub use executor::{PgQueryExecutor, QueryExecutor};
pub use routes::{common_routes, grid_routes};
pub use schema::{PgSchemaIntrospector, SchemaIntrospector, StaticSchema};
pub use service::{BuildResult, GridData, QueryMutator, TableBuildService};
pub use sql::{plan_joins, QueryPlan, ValueCast};
pub use state::AppState;
