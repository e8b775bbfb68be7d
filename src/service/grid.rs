//! Grid build pipeline: settings -> columns + query plan -> rows.

use crate::column::{resolve_columns, ColumnMetadata, SchemaColumn};
use crate::config::{validate, TableSettings};
use crate::error::{AppError, ConfigError};
use crate::executor::{PgQueryExecutor, QueryExecutor};
use crate::schema::{PgSchemaIntrospector, SchemaIntrospector};
use crate::sql::{plan_joins, selects_as_text, ColumnRef, QueryPlan, SelectItem, ValueCast};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

/// Caller hook for ad hoc plan changes, applied after column conditions and before sort.
pub type QueryMutator = Box<dyn FnOnce(QueryPlan) -> QueryPlan + Send>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    pub columns: Vec<ColumnMetadata>,
    pub data: Vec<Value>,
    pub page_length: u32,
}

/// Either `{columns, data, pageLength}` or `{error}`.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum BuildResult {
    Success(GridData),
    Failure { error: String },
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success(_))
    }
}

/// Prepared build: resolved columns and the plan ready for execution.
#[derive(Clone, Debug)]
pub struct PreparedGrid {
    pub columns: Vec<ColumnMetadata>,
    pub plan: QueryPlan,
}

fn sort_column(plan: &QueryPlan, field: &str) -> ColumnRef {
    match field.split_once('.') {
        Some((table, column)) => ColumnRef::new(table, column),
        None => plan.base_column(field),
    }
}

/// Resolve columns and assemble the query plan for `settings`. Does not execute anything.
pub async fn prepare(
    settings: &TableSettings,
    introspector: &dyn SchemaIntrospector,
    mutator: Option<QueryMutator>,
) -> Result<PreparedGrid, AppError> {
    validate(settings)?;
    let schema: Vec<SchemaColumn> = introspector.describe_columns(&settings.table).await?;
    if schema.is_empty() {
        return Err(AppError::NotFound(format!("table '{}'", settings.table)));
    }

    let columns = resolve_columns(&schema, settings);
    let plan = QueryPlan::new(settings.table.clone(), settings.page_length);

    let base_selects: Vec<SelectItem> = columns
        .iter()
        .map(|c| {
            let column = plan.base_column(c.data.clone());
            let raw = schema
                .iter()
                .find(|s| s.field == c.data)
                .map(|s| s.raw_type.as_str())
                .unwrap_or("");
            if selects_as_text(raw) {
                SelectItem::text(column)
            } else {
                SelectItem::column(column)
            }
        })
        .collect();

    let (joins, selects) =
        plan_joins(&settings.table, &settings.effective_joins(), base_selects, introspector).await;
    let mut plan = plan.select(selects).joins(joins);

    if let Some(configs) = &settings.selected_columns {
        for config in configs {
            let Some(described) = schema.iter().find(|s| s.field == config.data) else {
                continue;
            };
            let cast = ValueCast::for_column(described);
            for condition in &config.conditions {
                let column = plan.base_column(config.data.clone());
                let value = condition.2.clone();
                plan = plan.filter_as(condition.0, column, condition.1, value, cast.clone());
            }
        }
    }

    if let Some(mutate) = mutator {
        plan = mutate(plan);
    }

    if let Some(sort) = &settings.sort {
        let column = sort_column(&plan, &sort.field);
        plan = plan.order_by(column, sort.direction);
    }

    Ok(PreparedGrid { columns, plan })
}

/// Builds one grid response. Configure once, build once.
pub struct TableBuildService {
    introspector: Arc<dyn SchemaIntrospector>,
    executor: Arc<dyn QueryExecutor>,
    settings: Option<TableSettings>,
}

impl TableBuildService {
    pub fn new(introspector: Arc<dyn SchemaIntrospector>, executor: Arc<dyn QueryExecutor>) -> Self {
        TableBuildService {
            introspector,
            executor,
            settings: None,
        }
    }

    /// PostgreSQL introspection and execution over one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgSchemaIntrospector::new(pool.clone())),
            Arc::new(PgQueryExecutor::new(pool)),
        )
    }

    pub fn configure(&mut self, settings: TableSettings) -> &mut Self {
        self.settings = Some(settings);
        self
    }

    /// Run the pipeline. Failures are logged and returned as [`BuildResult::Failure`].
    pub async fn build(&mut self, mutator: Option<QueryMutator>) -> BuildResult {
        let table = self.settings.as_ref().map(|s| s.table.clone()).unwrap_or_default();
        match self.try_build(mutator).await {
            Ok(grid) => BuildResult::Success(grid),
            Err(e) => {
                tracing::error!(table = %table, error = %e, "grid build failed");
                BuildResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_build(&mut self, mutator: Option<QueryMutator>) -> Result<GridData, AppError> {
        let settings = self.settings.take().ok_or(ConfigError::NotConfigured)?;
        let prepared = prepare(&settings, self.introspector.as_ref(), mutator).await?;
        let data = self.executor.fetch_all(&prepared.plan).await?;
        Ok(GridData {
            columns: prepared.columns,
            data,
            page_length: prepared.plan.page_length,
        })
    }
}
