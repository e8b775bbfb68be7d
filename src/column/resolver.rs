//! Merge caller overrides with mapper defaults into the grid's column list.

use super::mapper::map_type;
use super::types::{ColumnMetadata, FilterType, RenderType, SchemaColumn};
use crate::case::humanize;
use crate::config::{ColumnConfig, TableSettings};
use std::collections::HashSet;

/// Hands out unique column orders. Explicit orders are hints: a value already taken is
/// replaced by the smallest unused positive integer.
#[derive(Debug, Default)]
struct OrderAllocator {
    next: u32,
    used: HashSet<u32>,
}

impl OrderAllocator {
    fn allocate(&mut self, explicit: Option<u32>) -> u32 {
        let candidate = match explicit {
            Some(order) => order,
            None => {
                let n = self.next;
                self.next += 1;
                n
            }
        };
        let order = if self.used.contains(&candidate) {
            (1..).find(|n| !self.used.contains(n)).unwrap_or(candidate)
        } else {
            candidate
        };
        self.used.insert(order);
        order
    }
}

fn title_for(field: &str, settings: &TableSettings) -> String {
    settings
        .rename_columns
        .iter()
        .find(|(f, _)| f == field)
        .map(|(_, title)| title.clone())
        .unwrap_or_else(|| humanize(field))
}

fn types_for(column: &SchemaColumn, settings: &TableSettings) -> (RenderType, FilterType) {
    let (mapped_render, mapped_filter) = map_type(&column.raw_type);
    let render = settings
        .column_types
        .iter()
        .find(|(f, _)| *f == column.field)
        .map(|(_, t)| *t)
        .unwrap_or(mapped_render);
    let filter = settings
        .column_filters
        .iter()
        .find(|(f, _)| *f == column.field)
        .map(|(_, t)| *t)
        .unwrap_or(mapped_filter);
    (render, filter)
}

/// Whitelist derived from the schema when no columns are configured.
fn configs_for<'a>(
    schema: &[SchemaColumn],
    settings: &'a TableSettings,
) -> std::borrow::Cow<'a, [ColumnConfig]> {
    match &settings.selected_columns {
        Some(cols) => std::borrow::Cow::Borrowed(cols.as_slice()),
        None => std::borrow::Cow::Owned(
            schema.iter().map(|c| ColumnConfig::new(c.field.clone())).collect(),
        ),
    }
}

/// Resolve display metadata for every configured column, in schema order.
/// Schema columns without a config entry are left out; config entries naming no schema
/// column never match and so are dropped.
pub fn resolve_columns(schema: &[SchemaColumn], settings: &TableSettings) -> Vec<ColumnMetadata> {
    let configs = configs_for(schema, settings);
    let mut orders = OrderAllocator::default();
    let mut out = Vec::new();
    for column in schema {
        let Some(config) = configs.iter().find(|c| c.data == column.field) else {
            continue;
        };
        let (render_type, filter_type) = types_for(column, settings);
        out.push(ColumnMetadata {
            title: title_for(&column.field, settings),
            data: column.field.clone(),
            visible: config.visible,
            render_type,
            filter_type,
            order: orders.allocate(config.order),
        });
    }
    let known: HashSet<&str> = schema.iter().map(|c| c.field.as_str()).collect();
    for config in configs.iter().filter(|c| !known.contains(c.data.as_str())) {
        tracing::debug!(table = %settings.table, field = %config.data, "skipping unknown column");
    }
    out
}
