//! Load named grid settings from a JSON file.

use crate::config::{validate, TableSettings};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Schema searched by the PostgreSQL introspector. From env `DATAGRID_SCHEMA`, default `public`.
pub fn datagrid_schema() -> String {
    std::env::var("DATAGRID_SCHEMA").unwrap_or_else(|_| "public".into())
}

/// Parse `{ "grid_id": { ...TableSettings } }` and validate every grid.
pub fn parse_grids(json: &str) -> Result<HashMap<String, TableSettings>, ConfigError> {
    let grids: HashMap<String, TableSettings> =
        serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    for (id, settings) in &grids {
        validate(settings).map_err(|e| ConfigError::Load(format!("grid '{}': {}", id, e)))?;
    }
    Ok(grids)
}

/// Read and parse a grids file (see [`parse_grids`]).
pub async fn load_grids_from_path(
    path: impl AsRef<Path>,
) -> Result<HashMap<String, TableSettings>, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let grids = parse_grids(&raw)?;
    tracing::info!(path = %path.display(), count = grids.len(), "loaded grid settings");
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_grids() {
        let grids = parse_grids(
            r#"{
                "orders": { "table": "orders", "page_length": 50 },
                "customers": { "table": "customers", "default_join": false }
            }"#,
        )
        .unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids["orders"].page_length, 50);
        assert!(!grids["customers"].default_join);
    }

    #[test]
    fn invalid_grid_names_the_grid() {
        let err = parse_grids(r#"{ "bad": { "table": "" } }"#).unwrap_err();
        assert!(err.to_string().contains("grid 'bad'"));
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(parse_grids("{"), Err(ConfigError::Load(_))));
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let err = load_grids_from_path("/nonexistent/grids.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
