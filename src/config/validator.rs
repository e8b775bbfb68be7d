//! Settings validation: required table, identifier shape, page length.

use crate::config::TableSettings;
use crate::error::ConfigError;
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"));

/// True when `s` is a plain SQL identifier (letters, digits, underscore; no leading digit).
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

fn check_identifier(kind: &'static str, value: &str) -> Result<(), ConfigError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}

/// Validate everything that ends up in SQL as an identifier.
/// Column and join fields are additionally checked against the live schema at build time.
pub fn validate(settings: &TableSettings) -> Result<(), ConfigError> {
    if settings.table.trim().is_empty() {
        return Err(ConfigError::MissingTable);
    }
    check_identifier("table", &settings.table)?;
    if settings.page_length == 0 {
        return Err(ConfigError::Validation("page_length must be positive".into()));
    }

    for join in &settings.joins {
        check_identifier("table", &join.related_table)?;
        check_identifier("column", &join.field)?;
        check_identifier("column", &join.related_field)?;
    }

    if let Some(sort) = &settings.sort {
        let parts: Vec<&str> = sort.field.split('.').collect();
        if parts.len() > 2 {
            return Err(ConfigError::InvalidIdentifier {
                kind: "sort",
                value: sort.field.clone(),
            });
        }
        for part in parts {
            check_identifier("sort", part)?;
        }
    }

    Ok(())
}
