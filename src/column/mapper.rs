//! Raw database type string -> (render type, filter type).

use super::types::{FilterType, RenderType};

/// Map a raw column type (e.g. `int(11)`, `varchar(255)`, `enum('a','b')`) to grid types.
///
/// Checks are case-sensitive substring matches evaluated in a fixed order; the first hit wins.
/// The integer check runs before the boolean check, so `tinyint(1)` reports as a number, and
/// `timestamp` is caught by the `time` check before the `timestamp` one.
pub fn map_type(raw: &str) -> (RenderType, FilterType) {
    if raw.contains("int") {
        (RenderType::Number, FilterType::Number)
    } else if raw.contains("varchar") || raw.contains("text") {
        (RenderType::Text, FilterType::Text)
    } else if raw.contains("datetime") {
        (RenderType::DateTime, FilterType::DateTime)
    } else if raw.contains("date") {
        (RenderType::Date, FilterType::Date)
    } else if raw.contains("time") {
        (RenderType::Time, FilterType::Time)
    } else if raw.contains("timestamp") {
        (RenderType::DateTime, FilterType::DateTime)
    } else if raw.contains("decimal") || raw.contains("float") || raw.contains("double") {
        (RenderType::Number, FilterType::Number)
    } else if raw.contains("boolean") || raw.contains("tinyint(1)") {
        (RenderType::Boolean, FilterType::Text)
    } else if raw.contains("enum") {
        (RenderType::Select, FilterType::MultiSelect)
    } else if raw.contains("json") {
        (RenderType::Json, FilterType::Text)
    } else {
        (RenderType::Text, FilterType::Text)
    }
}
