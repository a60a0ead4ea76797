//! Schemaless records as returned by the backend API.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::domain::resource::ColumnFormat;

pub type Record = Map<String, Value>;

/// One page of records plus the page count reported by the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub items: Vec<Record>,
    /// `None` when the API omitted `meta.totalPage`.
    pub total_pages: Option<usize>,
}

/// Follows a dotted path such as `department.name` through nested objects.
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(record.get(first)?, |value, segment| value.get(segment))
}

/// Identifier of `record` under `key`, stringified.
pub fn record_id(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Text shown in a table cell.
pub fn display_value(value: &Value, format: ColumnFormat) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => match format {
            ColumnFormat::Date => format_date(s),
            ColumnFormat::Text => s.clone(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| display_value(item, format))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        // Referenced entities usually carry a display name.
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("title"))
            .map(|inner| display_value(inner, format))
            .unwrap_or_default(),
    }
}

/// Cell text for `path` in `record`.
pub fn cell(record: &Record, path: &str, format: ColumnFormat) -> String {
    lookup(record, path)
        .map(|value| display_value(value, format))
        .unwrap_or_default()
}

/// Calendar date of an ISO timestamp; unparseable input is returned unchanged.
fn format_date(raw: &str) -> String {
    const DATE: &str = "%Y-%m-%d";

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format(DATE).to_string();
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return timestamp.format(DATE).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE) {
        return date.format(DATE).to_string();
    }
    raw.to_string()
}
