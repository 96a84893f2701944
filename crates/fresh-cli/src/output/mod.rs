use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Lists of objects become one row per item. A single object becomes
/// `field`/`value` rows, with nested objects such as a stored record
/// flattened to dotted field names.
fn render_table(value: &Value) -> anyhow::Result<String> {
    let options = table::TableOptions::from_env();
    let rendered = match value {
        Value::Array(items) if items.is_empty() => String::from("(no rows)"),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let headers = union_keys(items.iter().filter_map(Value::as_object));
            let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
            let rows = items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| {
                    headers
                        .iter()
                        .map(|header| item.get(header).map_or_else(|| String::from("-"), cell))
                        .collect::<Vec<String>>()
                })
                .collect::<Vec<_>>();
            table::render_entity_table(&header_refs, &rows, options)
        }
        Value::Array(items) => {
            let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
            table::render_entity_table(&["value"], &rows, options)
        }
        Value::Object(fields) => {
            let mut rows = Vec::new();
            flatten("", fields, &mut rows);
            table::render_entity_table(&["field", "value"], &rows, options)
        }
        scalar => table::render_entity_table(&["value"], &[vec![cell(scalar)]], options),
    };
    Ok(rendered)
}

fn union_keys<'a>(objects: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<String> {
    let mut keys = Vec::<String>::new();
    for object in objects {
        for key in object.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

fn flatten(prefix: &str, fields: &Map<String, Value>, rows: &mut Vec<Vec<String>>) {
    for (key, value) in fields {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) if !is_string_map(nested) => flatten(&name, nested, rows),
            other => rows.push(vec![name, cell(other)]),
        }
    }
}

/// Parameter maps: every value a string.
fn is_string_map(fields: &Map<String, Value>) -> bool {
    fields.values().all(Value::is_string)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(v) => v.clone(),
        Value::Object(fields) if is_string_map(fields) => fields
            .iter()
            .map(|(key, value)| format!("{key}={}", value.as_str().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
