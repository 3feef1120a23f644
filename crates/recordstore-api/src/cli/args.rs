//! Parsers for `column=value` and `name:CONSTRAINTS` arguments.

use recordstore_types::record::ColumnValues;
use recordstore_types::schema::{ColumnDef, TableSchema};
use recordstore_types::value::Value;

/// Parse `column=value`. The value follows [`Value::parse_loose`]:
/// JSON scalars are honoured, anything else is text.
pub fn parse_assignment(input: &str) -> Result<(String, Value), String> {
    let (column, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{input}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{input}'"));
    }
    Ok((column.to_string(), Value::parse_loose(value)))
}

/// Parse `name:CONSTRAINT CONSTRAINT ...`; constraints are optional.
pub fn parse_column(input: &str) -> Result<ColumnDef, String> {
    let (name, constraints) = input.split_once(':').unwrap_or((input, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing column name in '{input}'"));
    }
    Ok(ColumnDef {
        name: name.to_string(),
        constraints: constraints.split_whitespace().map(str::to_string).collect(),
    })
}

pub fn to_column_values(pairs: Vec<(String, Value)>) -> ColumnValues {
    pairs.into_iter().collect()
}

/// Build a schema from `--column` flags or a `--schema` JSON object.
pub fn to_schema(columns: Vec<ColumnDef>, json: Option<&str>) -> anyhow::Result<TableSchema> {
    if let Some(json) = json {
        return Ok(serde_json::from_str(json)?);
    }
    let mut schema = TableSchema::new();
    for column in columns {
        schema.push(column);
    }
    Ok(schema)
}
