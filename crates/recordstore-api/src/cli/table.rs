//! `rstore define` -- table creation.

use anyhow::{Context, Result};
use console::style;

use recordstore_core::gateway::RecordGateway;
use recordstore_types::IDENTITY_COLUMN;
use recordstore_types::schema::TableSchema;

use crate::state::AppState;

/// Create a table from a schema descriptor.
pub async fn define_table(state: &AppState, table: &str, schema: &TableSchema, json: bool) -> Result<()> {
    state
        .gateway
        .define_table(&state.database, table, schema)
        .await
        .with_context(|| format!("Failed to define table '{table}'"))?;

    if json {
        let result = serde_json::json!({
            "table": table,
            "identity": IDENTITY_COLUMN,
            "columns": schema,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Table '{}' ready in {}",
        style("ok").green(),
        style(table).cyan(),
        style(state.database.display()).dim(),
    );
    println!("     {} {}", style(IDENTITY_COLUMN).bold(), style("INTEGER PRIMARY KEY AUTOINCREMENT").dim());
    for column in schema.columns() {
        println!(
            "     {} {}",
            style(&column.name).bold(),
            style(column.constraints.join(" ")).dim()
        );
    }
    println!();

    Ok(())
}
