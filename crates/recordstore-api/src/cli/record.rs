//! Record subcommands: write, read, update, delete.
//!
//! Each command runs exactly one gateway call against the selected database
//! file and prints the outcome as styled text or JSON.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use recordstore_core::gateway::RecordGateway;
use recordstore_types::error::{ContractViolation, GatewayError};
use recordstore_types::record::{Predicate, Record, Row};
use recordstore_types::schema::DeleteFilter;
use recordstore_types::value::Value;

use crate::state::AppState;

/// Insert a record and print the assigned identity.
pub async fn write_record(state: &AppState, table: &str, record: &Record, json: bool) -> Result<()> {
    let id = state
        .gateway
        .write(&state.database, table, record)
        .await
        .with_context(|| format!("Failed to write to '{table}'"))?;

    if json {
        println!("{}", serde_json::json!({ "table": table, "idx": id }));
    } else {
        println!();
        println!(
            "  {} New row in '{}' with idx {}",
            style("+").green().bold(),
            style(table).cyan(),
            style(id).bold(),
        );
        println!();
    }

    Ok(())
}

/// Run a query and print the rows.
pub async fn read_rows(state: &AppState, query: &str, json: bool) -> Result<()> {
    let rows = state
        .gateway
        .read(&state.database, query)
        .await
        .context("Query failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!("  {} No rows.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", render_rows(&rows));
    println!("  {} row(s)", style(rows.len()).bold());
    println!();

    Ok(())
}

/// Update matching rows and print the affected count.
pub async fn update_records(
    state: &AppState,
    table: &str,
    set: &Record,
    predicate: &Predicate,
    json: bool,
) -> Result<()> {
    let changes = state
        .gateway
        .update(&state.database, table, set, predicate)
        .await
        .with_context(|| format!("Failed to update '{table}'"))?;

    if json {
        println!("{}", serde_json::json!({ "table": table, "updated": changes }));
    } else {
        println!();
        println!(
            "  {} {} row(s) updated in '{}'",
            style("ok").green(),
            style(changes).bold(),
            style(table).cyan(),
        );
        println!();
    }

    Ok(())
}

/// Delete matching rows, or every row with `--all` after confirmation.
pub async fn delete_records(
    state: &AppState,
    table: &str,
    predicate: Predicate,
    all: bool,
    force: bool,
    json: bool,
) -> Result<()> {
    let filter = if all {
        if !force && !json {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Delete every row in '{}'?",
                    style(table).red().bold()
                ))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("  Cancelled.");
                return Ok(());
            }
        }
        DeleteFilter::AllRows
    } else {
        DeleteFilter::Matching(predicate)
    };

    let changes = match state.gateway.delete(&state.database, table, &filter).await {
        Ok(changes) => changes,
        Err(GatewayError::Contract(ContractViolation::UnconfirmedDeleteAll(_))) => {
            anyhow::bail!("No --where condition given; pass --all to delete every row in '{table}'")
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to delete from '{table}'")),
    };

    if json {
        println!("{}", serde_json::json!({ "table": table, "deleted": changes }));
    } else {
        println!();
        println!(
            "  {} {} row(s) deleted from '{}'",
            style("x").red().bold(),
            style(changes).bold(),
            style(table).cyan(),
        );
        println!();
    }

    Ok(())
}

/// Render rows as a table, using the first row's columns as the header.
pub fn render_rows(rows: &[Row]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if let Some(first) = rows.first() {
        table.set_header(
            first
                .columns()
                .map(|c| Cell::new(c).fg(Color::White))
                .collect::<Vec<_>>(),
        );
    }

    for row in rows {
        table.add_row(
            row.values()
                .map(|value| match value {
                    Value::Null => Cell::new("NULL").fg(Color::DarkGrey),
                    Value::Integer(_) | Value::Real(_) => Cell::new(value).fg(Color::Cyan),
                    _ => Cell::new(value),
                })
                .collect::<Vec<_>>(),
        );
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows() {
        let rows = vec![
            Row::new().with("idx", 1).with("name", "John Doe2").with("note", Value::Null),
            Row::new().with("idx", 2).with("name", "Jane").with("note", "hi"),
        ];
        let rendered = render_rows(&rows).to_string();
        assert!(rendered.contains("idx"));
        assert!(rendered.contains("John Doe2"));
        assert!(rendered.contains("NULL"));
    }
}
