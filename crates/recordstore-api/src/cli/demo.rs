//! `rstore demo` -- a guided walk through every gateway operation.
//!
//! Defines a users table, inserts a row, shows that a duplicate unique value
//! is rejected, updates and deletes the row by idx, then reads the table.

use anyhow::{Context, Result};
use console::style;

use recordstore_core::gateway::RecordGateway;
use recordstore_types::record::{Predicate, Record};
use recordstore_types::schema::{DeleteFilter, TableSchema};

use crate::cli::record::render_rows;
use crate::state::AppState;

fn step(n: u8, text: &str) {
    println!("  {} {}", style(format!("[{n}]")).dim(), text);
}

/// Run the walk-through against `table` in the selected database.
pub async fn run_demo(state: &AppState, table: &str, json: bool) -> Result<()> {
    let gateway = &state.gateway;
    let db = &state.database;

    let schema = TableSchema::new()
        .column("name", ["TEXT", "NOT NULL"])
        .column("email", ["TEXT", "UNIQUE", "NOT NULL"]);
    let record = Record::new()
        .with("name", "John Doe2")
        .with("email", "joh42n@example.com");

    if !json {
        println!();
        println!("  {} Record store walk-through on {}", style("*").bold(), style(db.display()).dim());
        println!();
    }

    gateway
        .define_table(db, table, &schema)
        .await
        .with_context(|| format!("Failed to define '{table}'"))?;
    if !json {
        step(1, &format!("table '{}' defined", style(table).cyan()));
    }

    let id = gateway
        .write(db, table, &record)
        .await
        .with_context(|| format!("Failed to write to '{table}'"))?;
    if !json {
        step(2, &format!("wrote John Doe2 -> idx {}", style(id).bold()));
    }

    let duplicate = gateway.write(db, table, &record).await;
    let duplicate_rejected = duplicate.as_ref().is_err_and(|e| e.is_unique_violation());
    if !json {
        match &duplicate {
            Err(e) => step(3, &format!("duplicate email rejected: {}", style(e).yellow())),
            Ok(other) => step(3, &format!("duplicate email unexpectedly accepted as idx {other}")),
        }
    }

    let by_id = Predicate::new().with("idx", id);
    let updated = gateway
        .update(
            db,
            table,
            &Record::new()
                .with("name", "Jane Doe1")
                .with("email", "jane@example.com"),
            &by_id,
        )
        .await
        .with_context(|| format!("Failed to update '{table}'"))?;
    if !json {
        step(4, &format!("updated {} row(s) to Jane Doe1", style(updated).bold()));
    }

    let deleted = gateway
        .delete(db, table, &DeleteFilter::Matching(by_id))
        .await
        .with_context(|| format!("Failed to delete from '{table}'"))?;
    if !json {
        step(5, &format!("deleted {} row(s)", style(deleted).bold()));
    }

    let rows = gateway
        .read(db, &format!("SELECT * FROM {table} ORDER BY idx ASC"))
        .await
        .context("Query failed")?;

    if json {
        let result = serde_json::json!({
            "table": table,
            "written_idx": id,
            "duplicate_rejected": duplicate_rejected,
            "updated": updated,
            "deleted": deleted,
            "remaining_rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    step(6, &format!("{} row(s) remain", style(rows.len()).bold()));
    if !rows.is_empty() {
        println!();
        println!("{}", render_rows(&rows));
    }
    println!();

    Ok(())
}
