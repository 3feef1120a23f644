//! Status command: configuration and per-table row counts.

use anyhow::{Context, Result};
use console::style;

use recordstore_core::gateway::RecordGateway;
use recordstore_core::ident::validate_identifier;
use recordstore_types::value::Value;

use crate::state::AppState;

const LIST_TABLES: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// Display configuration, the resolved database, and its tables.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let exists = tokio::fs::try_exists(&state.database).await.unwrap_or(false);

    // Reading a missing file would create it; only inspect existing databases.
    let mut tables: Vec<(String, i64)> = Vec::new();
    if exists {
        let rows = state
            .gateway
            .read(&state.database, LIST_TABLES)
            .await
            .context("Failed to list tables")?;

        for row in rows {
            let Some(name) = row.get("name").and_then(Value::as_text) else {
                continue;
            };
            // Only count tables whose names can be interpolated safely.
            if validate_identifier(name).is_err() {
                continue;
            }
            let count = state
                .gateway
                .read(&state.database, &format!("SELECT COUNT(*) AS n FROM {name}"))
                .await
                .with_context(|| format!("Failed to count rows in '{name}'"))?
                .first()
                .and_then(|r| r.get("n").and_then(Value::as_integer))
                .unwrap_or(0);
            tables.push((name.to_string(), count));
        }
    }

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": state.database.display().to_string(),
            "exists": exists,
            "busy_timeout_secs": state.config.busy_timeout_secs,
            "create_if_missing": state.config.create_if_missing,
            "tables": tables
                .iter()
                .map(|(name, rows)| serde_json::json!({ "name": name, "rows": rows }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} rstore v{}", style("*").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Tables ──").dim());
    if !exists {
        println!("  {}", style("(database not created yet)").dim());
    } else if tables.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for (name, rows) in &tables {
        println!("  {:<20} {} row(s)", style(name).cyan(), style(rows).bold());
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:     {}", style(state.data_dir.display()).dim());
    println!("  Database:     {}", style(state.database.display()).dim());
    println!("  Busy timeout: {}s", state.config.busy_timeout_secs);
    println!();

    Ok(())
}
