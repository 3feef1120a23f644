//! Record store CLI entry point.
//!
//! Binary name: `rstore`
//!
//! Parses CLI arguments, resolves the configuration and target database file,
//! then dispatches to the command handler for the requested gateway operation.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,recordstore_infra=debug",
        _ => "trace",
    };
    recordstore_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Gateway calls are cooperative tasks on a single thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli));

    recordstore_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "rstore", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.db.as_deref()).await?;

    match cli.command {
        Commands::Define {
            table,
            columns,
            schema,
        } => {
            let schema = cli::args::to_schema(columns, schema.as_deref())?;
            cli::table::define_table(&state, &table, &schema, cli.json).await?;
        }

        Commands::Write { table, set } => {
            let record = cli::args::to_column_values(set);
            cli::record::write_record(&state, &table, &record, cli.json).await?;
        }

        Commands::Read { query } => {
            cli::record::read_rows(&state, &query, cli.json).await?;
        }

        Commands::Update { table, set, filter } => {
            let set = cli::args::to_column_values(set);
            let predicate = cli::args::to_column_values(filter);
            cli::record::update_records(&state, &table, &set, &predicate, cli.json).await?;
        }

        Commands::Delete {
            table,
            filter,
            all,
            force,
        } => {
            let predicate = cli::args::to_column_values(filter);
            cli::record::delete_records(&state, &table, predicate, all, force, cli.json).await?;
        }

        Commands::Demo { table } => {
            cli::demo::run_demo(&state, &table, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
