//! fhir-filter - command-line front end for `_filter` expressions
//!
//! Usage:
//!   fhir-filter extract "item.linkId eq F_001 and item.answer.valueInteger gt 3" --pretty
//!   fhir-filter parse "not (name co smi)" --debug
//!   fhir-filter --config filter.toml identifying "name=smith&gender=male"

use anyhow::Context;
use clap::Parser;
use commands::Commands;
use fhir_filter::{extract, Engine, ExtractOptions};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "fhir-filter", version, about = "Parse FHIR-style _filter expressions")]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_json);

    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(
        operators = config.compare_operators.len(),
        identifying_fields = config.identifying_fields.len(),
        max_depth = config.max_depth,
        "Configuration loaded"
    );
    let engine = Engine::new(config);

    let output = run(&engine, cli.command)?;
    println!("{output}");

    Ok(())
}

/// Execute one subcommand and return what it prints
///
/// A filter that does not parse is an error, which makes the process exit
/// with status 1.
fn run(engine: &Engine, command: Commands) -> anyhow::Result<String> {
    match command {
        Commands::Tokens { filter } => Ok(engine
            .tokenize(&filter)
            .iter()
            .map(|token| {
                format!(
                    "{:?}\t{}\t{}",
                    token.token_type, token.value, token.position
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        Commands::Parse { filter, debug } => {
            let expr = engine
                .try_parse(&filter)
                .with_context(|| format!("Invalid filter: {filter}"))?;
            if debug {
                Ok(format!("{expr:#?}"))
            } else {
                Ok(expr.to_string())
            }
        }
        Commands::Extract {
            filter,
            omit_eq,
            pretty,
        } => {
            let expr = engine
                .try_parse(&filter)
                .with_context(|| format!("Invalid filter: {filter}"))?;
            let options = ExtractOptions {
                omit_operator_eq: omit_eq,
            };
            let filters = extract::extract(&expr, &options);
            tracing::info!(params = filters.len(), "Extracted filter parameters");

            let json = if pretty {
                serde_json::to_string_pretty(&filters)?
            } else {
                serde_json::to_string(&filters)?
            };
            Ok(json)
        }
        Commands::Identifying { query } => Ok(engine.is_identifying(&query).to_string()),
    }
}
