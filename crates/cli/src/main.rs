use crate::{
    config::{LoadedSchema, SchemaConfig},
    error::CliError,
};
use clap::Parser;
use commands::Commands;
use fql_syntax::Lexer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "fql", version = "0.1.0", about = "Filter query language tool")]
struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    // Initialize logger
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Tokens { query } => {
            for token in Lexer::new(&query) {
                println!("{:>4}  {:<8} {}", token.position, token.kind.to_string(), token);
            }
        }
        Commands::Ast { query, output } => {
            let conjunction = fql_syntax::parse(&query)?;
            output::emit(&conjunction, output).await?;
        }
        Commands::Sql {
            schema,
            query,
            output,
        } => {
            let loaded = load_schema(&schema).await?.build()?;
            let condition = loaded.schema().bind(&query)?.to_sql_condition()?;
            info!("Rendered {} value(s) for query {:?}", condition.values().len(), query);
            output::emit(&condition, output).await?;
        }
        Commands::Match {
            schema,
            records,
            query,
            output,
        } => {
            let loaded = load_schema(&schema).await?.build()?;
            let matched = match_records(&loaded, &records, &query).await?;
            output::emit(&matched, output).await?;
        }
    }

    Ok(())
}

async fn load_schema(path: &str) -> Result<SchemaConfig, CliError> {
    debug!("Loading schema from {}", path);
    let source = tokio::fs::read_to_string(path).await?;
    let config = serde_json::from_str(&source)?;
    Ok(config)
}

async fn match_records(
    loaded: &LoadedSchema,
    path: &str,
    query: &str,
) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&source)?;
    let total = objects.len();

    let matched = loaded.select(query, objects)?;
    info!("Matched {} of {} record(s)", matched.len(), total);
    Ok(matched)
}
