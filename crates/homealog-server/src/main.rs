//! CLI entry point for the Home-Alog inventory graph.
//!
//! `serve` (the default) speaks MCP over stdio, so all logging goes to stderr.
//! `call` runs a single action and prints its JSON outcome to stdout.

use clap::{Parser, Subcommand};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use homealog_graph::{Action, GraphOperations, GraphStore, Neo4jStore};
use homealog_server::{prepare_schema, HomealogConfig, HomealogMcp};

#[derive(Parser)]
#[command(name = "homealog")]
#[command(about = "Home inventory knowledge graph over Neo4j")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file prefix (default: homealog).
    #[arg(short, long, default_value = "homealog", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the inventory tools over MCP on stdio.
    Serve,
    /// Create the uniqueness constraints and exit.
    InitSchema,
    /// Run one action and print its outcome as JSON.
    Call {
        /// Action name, e.g. create_item or list_locations.
        action: String,
        /// JSON arguments (read from stdin when omitted).
        arguments: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let cfg = HomealogConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg).await?,
        Command::InitSchema => {
            let store = Neo4jStore::connect(cfg.neo4j).await?;
            store.initialize_constraints().await?;
        }
        Command::Call { action, arguments } => {
            let raw = match arguments {
                Some(raw) => raw,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let arguments = if raw.trim().is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_str(&raw)?
            };
            let action = Action::parse(&action, arguments)?;

            let ops = GraphOperations::from_config(cfg.neo4j);
            let outcome = ops.dispatch(action).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

async fn serve(cfg: HomealogConfig) -> anyhow::Result<()> {
    tracing::info!(name = %cfg.server.name, uri = %cfg.neo4j.uri, "Home-Alog MCP server starting");

    let ops = GraphOperations::from_config(cfg.neo4j);
    prepare_schema(ops.store(), &cfg.server).await?;

    let mcp = HomealogMcp::new(ops, cfg.server.name);
    let service = mcp.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
