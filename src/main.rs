use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use abstract_search_mcp::config::{self, Config};
use abstract_search_mcp::mcp::McpServer;
use abstract_search_mcp::sources::{
    AbstractProvider, AbstractSelector, CrossrefProvider, PaperAssembler, PubMedProvider,
    ScopusSource,
};

/// Abstract Search MCP - keyword paper search with multi-registry abstract enrichment
#[derive(Parser, Debug)]
#[command(name = "abstract-search-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for paper search with abstract enrichment", long_about = None)]
struct Cli {
    /// Configuration file consulted before the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!();
            eprintln!("{}", config::missing_key_instructions());
            std::process::exit(1);
        }
    };

    let search = ScopusSource::new(config.scopus_api_key)?;
    let providers: Vec<Arc<dyn AbstractProvider>> = vec![
        Arc::new(CrossrefProvider::new()?),
        Arc::new(PubMedProvider::new()?),
    ];

    let assembler = PaperAssembler::new(Arc::new(search), AbstractSelector::new(providers));

    tracing::info!(version = abstract_search_mcp::VERSION, "starting stdio session");
    McpServer::new(assembler).run().await
}

/// Diagnostics go to stderr; stdout is reserved for protocol output.
fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
