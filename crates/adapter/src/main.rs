//! Warpmetrics MCP server.
//!
//! Fetches the Warpmetrics interface description at startup, exposes every read-only operation
//! as an MCP tool, and serves them over stdio.

mod cli;
mod error;
mod listing;
mod logging;
mod server;

use clap::Parser;
use cli::Cli;
use error::{AdapterError, Result};
use std::process::ExitCode;
use warpmetrics_http_tools::render::Renderer;
use warpmetrics_openapi_tools::loader::load_description;
use warpmetrics_openapi_tools::runtime::OpenApiToolSource;
use warpmetrics_openapi_tools::translate::translate;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(&cli.log_level, cli.log_format) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let http = reqwest::Client::new();
    let spec = cli.spec_config();

    if cli.list_tools {
        let doc = load_description(&http, &spec).await?;
        print!("{}", listing::render_listing(&translate(&doc)));
        return Ok(());
    }

    let api = cli.api_config()?;
    let renderer = Renderer::new(&cli.skip_fields)
        .map_err(|e| AdapterError::Config(format!("invalid --skip-fields pattern: {e}")))?;

    tracing::info!("Fetching API schema...");
    let source = OpenApiToolSource::build(http, &spec, api, renderer).await?;
    tracing::info!("Loaded {} tools from API", source.catalog().len());

    server::WarpmetricsServer::new(source).serve_stdio().await
}
