//! Leadflow CLI Application
//!
//! Command-line and MCP front end for the lead status workflow engine.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use leadflow_core::{params::ListLeads, PipelineBuilder};
use log::info;
use mcp::{run_stdio_server, LeadflowMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        actor,
        command,
    } = Args::parse();

    let pipeline = PipelineBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize pipeline")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Leadflow started");

    match command {
        Some(Status { command }) => {
            Cli::new(pipeline, renderer, actor)
                .handle_status_command(command)
                .await
        }
        Some(Lead { command }) => {
            Cli::new(pipeline, renderer, actor)
                .handle_lead_command(command)
                .await
        }
        Some(Serve) => {
            info!("Starting Leadflow MCP server");
            run_stdio_server(LeadflowMcpServer::new(pipeline))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(pipeline, renderer, actor)
                .list_leads(&ListLeads::default())
                .await
        }
    }
}
