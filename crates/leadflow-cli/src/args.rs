use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{LeadCommands, StatusCommands};

/// Lead status workflow and audit tool
///
/// Leadflow keeps a configurable catalog of lead statuses, moves leads
/// between them with per-status field validation, and records every change
/// in an append-only activity log. It runs as a command-line tool or as an
/// MCP (Model Context Protocol) server.
#[derive(Parser)]
#[command(version, about, name = "leadflow")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/leadflow/leadflow.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// User id recorded as the actor of every change
    #[arg(long, global = true, default_value = "cli")]
    pub actor: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// - `status`: author the status catalog
/// - `lead`: create, move, transfer and inspect leads
/// - `serve`: start the MCP server
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the status catalog
    #[command(alias = "st")]
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },
    /// Manage leads
    #[command(alias = "l")]
    Lead {
        #[command(subcommand)]
        command: LeadCommands,
    },
    /// Start the MCP server
    Serve,
}
