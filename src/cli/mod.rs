//! CLI module for Nyhet.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Nyhet - News Bot over an In-Process MCP Bridge
///
/// Fetches and summarizes news for a query through an MCP tool server and
/// an LLM. The name "Nyhet" comes from the Norwegian word for "news item."
#[derive(Parser, Debug)]
#[command(name = "nyhet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for news and get LLM-polished summaries
    Search {
        /// What to search for (e.g. "rust language releases")
        query: String,

        /// Chat model to use for tool selection
        #[arg(short, long)]
        model: Option<String>,

        /// Show the raw article blocks instead of parsed records
        #[arg(long)]
        raw: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
