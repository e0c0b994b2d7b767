//! Command-line interface definition for cruisesim
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat, a one-shot ask and the offline name
//! preview.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cruisesim - design cruise ships with Captain Block
///
/// Chat with the captain and get blocky or real-life renders of the ships
/// you describe.
#[derive(Parser, Debug, Clone)]
#[command(name = "cruisesim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for cruisesim
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat with the captain
    Chat {
        /// Override the provider from config (gemini)
        #[arg(short, long)]
        provider: Option<String>,

        /// Start without the captain's greeting
        #[arg(long)]
        no_greeting: bool,
    },

    /// Send a single prompt and print the reply
    Ask {
        /// Prompt to send
        #[arg(short, long)]
        prompt: String,

        /// Directory to save a generated ship image into
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Override the provider from config (gemini)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Preview the ship name, image trigger and style for a prompt (offline)
    Name {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Prompt words
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
