//! Command-line interface for xiangqi_client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Xiangqi Client - play against a rules server from the terminal
#[derive(Parser, Debug)]
#[command(name = "xiangqi_client")]
#[command(about = "Terminal client for a server-authoritative xiangqi game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Game API base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive board
    Play,

    /// Print the current board and exit
    Show,

    /// Reset the game to the starting position
    Reset,

    /// Undo the last move
    Undo,

    /// List legal destinations for the piece at a point
    Moves {
        /// Column, 0-8 from the left
        x: u8,

        /// Row, 0-9 from the top
        y: u8,
    },
}
