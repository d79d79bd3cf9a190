//! Command-line interface for strictly_chess.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::games::chess::SnapshotKind;

/// Strictly Chess - terminal client for remote chess matches
#[derive(Parser, Debug)]
#[command(name = "strictly_chess")]
#[command(about = "Terminal client for turn-based remote chess", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and open the lobby
    Play {
        /// Login token; prompted for when omitted
        #[arg(long, env = "STRICTLY_CHESS_TOKEN")]
        token: Option<String>,

        /// Config file and endpoint overrides
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Log in once and print the player id
    Login {
        /// Login token
        #[arg(long, env = "STRICTLY_CHESS_TOKEN")]
        token: String,

        /// Config file and endpoint overrides
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Play a single match with a known player id, skipping login
    Join {
        /// Player id issued by the login service
        #[arg(long)]
        player: String,

        /// Config file and endpoint overrides
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to the client config file
    #[arg(short, long, default_value = "strictly_chess.toml")]
    pub config: PathBuf,

    /// Override the login endpoint
    #[arg(long)]
    pub auth_url: Option<String>,

    /// Override the game server endpoint
    #[arg(long)]
    pub game_url: Option<String>,

    /// Override the snapshot format spoken by the server
    #[arg(long, value_enum)]
    pub format: Option<SnapshotKind>,
}
