//! Strictly Chess - Unified CLI
//!
//! Logs in, opens the lobby, and plays remote chess matches in the terminal.

#![warn(missing_docs)]

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use strictly_chess::{
    Authenticator, Cli, ClientConfig, Command, ConnectionArgs, Console, ExchangeError,
    LobbyController, PlayerCredential, TerminalConsole, ctrl_c, join_match, outcome_text,
};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Play { token, connection } => run_play(token, connection).await,
        Command::Login { token, connection } => run_login(token, connection).await,
        Command::Join { player, connection } => run_join(player, connection).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Loads the config file, applies CLI overrides, and starts file logging.
fn prepare(connection: ConnectionArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_or_default(&connection.config)?;
    config.apply_overrides(connection.auth_url, connection.game_url, connection.format);
    init_logging(config.log_file())?;
    info!(
        auth_url = %config.auth_url(),
        game_url = %config.game_url(),
        format = %config.snapshot_format(),
        "Client configured"
    );
    Ok(config)
}

/// Sends logs to a file so they never interleave with the board.
fn init_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Log in (prompting for the token if needed) and run the lobby.
#[instrument(skip_all)]
async fn run_play(token: Option<String>, connection: ConnectionArgs) -> Result<()> {
    let config = prepare(connection)?;

    let token = match token {
        Some(token) => token,
        None => {
            let mut console = TerminalConsole::new();
            console.read_line("Login token: ").await?
        }
    };

    let credential = Authenticator::new(config.auth_url()).login(&token).await?;
    let lobby = LobbyController::new(config, credential);
    exit_on_interrupt_timeout(lobby.run().await)
}

/// Log in once and print the player id.
#[instrument(skip_all)]
async fn run_login(token: String, connection: ConnectionArgs) -> Result<()> {
    let config = prepare(connection)?;
    let credential = Authenticator::new(config.auth_url()).login(&token).await?;
    println!("{}", credential);
    Ok(())
}

/// Play exactly one match as `player`.
#[instrument(skip(connection))]
async fn run_join(player: String, connection: ConnectionArgs) -> Result<()> {
    let config = prepare(connection)?;
    let result = join_match(
        &config,
        PlayerCredential::new(player),
        TerminalConsole::new(),
        ctrl_c(),
    )
    .await;

    let message = outcome_text(&result);
    exit_on_interrupt_timeout(result.map(|_| ()))?;
    println!("{}", message);
    Ok(())
}

/// An exchange that ignored its interrupt cannot be recovered; leave now.
fn exit_on_interrupt_timeout(result: Result<(), ExchangeError>) -> Result<()> {
    match result {
        Err(ExchangeError::InterruptTimeout) => {
            error!("Interrupt grace period elapsed, exiting");
            eprintln!("{}", ExchangeError::InterruptTimeout);
            std::process::exit(1);
        }
        other => Ok(other?),
    }
}
