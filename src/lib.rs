//! Strictly Chess library - terminal client for remote chess matches
//!
//! This library authenticates a player, requests matchmaking over a
//! WebSocket, and drives the turn-taking protocol until the game ends.
//!
//! # Architecture
//!
//! - **Transport**: one message-oriented WebSocket session per match
//! - **Protocol**: matchmaking and strict turn alternation, following
//!   the server's snapshots
//! - **Coordinator**: runs a match while watching for Ctrl-C, with a
//!   bounded shutdown grace period
//! - **Lobby**: the menu between matches
//!
//! # Example
//!
//! ```no_run
//! use strictly_chess::{ClientConfig, PlayerCredential, TerminalConsole, ctrl_c, join_match};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let outcome = join_match(
//!     &config,
//!     PlayerCredential::new("did:privy:example"),
//!     TerminalConsole::new(),
//!     ctrl_c(),
//! )
//! .await?;
//! println!("{}", outcome.message());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod auth;
mod cli;
mod client_config;
mod coordinator;
mod games;
mod lobby;
mod protocol;
mod transport;
mod tui;

// Crate-level exports - Authentication
pub use auth::{AuthError, Authenticator, PlayerCredential};

// Crate-level exports - CLI
pub use cli::{Cli, Command, ConnectionArgs};

// Crate-level exports - Configuration
pub use client_config::{ClientConfig, ConfigError};

// Crate-level exports - Interrupt coordination
pub use coordinator::{Coordinator, DEFAULT_GRACE, ctrl_c, join_match};

// Crate-level exports - Chess types
pub use games::chess::{
    ACTION_MATCHING, ACTION_MOVE, ACTIVE_STATUS, BOARD_SIZE, Board, FenState, GridState,
    MatchResponse, OutboundMessage, PlayerState, SessionId, SessionResponse, Side, Snapshot,
    SnapshotError, SnapshotFormat, SnapshotKind, Status, TAG_MATCHED, TAG_SESSION, parse_fen,
};

// Crate-level exports - Lobby
pub use lobby::{LobbyController, MENU_PROMPT, ScreenTransition, menu_text, outcome_text};

// Crate-level exports - Protocol
pub use protocol::{ExchangeError, MatchContext, MatchExchange, MatchOutcome, Phase};

// Crate-level exports - Transport
pub use transport::{
    CLOSE_LINGER, CloseHandle, DEFAULT_HANDSHAKE_TIMEOUT, FRAME_BUFFER, Frame, Peer, Session,
    TransportError, TransportErrorKind,
};

// Crate-level exports - Terminal
pub use tui::{
    Console, ConsoleError, INVALID_MOVE_PROMPT, LineInput, MOVE_PROMPT, TerminalConsole,
    WAITING_TEXT, render_board,
};
