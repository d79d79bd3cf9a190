//! Terminal collaborators for the chess client: board rendering and the
//! operator console.

mod board;
mod console;

pub use board::render_board;
pub use console::{Console, ConsoleError, LineInput, TerminalConsole};

/// Prompt shown when it is the local player's turn.
pub const MOVE_PROMPT: &str = "Enter your move (e.g., e2-e4): ";

/// Prompt shown after the server rejected the previous move.
pub const INVALID_MOVE_PROMPT: &str = "[Invalid] Enter new move (e.g., e2-e4): ";

/// Indicator shown while the opponent is moving.
pub const WAITING_TEXT: &str = "Wait for your opponent...";
