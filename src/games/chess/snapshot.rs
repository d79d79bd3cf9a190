//! Game state snapshots and the formats they arrive in.
//!
//! Deployments of the game server report state either as a structured
//! 8x8 grid or as a FEN string. Both decode into the same [`Snapshot`],
//! so the protocol loop never depends on the wire representation.

use super::board::{BOARD_SIZE, Board, Side};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

/// Status string the server uses while a game is running.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Whether a game is still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Moves are still being exchanged.
    Active,
    /// Game ended; holds the server's reason (checkmate, draw, ...).
    Terminal(String),
}

impl Status {
    /// Parses the server's status string.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case(ACTIVE_STATUS) {
            Status::Active
        } else {
            Status::Terminal(raw.to_string())
        }
    }

    /// Returns true while the game is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Active)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "{}", ACTIVE_STATUS),
            Status::Terminal(reason) => write!(f, "{}", reason),
        }
    }
}

/// Authoritative board + turn + status as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct Snapshot {
    /// Piece placement.
    board: Board,
    /// True when White moves next.
    white_to_move: bool,
    /// Running or terminal.
    status: Status,
}

impl Snapshot {
    /// Returns the side that moves next.
    pub fn side_to_move(&self) -> Side {
        Side::from_is_white(self.white_to_move)
    }

    /// Returns true when `side` is the one to move.
    pub fn is_turn_of(&self, side: Side) -> bool {
        self.side_to_move() == side
    }
}

/// A wire representation of game state that decodes into a [`Snapshot`].
pub trait SnapshotFormat: DeserializeOwned + Send + 'static {
    /// Decodes the wire value into board, turn and status.
    fn decode(&self) -> Result<Snapshot, SnapshotError>;
}

/// Which [`SnapshotFormat`] the server speaks.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SnapshotKind {
    /// Structured 8x8 grid with explicit turn flag.
    #[default]
    Grid,
    /// FEN position string.
    Fen,
}

/// Structured grid representation: `board[file][rank]`, empty string for
/// an empty square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    /// Piece symbols by file then rank.
    pub board: [[String; BOARD_SIZE]; BOARD_SIZE],
    /// True when White moves next.
    pub is_white_turn: bool,
    /// Game status string.
    pub status: String,
}

impl SnapshotFormat for GridState {
    fn decode(&self) -> Result<Snapshot, SnapshotError> {
        let mut board = Board::new();
        for (file, column) in self.board.iter().enumerate() {
            for (rank, symbol) in column.iter().enumerate() {
                let symbol = symbol.trim();
                if !symbol.is_empty() {
                    board
                        .set(file, rank, Some(symbol.to_string()))
                        .map_err(SnapshotError::new)?;
                }
            }
        }
        Ok(Snapshot::new(board, self.is_white_turn, Status::parse(&self.status)))
    }
}

/// Compact representation: a FEN string plus the status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenState {
    /// Forsyth-Edwards Notation of the position.
    pub fen: String,
    /// Game status string.
    pub status: String,
}

impl SnapshotFormat for FenState {
    fn decode(&self) -> Result<Snapshot, SnapshotError> {
        let (board, white_to_move) = parse_fen(&self.fen)?;
        Ok(Snapshot::new(board, white_to_move, Status::parse(&self.status)))
    }
}

/// Parses the placement and active-colour fields of a FEN string.
#[instrument]
pub fn parse_fen(fen: &str) -> Result<(Board, bool), SnapshotError> {
    let mut fields = fen.split_whitespace();
    let placement = fields
        .next()
        .ok_or_else(|| SnapshotError::new("Empty FEN string"))?;
    let active = fields
        .next()
        .ok_or_else(|| SnapshotError::new(format!("FEN has no active colour: {}", fen)))?;

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_SIZE {
        return Err(SnapshotError::new(format!(
            "FEN placement has {} ranks, expected {}",
            rows.len(),
            BOARD_SIZE
        )));
    }

    let mut board = Board::new();
    // FEN lists rank 8 first.
    for (row, text) in rows.iter().enumerate() {
        let rank = BOARD_SIZE - 1 - row;
        let mut file = 0usize;
        for c in text.chars() {
            match c {
                '1'..='8' => file += c as usize - '0' as usize,
                'p' | 'n' | 'b' | 'r' | 'q' | 'k' | 'P' | 'N' | 'B' | 'R' | 'Q' | 'K' => {
                    if file >= BOARD_SIZE {
                        return Err(SnapshotError::new(format!(
                            "FEN rank {} overflows the board",
                            rank + 1
                        )));
                    }
                    board
                        .set(file, rank, Some(c.to_string()))
                        .map_err(SnapshotError::new)?;
                    file += 1;
                }
                other => {
                    return Err(SnapshotError::new(format!(
                        "Unexpected character {:?} in FEN placement",
                        other
                    )));
                }
            }
        }
        if file != BOARD_SIZE {
            return Err(SnapshotError::new(format!(
                "FEN rank {} describes {} files",
                rank + 1,
                file
            )));
        }
    }

    let white_to_move = match active {
        "w" => true,
        "b" => false,
        other => {
            return Err(SnapshotError::new(format!(
                "Unknown FEN active colour {:?}",
                other
            )));
        }
    };

    Ok((board, white_to_move))
}

/// Snapshot decoding error.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Snapshot error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
