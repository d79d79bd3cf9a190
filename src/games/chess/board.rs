//! Core board types for chess snapshots.
//!
//! The client never evaluates chess rules, so a board is nothing more
//! than the piece symbols the server reported for each square.

use serde::{Deserialize, Serialize};

/// Number of files (and ranks) on a chess board.
pub const BOARD_SIZE: usize = 8;

/// Side of the board a player controls.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// White (moves first).
    White,
    /// Black (moves second).
    Black,
}

impl Side {
    /// Builds a side from the server's `is_white_*` flags.
    pub fn from_is_white(is_white: bool) -> Self {
        if is_white { Side::White } else { Side::Black }
    }
}

/// 8x8 grid of piece symbols, indexed `[file][rank]` from a1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<String>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the piece symbol at `file` (0 = a) and `rank` (0 = 1).
    pub fn get(&self, file: usize, rank: usize) -> Option<&str> {
        self.squares.get(file)?.get(rank)?.as_deref()
    }

    /// Places a piece symbol, or clears the square with `None`.
    pub fn set(
        &mut self,
        file: usize,
        rank: usize,
        piece: Option<String>,
    ) -> Result<(), &'static str> {
        let square = self
            .squares
            .get_mut(file)
            .and_then(|column| column.get_mut(rank))
            .ok_or("Square out of bounds")?;
        *square = piece;
        Ok(())
    }
}
