//! Shared helpers for protocol and coordinator tests.

#![allow(dead_code)]

pub mod ws_server;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use strictly_chess::{BOARD_SIZE, Console, ConsoleError, parse_fen};

/// Starting position in FEN.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Position after 1. e4.
pub const AFTER_E4_FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";

/// Something the exchange did to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Clear,
    Show(String),
    Prompt(String),
}

/// Console fed from a fixed list of input lines.
///
/// Once the script runs out it either fails or blocks forever, the latter
/// standing in for an operator who never presses enter.
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    events: Arc<Mutex<Vec<ConsoleEvent>>>,
    hang_when_empty: bool,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> (Self, ConsoleLog)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let events = Arc::new(Mutex::new(Vec::new()));
        let console = Self {
            lines: lines.into_iter().map(Into::into).collect(),
            events: events.clone(),
            hang_when_empty: false,
        };
        (console, ConsoleLog { events })
    }

    /// A console whose operator never types anything.
    pub fn silent() -> (Self, ConsoleLog) {
        let (mut console, log) = Self::new(Vec::<String>::new());
        console.hang_when_empty = true;
        (console, log)
    }

    fn record(&self, event: ConsoleEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    fn clear(&mut self) {
        self.record(ConsoleEvent::Clear);
    }

    fn show(&mut self, text: &str) {
        self.record(ConsoleEvent::Show(text.to_string()));
    }

    async fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.record(ConsoleEvent::Prompt(prompt.to_string()));
        match self.lines.pop_front() {
            Some(line) => Ok(line),
            None if self.hang_when_empty => std::future::pending().await,
            None => Err(ConsoleError::new("script exhausted")),
        }
    }
}

/// Read side of a [`ScriptedConsole`]'s event record.
#[derive(Clone)]
pub struct ConsoleLog {
    events: Arc<Mutex<Vec<ConsoleEvent>>>,
}

impl ConsoleLog {
    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ConsoleEvent::Prompt(prompt) => Some(prompt),
                _ => None,
            })
            .collect()
    }

    pub fn shown(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ConsoleEvent::Show(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Rendered boards, recognised by their top border.
    pub fn boards(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter(|text| text.starts_with("  +"))
            .collect()
    }
}

/// Builds a grid snapshot (`board[file][rank]`) from a FEN placement.
pub fn grid_state(fen: &str, status: &str) -> Value {
    let (board, white_to_move) = parse_fen(fen).unwrap();
    let squares: Vec<Vec<String>> = (0..BOARD_SIZE)
        .map(|file| {
            (0..BOARD_SIZE)
                .map(|rank| board.get(file, rank).unwrap_or("").to_string())
                .collect()
        })
        .collect();
    json!({
        "board": squares,
        "is_white_turn": white_to_move,
        "status": status,
    })
}

/// Builds a FEN snapshot.
pub fn fen_state(fen: &str, status: &str) -> Value {
    json!({ "fen": fen, "status": status })
}

/// A `matched` response for session `S1`.
pub fn matched(game_state: Value, is_white_side: bool) -> Value {
    json!({
        "type": "matched",
        "session_id": "S1",
        "game_state": game_state,
        "player_state": { "is_white_side": is_white_side },
    })
}

/// A `session` response carrying a new snapshot.
pub fn session(game_state: Value) -> Value {
    json!({ "type": "session", "game_state": game_state })
}

/// The move message the client should send as `P1` in session `S1`.
pub fn move_message(text: &str) -> Value {
    json!({
        "action": "move",
        "data": { "session_id": "S1", "player_privy_did": "P1", "move": text },
    })
}
