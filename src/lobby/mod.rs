//! Lobby: the menu a logged-in player returns to between matches.

mod controller;
mod screen;

pub use controller::LobbyController;
pub use screen::{MENU_PROMPT, ScreenTransition, menu_text, outcome_text};
