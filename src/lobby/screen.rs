//! Post-login menu: what it shows and how input moves it.

use crate::auth::PlayerCredential;
use crate::protocol::{ExchangeError, MatchOutcome};

/// Prompt shown under the menu.
pub const MENU_PROMPT: &str = "Select an option: ";

/// The result of handling one line of menu input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Unrecognised input; show the menu again.
    Stay,
    /// Play one match, then come back to the menu.
    JoinMatch,
    /// Leave the lobby.
    Quit,
}

impl ScreenTransition {
    /// Maps a menu selection to a transition.
    pub fn from_input(input: &str) -> Self {
        match input.trim() {
            "1" => ScreenTransition::JoinMatch,
            "2" => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}

/// Renders the menu for the logged-in player, with an optional status line
/// from the previous match.
pub fn menu_text(credential: &PlayerCredential, status: Option<&str>) -> String {
    let mut out = format!("User: {}\n\n1) Join match\n2) Logout\n", credential);
    if let Some(status) = status {
        out.push('\n');
        out.push_str(status);
        out.push('\n');
    }
    out
}

/// Status line describing how a match attempt ended.
pub fn outcome_text(result: &Result<MatchOutcome, ExchangeError>) -> String {
    match result {
        Ok(outcome) => outcome.message(),
        Err(e) => format!("Match failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_input() {
        assert_eq!(ScreenTransition::from_input("1"), ScreenTransition::JoinMatch);
        assert_eq!(ScreenTransition::from_input(" 2 "), ScreenTransition::Quit);
        assert_eq!(ScreenTransition::from_input("3"), ScreenTransition::Stay);
        assert_eq!(ScreenTransition::from_input(""), ScreenTransition::Stay);
    }

    #[test]
    fn test_menu_text_shows_user_and_status() {
        let credential = PlayerCredential::new("did:privy:abc");
        let text = menu_text(&credential, Some("Matching timeout"));
        assert!(text.starts_with("User: did:privy:abc\n"));
        assert!(text.contains("1) Join match"));
        assert!(text.contains("2) Logout"));
        assert!(text.ends_with("Matching timeout\n"));

        let plain = menu_text(&credential, None);
        assert!(!plain.contains("Matching"));
    }

    #[test]
    fn test_outcome_text() {
        assert_eq!(
            outcome_text(&Ok(MatchOutcome::AlreadyQueued)),
            "You are queueing elsewhere"
        );
        assert_eq!(
            outcome_text(&Ok(MatchOutcome::Finished("CHECKMATE".to_string()))),
            "Game ended with CHECKMATE"
        );
        assert!(outcome_text(&Err(ExchangeError::InterruptTimeout)).starts_with("Match failed"));
    }
}
