//! Match outcomes and protocol phases.

use tracing::instrument;

/// Phase of the session protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// Matching request sent, waiting for the server's answer.
    Matching,
    /// Paired with an opponent; session identity and side are known.
    Matched,
    /// Alternating moves with the opponent.
    ExchangingTurns,
    /// Absorbing: the outcome has been decided.
    Terminal,
}

/// How a match attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    /// The exchange was abandoned before reaching a result.
    Ongoing,
    /// Matchmaking timed out.
    Timeout,
    /// The player is already queueing on another connection.
    AlreadyQueued,
    /// The player is already in a game elsewhere.
    AlreadyPlaying,
    /// Matchmaking answered with a tag this client does not know.
    Unmatched(String),
    /// The game reached a terminal status (checkmate, draw, ...).
    Finished(String),
}

impl MatchOutcome {
    /// Maps a non-`matched` matchmaking tag to an outcome.
    #[instrument]
    pub fn from_match_tag(tag: &str) -> Self {
        match tag {
            "timeout" => MatchOutcome::Timeout,
            "queueing" => MatchOutcome::AlreadyQueued,
            "error" | "playing" => MatchOutcome::AlreadyPlaying,
            other => MatchOutcome::Unmatched(other.to_string()),
        }
    }

    /// Text shown to the operator once the attempt is over.
    pub fn message(&self) -> String {
        match self {
            MatchOutcome::Timeout => "Matching timeout".to_string(),
            MatchOutcome::AlreadyQueued => "You are queueing elsewhere".to_string(),
            MatchOutcome::AlreadyPlaying => "You are playing elsewhere".to_string(),
            other => format!("Game ended with {}", other),
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Ongoing => write!(f, "ongoing"),
            MatchOutcome::Timeout => write!(f, "timeout"),
            MatchOutcome::AlreadyQueued => write!(f, "queueing"),
            MatchOutcome::AlreadyPlaying => write!(f, "playing"),
            MatchOutcome::Unmatched(tag) => write!(f, "{}", tag),
            MatchOutcome::Finished(status) => write!(f, "{}", status),
        }
    }
}
