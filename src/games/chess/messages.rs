//! Wire envelopes exchanged with the game server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::PlayerCredential;

/// Action requesting matchmaking.
pub const ACTION_MATCHING: &str = "matching";
/// Action submitting a move.
pub const ACTION_MOVE: &str = "move";
/// Response tag for a successful match.
pub const TAG_MATCHED: &str = "matched";
/// Response tag for an authoritative session update.
pub const TAG_SESSION: &str = "session";

/// Opaque session identity issued by the server once a match exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a raw session identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outbound envelope: a tagged action with a free-form data payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Action name.
    pub action: String,
    /// Action payload.
    pub data: Map<String, Value>,
}

impl OutboundMessage {
    /// Builds a matchmaking request.
    pub fn matching(credential: &PlayerCredential) -> Self {
        let mut data = Map::new();
        data.insert(
            "player_privy_did".to_string(),
            Value::String(credential.as_str().to_string()),
        );
        Self {
            action: ACTION_MATCHING.to_string(),
            data,
        }
    }

    /// Builds a move submission carrying the operator's raw text.
    pub fn play_move(session_id: &SessionId, credential: &PlayerCredential, text: &str) -> Self {
        let mut data = Map::new();
        data.insert(
            "session_id".to_string(),
            Value::String(session_id.as_str().to_string()),
        );
        data.insert(
            "player_privy_did".to_string(),
            Value::String(credential.as_str().to_string()),
        );
        data.insert("move".to_string(), Value::String(text.to_string()));
        Self {
            action: ACTION_MOVE.to_string(),
            data,
        }
    }
}

/// The local player's assignment within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// True when the local player moves first.
    pub is_white_side: bool,
}

/// First response after a matching request.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse<F> {
    /// `matched`, or the reason no match was made.
    #[serde(rename = "type")]
    pub kind: String,
    /// Present once matched.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Initial snapshot once matched.
    #[serde(default = "Option::default")]
    pub game_state: Option<F>,
    /// Side assignment once matched.
    #[serde(default)]
    pub player_state: Option<PlayerState>,
}

impl<F> MatchResponse<F> {
    /// Returns true when the server paired us with an opponent.
    pub fn is_matched(&self) -> bool {
        self.kind == TAG_MATCHED
    }
}

/// Every response after the match: a new snapshot or a rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse<F> {
    /// `session` for accepted moves, anything else for a rejection.
    #[serde(rename = "type")]
    pub kind: String,
    /// New snapshot; usually absent on rejections.
    #[serde(default = "Option::default")]
    pub game_state: Option<F>,
}

impl<F> SessionResponse<F> {
    /// Returns true when the response carries an authoritative snapshot.
    pub fn is_session(&self) -> bool {
        self.kind == TAG_SESSION
    }
}
