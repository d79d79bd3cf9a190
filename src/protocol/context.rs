//! Per-attempt session context, threaded through the exchange and
//! returned by value when it ends.

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use super::outcome::{MatchOutcome, Phase};
use crate::auth::PlayerCredential;
use crate::games::chess::{SessionId, Side};

/// State owned by one match attempt.
#[derive(Debug, Clone, Getters)]
pub struct MatchContext {
    /// Who is playing.
    credential: PlayerCredential,
    /// Current protocol phase.
    phase: Phase,
    /// Assigned once matched.
    session_id: Option<SessionId>,
    /// Assigned once matched; fixed for the match.
    side: Option<Side>,
    /// Set exactly once, when the exchange ends.
    outcome: Option<MatchOutcome>,
    /// Number of `move` actions written.
    moves_sent: usize,
}

impl MatchContext {
    /// Creates an empty context in the [`Phase::Matching`] phase.
    pub fn new(credential: PlayerCredential) -> Self {
        Self {
            credential,
            phase: Phase::Matching,
            session_id: None,
            side: None,
            outcome: None,
            moves_sent: 0,
        }
    }

    /// Moves to `phase` unless the context is already terminal.
    #[instrument(skip(self), fields(from = %self.phase))]
    pub fn enter(&mut self, phase: Phase) {
        if self.phase == Phase::Terminal {
            warn!(to = %phase, "Ignoring transition out of terminal phase");
            return;
        }
        debug!(to = %phase, "Phase transition");
        self.phase = phase;
    }

    /// Records the session identity and side handed out at match time.
    ///
    /// Returns false (and changes nothing) if a match was already assigned.
    pub fn assign_match(&mut self, session_id: SessionId, side: Side) -> bool {
        if self.session_id.is_some() {
            warn!(session_id = %session_id, "Match already assigned");
            return false;
        }
        info!(session_id = %session_id, side = %side, "Match assigned");
        self.session_id = Some(session_id);
        self.side = Some(side);
        true
    }

    /// Sets the outcome and enters [`Phase::Terminal`].
    ///
    /// The first outcome wins; returns false if one was already set.
    #[instrument(skip(self))]
    pub fn conclude(&mut self, outcome: MatchOutcome) -> bool {
        if let Some(existing) = &self.outcome {
            warn!(existing = %existing, "Outcome already set, keeping it");
            return false;
        }
        info!(outcome = %outcome, "Match concluded");
        self.outcome = Some(outcome);
        self.phase = Phase::Terminal;
        true
    }

    pub(crate) fn record_move_sent(&mut self) {
        self.moves_sent += 1;
    }

    /// Consumes the context, yielding the outcome ([`MatchOutcome::Ongoing`]
    /// if none was reached).
    pub fn into_outcome(self) -> MatchOutcome {
        self.outcome.unwrap_or(MatchOutcome::Ongoing)
    }
}
