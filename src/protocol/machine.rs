//! The match exchange: matchmaking followed by strict turn alternation.

use std::marker::PhantomData;

use tracing::{debug, info, instrument, warn};

use super::context::MatchContext;
use super::error::ExchangeError;
use super::outcome::{MatchOutcome, Phase};
use crate::auth::PlayerCredential;
use crate::games::chess::{
    MatchResponse, OutboundMessage, SessionId, SessionResponse, Side, Snapshot, SnapshotFormat,
};
use crate::transport::{CloseHandle, Session, TransportError, TransportErrorKind};
use crate::tui::{Console, INVALID_MOVE_PROMPT, MOVE_PROMPT, WAITING_TEXT, render_board};

/// Drives one match attempt over a [`Session`], reading moves from a
/// [`Console`].
///
/// The server is authoritative: whose turn it is comes from the latest
/// snapshot, never from a local move count. The client sends at most one
/// message before waiting for the answer to it.
pub struct MatchExchange<F, C> {
    session: Session,
    console: C,
    context: MatchContext,
    format: PhantomData<fn() -> F>,
}

impl<F, C> MatchExchange<F, C>
where
    F: SnapshotFormat,
    C: Console,
{
    /// Creates an exchange for `credential` over an open session.
    pub fn new(session: Session, console: C, credential: PlayerCredential) -> Self {
        Self {
            session,
            console,
            context: MatchContext::new(credential),
            format: PhantomData,
        }
    }

    /// Returns a handle that closes the underlying session.
    pub fn close_handle(&self) -> CloseHandle {
        self.session.close_handle()
    }

    /// Runs matchmaking and, if matched, the turn loop until the game
    /// reaches a terminal status.
    ///
    /// Returns the context with its outcome set. Transport, console and
    /// decoding failures end the attempt with an error.
    #[instrument(skip(self), fields(player = %self.context.credential()))]
    pub async fn run(mut self) -> Result<MatchContext, ExchangeError> {
        if let Some((session_id, side, snapshot)) = self.request_match().await? {
            self.context.assign_match(session_id, side);
            self.context.enter(Phase::Matched);
            self.context.enter(Phase::ExchangingTurns);
            self.exchange_turns(side, snapshot).await?;
        }
        Ok(self.context)
    }

    /// Sends the matching request and interprets the single response.
    async fn request_match(
        &mut self,
    ) -> Result<Option<(SessionId, Side, Snapshot)>, ExchangeError> {
        info!("Requesting match");
        self.session
            .send(&OutboundMessage::matching(self.context.credential()))
            .await?;

        let response: MatchResponse<F> = self.session.receive().await?;
        if !response.is_matched() {
            info!(tag = %response.kind, "Matchmaking did not pair us");
            self.context
                .conclude(MatchOutcome::from_match_tag(&response.kind));
            return Ok(None);
        }

        let session_id = response
            .session_id
            .ok_or_else(|| missing_field("session_id"))?;
        let player_state = response
            .player_state
            .ok_or_else(|| missing_field("player_state"))?;
        let state = response
            .game_state
            .ok_or_else(|| missing_field("game_state"))?;

        let side = Side::from_is_white(player_state.is_white_side);
        let snapshot = state.decode()?;
        info!(session_id = %session_id, side = %side, "Matched");
        Ok(Some((session_id, side, snapshot)))
    }

    async fn exchange_turns(&mut self, side: Side, mut current: Snapshot) -> Result<(), ExchangeError> {
        let mut rejected = false;

        loop {
            self.console.clear();
            self.console.show(&render_board(current.board(), side));

            if !current.status().is_active() {
                let status = current.status().to_string();
                self.context.conclude(MatchOutcome::Finished(status));
                return Ok(());
            }

            if current.is_turn_of(side) {
                let prompt = if rejected { INVALID_MOVE_PROMPT } else { MOVE_PROMPT };
                let text = self.console.read_line(prompt).await?;
                self.send_move(&text).await?;

                let response: SessionResponse<F> = self.session.receive().await?;
                if response.is_session() {
                    current = adopt(response)?;
                    rejected = false;
                } else {
                    warn!(tag = %response.kind, mv = %text, "Move rejected");
                    rejected = true;
                }
            } else {
                self.console.show(WAITING_TEXT);
                debug!("Waiting for opponent");

                let response: SessionResponse<F> = self.session.receive().await?;
                if response.is_session() {
                    current = adopt(response)?;
                } else {
                    // Opponent moves always arrive as session updates.
                    warn!(tag = %response.kind, "Unexpected tag on opponent's turn, keeping snapshot");
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn send_move(&mut self, text: &str) -> Result<(), ExchangeError> {
        let session_id = self
            .context
            .session_id()
            .clone()
            .ok_or_else(|| missing_field("session_id"))?;
        let message = OutboundMessage::play_move(&session_id, self.context.credential(), text);
        self.session.send(&message).await?;
        self.context.record_move_sent();
        info!(moves_sent = *self.context.moves_sent(), "Move sent");
        Ok(())
    }
}

/// Decodes the snapshot of an accepted `session` response.
fn adopt<F: SnapshotFormat>(response: SessionResponse<F>) -> Result<Snapshot, ExchangeError> {
    let state = response
        .game_state
        .ok_or_else(|| missing_field("game_state"))?;
    Ok(state.decode()?)
}

#[track_caller]
fn missing_field(field: &str) -> TransportError {
    TransportError::new(
        TransportErrorKind::Malformed,
        format!("response is missing {}", field),
    )
}
