//! Runs a match exchange while watching for an operator interrupt.
//!
//! The exchange runs on its own task. Whichever finishes first, the
//! exchange or the interrupt, decides the result; the session is closed
//! either way. An interrupted exchange gets a bounded grace period to
//! notice the closed connection before the caller is told to give up.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{error, info, instrument, warn};

use crate::auth::PlayerCredential;
use crate::client_config::ClientConfig;
use crate::games::chess::{FenState, GridState, SnapshotFormat, SnapshotKind};
use crate::protocol::{ExchangeError, MatchContext, MatchExchange, MatchOutcome};
use crate::transport::Session;
use crate::tui::Console;

/// Grace period used when none is configured.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);

/// Races a match exchange against an interrupt signal.
#[derive(Debug, Clone, Copy)]
pub struct Coordinator {
    grace: Duration,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE)
    }
}

impl Coordinator {
    /// Creates a coordinator with the given interrupt grace period.
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    /// Returns the interrupt grace period.
    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Runs `exchange` to completion unless `interrupt` resolves first.
    ///
    /// On interrupt the session is closed and the exchange has the grace
    /// period to finish; it then yields [`MatchOutcome::Ongoing`] unless it
    /// reached a real outcome. If the grace period elapses the exchange task
    /// is aborted and [`ExchangeError::InterruptTimeout`] is returned; the
    /// caller is expected to exit the process.
    #[instrument(skip_all, fields(grace_ms = self.grace.as_millis() as u64))]
    pub async fn run<F, C, I>(
        &self,
        exchange: MatchExchange<F, C>,
        interrupt: I,
    ) -> Result<MatchOutcome, ExchangeError>
    where
        F: SnapshotFormat,
        C: Console + 'static,
        I: Future<Output = ()>,
    {
        let closer = exchange.close_handle();
        let mut done = tokio::spawn(exchange.run());

        tokio::select! {
            biased;
            joined = &mut done => {
                closer.close();
                let outcome = settle(joined)?;
                info!(outcome = %outcome, "Exchange finished");
                Ok(outcome)
            }
            () = interrupt => {
                warn!("Interrupt received, closing session");
                closer.close();

                match tokio::time::timeout(self.grace, &mut done).await {
                    Ok(joined) => {
                        let outcome = settle(joined).unwrap_or_else(|e| {
                            info!(error = %e, "Exchange stopped after interrupt");
                            MatchOutcome::Ongoing
                        });
                        info!(outcome = %outcome, "Interrupted exchange shut down");
                        Ok(outcome)
                    }
                    Err(_) => {
                        error!("Exchange did not shut down within the grace period");
                        done.abort();
                        Err(ExchangeError::InterruptTimeout)
                    }
                }
            }
        }
    }
}

fn settle(
    joined: Result<Result<MatchContext, ExchangeError>, JoinError>,
) -> Result<MatchOutcome, ExchangeError> {
    let context = joined.map_err(|e| ExchangeError::TaskFailed(e.to_string()))??;
    Ok(context.into_outcome())
}

/// Resolves when the process receives Ctrl-C.
///
/// If the signal handler cannot be installed this never resolves.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Connects to the configured game server and plays one coordinated match.
#[instrument(skip(config, console, interrupt), fields(player = %credential, format = %config.snapshot_format()))]
pub async fn join_match<C, I>(
    config: &ClientConfig,
    credential: PlayerCredential,
    console: C,
    interrupt: I,
) -> Result<MatchOutcome, ExchangeError>
where
    C: Console + 'static,
    I: Future<Output = ()>,
{
    let session = Session::connect(config.game_url(), config.handshake_timeout()).await?;
    let coordinator = Coordinator::new(config.interrupt_grace());

    match config.snapshot_format() {
        SnapshotKind::Grid => {
            let exchange = MatchExchange::<GridState, C>::new(session, console, credential);
            coordinator.run(exchange, interrupt).await
        }
        SnapshotKind::Fen => {
            let exchange = MatchExchange::<FenState, C>::new(session, console, credential);
            coordinator.run(exchange, interrupt).await
        }
    }
}
