//! Lobby controller: the menu loop between login and logout.

use derive_getters::Getters;
use tracing::{error, info, instrument, warn};

use crate::auth::PlayerCredential;
use crate::client_config::ClientConfig;
use crate::coordinator::{ctrl_c, join_match};
use crate::lobby::screen::{MENU_PROMPT, ScreenTransition, menu_text, outcome_text};
use crate::protocol::ExchangeError;
use crate::tui::{Console, TerminalConsole};

/// Drives the post-login menu for one player.
///
/// Call [`LobbyController::run`] to start the loop.
#[derive(Debug, Getters)]
pub struct LobbyController {
    config: ClientConfig,
    credential: PlayerCredential,
}

impl LobbyController {
    /// Creates a lobby for an authenticated player.
    #[instrument(skip(config), fields(player = %credential))]
    pub fn new(config: ClientConfig, credential: PlayerCredential) -> Self {
        info!("Creating LobbyController");
        Self { config, credential }
    }

    /// Runs the menu until the player logs out or interrupts the menu.
    ///
    /// Each match gets its own console and its own Ctrl-C watch. Failed
    /// matches are reported on the menu; only an interrupt that outlives
    /// its grace period is returned as an error.
    #[instrument(skip(self), fields(player = %self.credential))]
    pub async fn run(&self) -> Result<(), ExchangeError> {
        info!("Starting lobby loop");
        let mut console = TerminalConsole::new();
        let mut status: Option<String> = None;

        loop {
            console.clear();
            console.show(&menu_text(&self.credential, status.as_deref()));

            let input = tokio::select! {
                line = console.read_line(MENU_PROMPT) => line?,
                () = ctrl_c() => {
                    info!("Interrupted at menu");
                    return Ok(());
                }
            };

            match ScreenTransition::from_input(&input) {
                ScreenTransition::Stay => {
                    warn!(input = %input, "Unknown menu option");
                    status = None;
                }
                ScreenTransition::Quit => {
                    info!("Logging out");
                    return Ok(());
                }
                ScreenTransition::JoinMatch => {
                    let result = join_match(
                        &self.config,
                        self.credential.clone(),
                        TerminalConsole::new(),
                        ctrl_c(),
                    )
                    .await;

                    if let Err(ExchangeError::InterruptTimeout) = result {
                        error!("Match did not shut down after interrupt");
                        return Err(ExchangeError::InterruptTimeout);
                    }
                    status = Some(outcome_text(&result));
                }
            }
        }
    }
}
