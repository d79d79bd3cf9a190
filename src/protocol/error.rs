//! Errors that end a match attempt.

use derive_more::{Display, Error, From};

use crate::games::chess::SnapshotError;
use crate::transport::TransportError;
use crate::tui::ConsoleError;

/// Failure of a match attempt.
///
/// Rejected moves are not errors; they only change the next prompt.
#[derive(Debug, Display, Error, From)]
pub enum ExchangeError {
    /// Connecting, writing or reading failed.
    #[display("{}", _0)]
    Transport(TransportError),

    /// The operator's input stream failed.
    #[display("{}", _0)]
    Console(ConsoleError),

    /// A snapshot could not be decoded.
    #[display("{}", _0)]
    Snapshot(SnapshotError),

    /// The exchange did not acknowledge an interrupt within the grace period.
    #[display("Interrupted exchange did not shut down within the grace period")]
    #[from(ignore)]
    InterruptTimeout,

    /// The exchange task panicked or was cancelled.
    #[display("Exchange task failed: {}", _0)]
    #[from(ignore)]
    TaskFailed(#[error(not(source))] String),
}
