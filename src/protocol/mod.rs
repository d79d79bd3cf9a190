//! Session protocol: matchmaking, turn exchange and match outcomes.

mod context;
mod error;
mod machine;
mod outcome;

pub use context::MatchContext;
pub use error::ExchangeError;
pub use machine::MatchExchange;
pub use outcome::{MatchOutcome, Phase};
