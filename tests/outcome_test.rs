//! Tests for match outcomes and the per-attempt context.

use strictly_chess::{MatchContext, MatchOutcome, Phase, PlayerCredential, SessionId, Side};

#[test]
fn test_outcome_messages() {
    assert_eq!(MatchOutcome::Timeout.message(), "Matching timeout");
    assert_eq!(MatchOutcome::AlreadyQueued.message(), "You are queueing elsewhere");
    assert_eq!(MatchOutcome::AlreadyPlaying.message(), "You are playing elsewhere");
    assert_eq!(MatchOutcome::Ongoing.message(), "Game ended with ongoing");
    assert_eq!(
        MatchOutcome::Finished("CHECKMATE_WHITE".to_string()).message(),
        "Game ended with CHECKMATE_WHITE"
    );
    assert_eq!(
        MatchOutcome::Unmatched("banned".to_string()).message(),
        "Game ended with banned"
    );
}

#[test]
fn test_match_tags() {
    assert_eq!(MatchOutcome::from_match_tag("timeout"), MatchOutcome::Timeout);
    assert_eq!(MatchOutcome::from_match_tag("queueing"), MatchOutcome::AlreadyQueued);
    assert_eq!(MatchOutcome::from_match_tag("playing"), MatchOutcome::AlreadyPlaying);
    assert_eq!(
        MatchOutcome::from_match_tag("whatever"),
        MatchOutcome::Unmatched("whatever".to_string())
    );
}

#[test]
fn test_outcome_is_set_once() {
    let mut context = MatchContext::new(PlayerCredential::new("P1"));
    assert_eq!(*context.phase(), Phase::Matching);
    assert!(context.outcome().is_none());

    assert!(context.conclude(MatchOutcome::Finished("CHECKMATE".to_string())));
    assert!(!context.conclude(MatchOutcome::Ongoing));
    assert_eq!(*context.phase(), Phase::Terminal);
    assert_eq!(
        context.into_outcome(),
        MatchOutcome::Finished("CHECKMATE".to_string())
    );
}

#[test]
fn test_terminal_phase_is_absorbing() {
    let mut context = MatchContext::new(PlayerCredential::new("P1"));
    context.enter(Phase::Matched);
    assert_eq!(*context.phase(), Phase::Matched);

    context.conclude(MatchOutcome::Timeout);
    context.enter(Phase::ExchangingTurns);
    assert_eq!(*context.phase(), Phase::Terminal);
}

#[test]
fn test_match_is_assigned_once() {
    let mut context = MatchContext::new(PlayerCredential::new("P1"));
    assert!(context.assign_match(SessionId::new("S1"), Side::Black));
    assert!(!context.assign_match(SessionId::new("S2"), Side::White));

    assert_eq!(context.session_id(), &Some(SessionId::new("S1")));
    assert_eq!(context.side(), &Some(Side::Black));
}

#[test]
fn test_context_without_outcome_is_ongoing() {
    let context = MatchContext::new(PlayerCredential::new("P1"));
    assert_eq!(context.into_outcome(), MatchOutcome::Ongoing);
}
