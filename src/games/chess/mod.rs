//! Chess session types: wire messages, snapshots, and the board model.

mod board;
mod messages;
mod snapshot;

pub use board::{BOARD_SIZE, Board, Side};
pub use messages::{
    ACTION_MATCHING, ACTION_MOVE, MatchResponse, OutboundMessage, PlayerState, SessionId,
    SessionResponse, TAG_MATCHED, TAG_SESSION,
};
pub use snapshot::{
    ACTIVE_STATUS, FenState, GridState, Snapshot, SnapshotError, SnapshotFormat, SnapshotKind,
    Status, parse_fen,
};
