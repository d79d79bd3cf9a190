//! Game-specific types.

pub mod chess;
