use std::path::PathBuf;

use crate::game::{MAX_MOVES, SIDE};

/// Errors raised while decoding a saved game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeserializationError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("unknown cell code {code:#04x} at ({x}, {y})")]
    CellCode { x: usize, y: usize, code: u8 },

    #[error("invalid {field} flag byte {value}")]
    Flag { field: &'static str, value: u8 },

    #[error("state is marked both solved and game over")]
    ConflictingFlags,

    #[error("move count {0} exceeds the budget of {max}", max = MAX_MOVES)]
    MoveCount(u32),

    #[error("inconsistent state: {0}")]
    InconsistentState(&'static str),

    #[error("cell ({x}, {y}) does not match the board layout")]
    Layout { x: usize, y: usize },

    #[error("impossible coin population: {gold} gold, {silver} silver, {empty} empty")]
    Population {
        gold: usize,
        silver: usize,
        empty: usize,
    },
}

/// Errors surfaced by the game engine to its callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cell ({x}, {y}) is outside the {side}x{side} board", side = SIDE)]
    OutOfRange { x: usize, y: usize },

    #[error("failed to restore game: {0}")]
    Deserialization(#[from] DeserializationError),
}

/// Errors from the preferences store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
