//! Error types for the rules engine.
//!
//! Only structural failures are errors. Illegal player intents (a stale target,
//! insufficient mana, acting out of turn) are rejected through
//! [`IntentOutcome`](crate::net::IntentOutcome) and never surface here.

use thiserror::Error;

use super::entity::{BuffId, CardId};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error("buff not found: {0}")]
    BuffNotFound(BuffId),

    #[error("card class not registered: {0}")]
    UnknownCardClass(String),

    #[error("buff class not registered: {0}")]
    UnknownBuffClass(String),

    #[error("board row {row} out of range (board has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("{0} is not a unit on the board")]
    NotOnBoard(CardId),

    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
