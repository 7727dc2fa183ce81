//! Core engine types: ids, players, configuration, RNG, errors and the
//! per-match [`Game`] state.

pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use config::GameConfig;
pub use entity::{BuffId, CardId};
pub use error::{GameError, Result};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use state::{Game, GamePhase, PlayedCard, PlayerInGame};
