//! Match results.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishReason {
    /// A player ran out of morale.
    Morale,
    Surrender,
    /// Torn down by the host after a structural failure.
    Destroyed,
}

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Winning player, `None` for a draw.
    pub victorious: Option<PlayerId>,
    pub reason: FinishReason,
}

impl GameOutcome {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.victorious == Some(player)
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.victorious.is_none()
    }
}
