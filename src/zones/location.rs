//! Card locations.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// The zone a card currently occupies.
///
/// Board and stack are shared; every other zone belongs to one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardLocation {
    Hand(PlayerId),
    Deck(PlayerId),
    Graveyard(PlayerId),
    Leader(PlayerId),
    Board,
    Stack,
}

impl CardLocation {
    /// The location kind as a single-flag set, for filter checks.
    #[must_use]
    pub fn kind(self) -> LocationSet {
        match self {
            CardLocation::Hand(_) => LocationSet::HAND,
            CardLocation::Deck(_) => LocationSet::DECK,
            CardLocation::Graveyard(_) => LocationSet::GRAVEYARD,
            CardLocation::Leader(_) => LocationSet::LEADER,
            CardLocation::Board => LocationSet::BOARD,
            CardLocation::Stack => LocationSet::STACK,
        }
    }

    /// Owning player of a per-player zone.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            CardLocation::Hand(p)
            | CardLocation::Deck(p)
            | CardLocation::Graveyard(p)
            | CardLocation::Leader(p) => Some(p),
            CardLocation::Board | CardLocation::Stack => None,
        }
    }

    /// Whether cards here are visible to both players.
    #[must_use]
    pub fn is_public(self) -> bool {
        !matches!(self, CardLocation::Hand(_) | CardLocation::Deck(_))
    }
}

bitflags! {
    /// Set of location kinds used by subscription filters.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    /// use ccg_rules::zones::{CardLocation, LocationSet};
    ///
    /// let filter = LocationSet::BOARD | LocationSet::GRAVEYARD;
    /// assert!(filter.contains(CardLocation::Board.kind()));
    /// assert!(!filter.contains(CardLocation::Hand(PlayerId::FIRST).kind()));
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct LocationSet: u8 {
        const HAND      = 1 << 0;
        const DECK      = 1 << 1;
        const GRAVEYARD = 1 << 2;
        const LEADER    = 1 << 3;
        const BOARD     = 1 << 4;
        const STACK     = 1 << 5;
    }
}
