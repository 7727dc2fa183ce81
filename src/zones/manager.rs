//! Zone manager for card locations.
//!
//! The `ZoneManager` is the single source of truth for where a card is. Cards
//! never store their own location; everything asks the manager. Hands, decks,
//! graveyards, leader slots and the stack keep an explicit order here. Board
//! cards are recorded as `CardLocation::Board` and ordered by their
//! [`BoardRow`](super::BoardRow).
//!
//! ```
//! use ccg_rules::core::{CardId, PlayerId};
//! use ccg_rules::zones::{CardLocation, ZoneManager, ZonePosition};
//!
//! let deck = CardLocation::Deck(PlayerId::FIRST);
//! let mut zones = ZoneManager::new();
//! zones.place(CardId(10), deck, ZonePosition::Top);
//! zones.place(CardId(11), deck, ZonePosition::Bottom);
//! zones.place(CardId(12), deck, ZonePosition::Top);
//!
//! assert_eq!(zones.cards_in(deck), &[CardId(11), CardId(10), CardId(12)]);
//! assert_eq!(zones.top(deck), Some(CardId(12)));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameRng};

use super::location::CardLocation;

/// Position for inserting a card into an ordered zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// End of the zone (top of a deck, rightmost in a hand).
    Top,
    /// Start of the zone.
    Bottom,
    /// Insert at a specific index, clamped to the zone size.
    Index(usize),
}

#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    locations: FxHashMap<CardId, CardLocation>,
    zone_order: FxHashMap<CardLocation, Vec<CardId>>,
}

impl ZoneManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a card into `location`, taking it out of wherever it was.
    ///
    /// Returns the previous location.
    pub fn place(
        &mut self,
        card: CardId,
        location: CardLocation,
        position: ZonePosition,
    ) -> Option<CardLocation> {
        let previous = self.remove(card);
        self.locations.insert(card, location);

        if location != CardLocation::Board {
            let order = self.zone_order.entry(location).or_default();
            match position {
                ZonePosition::Top => order.push(card),
                ZonePosition::Bottom => order.insert(0, card),
                ZonePosition::Index(i) => order.insert(i.min(order.len()), card),
            }
        }
        previous
    }

    /// Take a card out of every zone.
    ///
    /// Returns the zone it was in, or `None` if it was not tracked.
    pub fn remove(&mut self, card: CardId) -> Option<CardLocation> {
        let location = self.locations.remove(&card)?;
        if let Some(order) = self.zone_order.get_mut(&location) {
            order.retain(|&c| c != card);
        }
        Some(location)
    }

    #[must_use]
    pub fn location(&self, card: CardId) -> Option<CardLocation> {
        self.locations.get(&card).copied()
    }

    #[must_use]
    pub fn is_in(&self, card: CardId, location: CardLocation) -> bool {
        self.locations.get(&card) == Some(&location)
    }

    /// Cards in an ordered zone, bottom first. Always empty for the board.
    #[must_use]
    pub fn cards_in(&self, location: CardLocation) -> &[CardId] {
        self.zone_order.get(&location).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn size(&self, location: CardLocation) -> usize {
        self.cards_in(location).len()
    }

    #[must_use]
    pub fn top(&self, location: CardLocation) -> Option<CardId> {
        self.cards_in(location).last().copied()
    }

    #[must_use]
    pub fn index_of(&self, card: CardId) -> Option<usize> {
        let location = self.location(card)?;
        self.cards_in(location).iter().position(|&c| c == card)
    }

    pub fn shuffle(&mut self, location: CardLocation, rng: &mut GameRng) {
        if let Some(order) = self.zone_order.get_mut(&location) {
            rng.shuffle(order);
        }
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.locations.contains_key(&card)
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    const HAND: CardLocation = CardLocation::Hand(PlayerId::FIRST);
    const GRAVE: CardLocation = CardLocation::Graveyard(PlayerId::FIRST);

    #[test]
    fn test_place_moves_between_zones() {
        let mut zones = ZoneManager::new();
        assert_eq!(zones.place(CardId(1), HAND, ZonePosition::Top), None);
        assert_eq!(zones.place(CardId(1), GRAVE, ZonePosition::Top), Some(HAND));

        assert!(zones.cards_in(HAND).is_empty());
        assert_eq!(zones.cards_in(GRAVE), &[CardId(1)]);
        assert!(zones.is_in(CardId(1), GRAVE));
    }

    #[test]
    fn test_board_is_not_ordered_here() {
        let mut zones = ZoneManager::new();
        zones.place(CardId(5), CardLocation::Board, ZonePosition::Top);
        assert_eq!(zones.location(CardId(5)), Some(CardLocation::Board));
        assert!(zones.cards_in(CardLocation::Board).is_empty());
    }

    #[test]
    fn test_index_placement_is_clamped() {
        let mut zones = ZoneManager::new();
        zones.place(CardId(1), HAND, ZonePosition::Top);
        zones.place(CardId(2), HAND, ZonePosition::Index(99));
        zones.place(CardId(3), HAND, ZonePosition::Index(1));
        assert_eq!(zones.cards_in(HAND), &[CardId(1), CardId(3), CardId(2)]);
        assert_eq!(zones.index_of(CardId(2)), Some(2));
    }

    #[test]
    fn test_remove() {
        let mut zones = ZoneManager::new();
        zones.place(CardId(1), HAND, ZonePosition::Top);
        assert_eq!(zones.remove(CardId(1)), Some(HAND));
        assert_eq!(zones.remove(CardId(1)), None);
        assert!(!zones.contains(CardId(1)));
        assert_eq!(zones.total_cards(), 0);
    }

    #[test]
    fn test_shuffle_keeps_membership() {
        let mut zones = ZoneManager::new();
        let deck = CardLocation::Deck(PlayerId::SECOND);
        for i in 0..10 {
            zones.place(CardId(i), deck, ZonePosition::Top);
        }
        zones.shuffle(deck, &mut GameRng::new(5));
        let mut cards = zones.cards_in(deck).to_vec();
        cards.sort();
        assert_eq!(cards, (0..10).map(CardId).collect::<Vec<_>>());
    }
}
