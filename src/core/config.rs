//! Match configuration.
//!
//! Everything that differs between rulesets lives here: board dimensions, hand
//! limits, mana economy and starting morale. The defaults describe the standard
//! ruleset; hosts can override any field through the builder methods or by
//! deserializing a (partial) JSON document.
//!
//! ```
//! use ccg_rules::core::GameConfig;
//!
//! let config = GameConfig::default()
//!     .with_max_units_per_row(5)
//!     .with_rng_seed(7);
//! assert_eq!(config.max_units_per_row, 5);
//! assert_eq!(config.total_rows(), 6);
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Per-match rules configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rows on each side of the board.
    pub rows_per_player: usize,

    /// Capacity of a single board row.
    pub max_units_per_row: usize,

    /// Maximum unit cards held in hand.
    pub unit_hand_size: usize,

    /// Maximum spell cards held in hand.
    pub spell_hand_size: usize,

    /// Unit cards drawn when the match starts.
    pub starting_unit_hand: usize,

    /// Spell cards drawn when the match starts.
    pub starting_spell_hand: usize,

    /// Unit cards drawn at the start of every round after the first.
    pub units_drawn_per_round: usize,

    /// Morale each player starts with. Reaching zero loses the match.
    pub starting_morale: u32,

    /// Unit mana granted at the start of each turn.
    pub unit_mana_per_turn: u32,

    /// Spell mana granted at the start of each round.
    pub spell_mana_per_round: u32,

    /// Maximum number of cards a player may replace during the mulligan.
    pub mulligan_count: usize,

    /// Seed for deck shuffles and other randomness.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows_per_player: 3,
            max_units_per_row: 9,
            unit_hand_size: 10,
            spell_hand_size: 10,
            starting_unit_hand: 8,
            starting_spell_hand: 3,
            units_drawn_per_round: 3,
            starting_morale: 3,
            unit_mana_per_turn: 1,
            spell_mana_per_round: 6,
            mulligan_count: 3,
            rng_seed: 0,
        }
    }
}

impl GameConfig {
    /// Total rows on the board.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.rows_per_player * 2
    }

    /// Initial owner of a row.
    ///
    /// The second player holds the top half of the board, the first player the
    /// bottom half.
    #[must_use]
    pub fn default_row_owner(&self, row: usize) -> PlayerId {
        if row < self.rows_per_player {
            PlayerId::SECOND
        } else {
            PlayerId::FIRST
        }
    }

    /// Index of the row closest to the middle on `player`'s side.
    #[must_use]
    pub fn front_row(&self, player: PlayerId) -> usize {
        if player == PlayerId::FIRST {
            self.rows_per_player
        } else {
            self.rows_per_player - 1
        }
    }

    /// Set rows per side.
    #[must_use]
    pub fn with_rows_per_player(mut self, rows: usize) -> Self {
        self.rows_per_player = rows;
        self
    }

    /// Set row capacity.
    #[must_use]
    pub fn with_max_units_per_row(mut self, max: usize) -> Self {
        self.max_units_per_row = max;
        self
    }

    /// Set hand limits for unit and spell cards.
    #[must_use]
    pub fn with_hand_sizes(mut self, units: usize, spells: usize) -> Self {
        self.unit_hand_size = units;
        self.spell_hand_size = spells;
        self
    }

    /// Set how many cards are drawn when the match starts.
    #[must_use]
    pub fn with_starting_hand(mut self, units: usize, spells: usize) -> Self {
        self.starting_unit_hand = units;
        self.starting_spell_hand = spells;
        self
    }

    /// Set the starting morale.
    #[must_use]
    pub fn with_starting_morale(mut self, morale: u32) -> Self {
        self.starting_morale = morale;
        self
    }

    /// Set the mana economy.
    #[must_use]
    pub fn with_mana(mut self, unit_per_turn: u32, spell_per_round: u32) -> Self {
        self.unit_mana_per_turn = unit_per_turn;
        self.spell_mana_per_round = spell_per_round;
        self
    }

    /// Set the mulligan allowance.
    #[must_use]
    pub fn with_mulligan_count(mut self, count: usize) -> Self {
        self.mulligan_count = count;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout() {
        let config = GameConfig::default();
        assert_eq!(config.total_rows(), 6);
        assert_eq!(config.default_row_owner(0), PlayerId::SECOND);
        assert_eq!(config.default_row_owner(2), PlayerId::SECOND);
        assert_eq!(config.default_row_owner(3), PlayerId::FIRST);
        assert_eq!(config.default_row_owner(5), PlayerId::FIRST);
        assert_eq!(config.front_row(PlayerId::FIRST), 3);
        assert_eq!(config.front_row(PlayerId::SECOND), 2);
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::default()
            .with_rows_per_player(2)
            .with_hand_sizes(4, 2)
            .with_starting_hand(3, 1)
            .with_starting_morale(2)
            .with_mana(2, 5)
            .with_mulligan_count(0);

        assert_eq!(config.total_rows(), 4);
        assert_eq!(config.unit_hand_size, 4);
        assert_eq!(config.starting_spell_hand, 1);
        assert_eq!(config.starting_morale, 2);
        assert_eq!(config.unit_mana_per_turn, 2);
        assert_eq!(config.spell_mana_per_round, 5);
        assert_eq!(config.mulligan_count, 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "max_units_per_row": 4, "rng_seed": 99 }"#).unwrap();
        assert_eq!(config.max_units_per_row, 4);
        assert_eq!(config.rng_seed, 99);
        assert_eq!(config.rows_per_player, 3);
        assert_eq!(config.starting_morale, 3);
    }
}
