//! The row/unit grid.
//!
//! Rows are numbered top to bottom. Within a row, units are kept left to
//! right with no gaps, and a row never holds more than its capacity. These
//! types only hold layout; unit lifecycle (with its events and messages) is
//! driven through [`Game`](crate::core::Game).

use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameConfig, GameError, PlayerId, Result};

/// Where a unit stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitPosition {
    pub row: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardRow {
    index: usize,
    owner: Option<PlayerId>,
    units: Vec<CardId>,
    capacity: usize,
}

impl BoardRow {
    #[must_use]
    pub fn new(index: usize, owner: Option<PlayerId>, capacity: usize) -> Self {
        Self {
            index,
            owner,
            units: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Units from left to right.
    #[must_use]
    pub fn units(&self) -> &[CardId] {
        &self.units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.units.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.units.iter().position(|&c| c == card)
    }

    /// Insert at `index` (clamped). Returns the actual index, or `None` when full.
    fn insert(&mut self, card: CardId, index: usize) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = index.min(self.units.len());
        self.units.insert(index, card);
        Some(index)
    }

    fn remove(&mut self, card: CardId) -> Option<usize> {
        let index = self.position_of(card)?;
        self.units.remove(index);
        Some(index)
    }
}

/// All rows of one match.
///
/// ```
/// use ccg_rules::core::{CardId, GameConfig, PlayerId};
/// use ccg_rules::zones::Board;
///
/// let mut board = Board::new(&GameConfig::default());
/// board.insert_unit(CardId(1), 3, 0).unwrap();
/// board.insert_unit(CardId(2), 3, 0).unwrap();
///
/// assert_eq!(board.row(3).unwrap().units(), &[CardId(2), CardId(1)]);
/// assert_eq!(board.row(3).unwrap().owner(), Some(PlayerId::FIRST));
/// assert_eq!(board.adjacent_units(CardId(1)), vec![CardId(2)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: Vec<BoardRow>,
}

impl Board {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let rows = (0..config.total_rows())
            .map(|index| {
                BoardRow::new(
                    index,
                    Some(config.default_row_owner(index)),
                    config.max_units_per_row,
                )
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[BoardRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&BoardRow> {
        self.rows.get(index)
    }

    /// Row lookup that treats a bad index as a structural error.
    pub fn row_checked(&self, index: usize) -> Result<&BoardRow> {
        self.rows.get(index).ok_or(GameError::RowOutOfRange {
            row: index,
            rows: self.rows.len(),
        })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every unit, top row first, left to right.
    pub fn all_units(&self) -> impl Iterator<Item = CardId> + '_ {
        self.rows.iter().flat_map(|row| row.units.iter().copied())
    }

    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.rows.iter().map(BoardRow::len).sum()
    }

    #[must_use]
    pub fn find_unit(&self, card: CardId) -> Option<UnitPosition> {
        self.rows.iter().find_map(|row| {
            row.position_of(card).map(|index| UnitPosition {
                row: row.index,
                index,
            })
        })
    }

    /// Rows currently owned by `player`.
    pub fn rows_owned_by(&self, player: PlayerId) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter().filter(move |row| row.owner == Some(player))
    }

    /// Units directly left and right of `card`.
    #[must_use]
    pub fn adjacent_units(&self, card: CardId) -> Vec<CardId> {
        let Some(position) = self.find_unit(card) else {
            return Vec::new();
        };
        let units = &self.rows[position.row].units;
        let mut adjacent = Vec::with_capacity(2);
        if position.index > 0 {
            adjacent.push(units[position.index - 1]);
        }
        if let Some(&right) = units.get(position.index + 1) {
            adjacent.push(right);
        }
        adjacent
    }

    /// Rows between two units.
    #[must_use]
    pub fn vertical_distance(&self, a: CardId, b: CardId) -> Option<usize> {
        let a = self.find_unit(a)?;
        let b = self.find_unit(b)?;
        Some(a.row.abs_diff(b.row))
    }

    /// Horizontal offset between two units, with each row centred.
    ///
    /// Rows of different lengths are aligned on their centres, so a unit in
    /// a row of three sits directly above the middle of a row of five.
    #[must_use]
    pub fn horizontal_distance(&self, a: CardId, b: CardId) -> Option<f32> {
        let offset = |card: CardId| -> Option<f32> {
            let position = self.find_unit(card)?;
            let len = self.rows[position.row].len() as f32;
            Some(position.index as f32 - (len - 1.0) / 2.0)
        };
        Some((offset(a)? - offset(b)?).abs())
    }

    /// Insert a unit. Returns the index it landed on.
    pub fn insert_unit(&mut self, card: CardId, row: usize, index: usize) -> Result<usize> {
        let rows = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(GameError::RowOutOfRange { row, rows })?;
        target
            .insert(card, index)
            .ok_or_else(|| GameError::Invariant(format!("row {row} is full")))
    }

    /// Remove a unit. Returns where it stood.
    pub fn remove_unit(&mut self, card: CardId) -> Option<UnitPosition> {
        self.rows.iter_mut().find_map(|row| {
            row.remove(card).map(|index| UnitPosition {
                row: row.index,
                index,
            })
        })
    }

    pub fn set_owner(&mut self, row: usize, owner: Option<PlayerId>) -> Result<()> {
        let rows = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(GameError::RowOutOfRange { row, rows })?;
        target.owner = owner;
        Ok(())
    }

    /// Remove every unit. Returns them top row first.
    pub fn clear(&mut self) -> Vec<CardId> {
        self.rows
            .iter_mut()
            .flat_map(|row| std::mem::take(&mut row.units))
            .collect()
    }
}
