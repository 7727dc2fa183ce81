//! Zone moves and unit lifecycle on the match.
//!
//! These are the only paths that change where a card is. Each one keeps the
//! zone manager and the board in step and tells both players what changed.

use tracing::debug;

use crate::core::{CardId, Game, GameError, PlayerId, Result};
use crate::events::{UnitCreatedArgs, UnitMovedArgs};
use crate::net::OutgoingMessage;

use super::board::UnitPosition;
use super::location::CardLocation;
use super::manager::ZonePosition;

impl Game {
    /// Move a card into an ordered zone. A unit leaving the board is taken
    /// off its row first.
    ///
    /// Returns the previous location.
    pub fn move_card(
        &mut self,
        card: CardId,
        to: CardLocation,
        position: ZonePosition,
    ) -> Result<Option<CardLocation>> {
        self.card_checked(card)?;
        if to == CardLocation::Board {
            return Err(GameError::Invariant(format!(
                "{card} must enter the board through create_unit"
            )));
        }
        if self.board.find_unit(card).is_some() {
            self.remove_unit(card)?;
        }
        let from = self.zones.place(card, to, position);
        debug!(%card, ?from, ?to, "card moved");
        self.send_card_moved(card, from, to)?;
        Ok(from)
    }

    /// Put a unit onto the board. Returns `None` when the row is full.
    pub fn create_unit(&mut self, card: CardId, row: usize, index: usize) -> Result<Option<UnitPosition>> {
        let owner = self
            .card_checked(card)?
            .owner()
            .ok_or_else(|| GameError::Invariant(format!("{card} has no owner to deploy for")))?;
        if self.board.row_checked(row)?.is_full() {
            debug!(%card, row, "row full, unit not created");
            return Ok(None);
        }
        if self.board.find_unit(card).is_some() {
            return Err(GameError::Invariant(format!("{card} is already on the board")));
        }

        let index = self.board.insert_unit(card, row, index)?;
        self.zones.place(card, CardLocation::Board, ZonePosition::Top);
        let position = UnitPosition { row, index };
        debug!(%card, row, index, "unit created");

        let message = self.unit_message(card)?;
        self.broadcast(OutgoingMessage::UnitCreated(message));
        self.post_event(UnitCreatedArgs {
            card,
            owner,
            row,
            index,
        });
        Ok(Some(position))
    }

    /// Move a unit to another slot. Returns `None` when the target row is full.
    pub fn move_unit(&mut self, card: CardId, row: usize, index: usize) -> Result<Option<UnitPosition>> {
        let from = self.board.find_unit(card).ok_or(GameError::NotOnBoard(card))?;
        if self.board.row_checked(row)?.is_full() && from.row != row {
            return Ok(None);
        }
        self.board.remove_unit(card);
        let index = self.board.insert_unit(card, row, index)?;
        debug!(%card, ?from, row, index, "unit moved");

        self.broadcast(OutgoingMessage::UnitMoved { card, row, index });
        self.post_event(UnitMovedArgs {
            card,
            from_row: from.row,
            from_index: from.index,
            to_row: row,
            to_index: index,
        });
        Ok(Some(UnitPosition { row, index }))
    }

    /// Take a unit off its row without placing it anywhere else.
    pub(crate) fn remove_unit(&mut self, card: CardId) -> Result<UnitPosition> {
        let position = self.board.remove_unit(card).ok_or(GameError::NotOnBoard(card))?;
        self.broadcast(OutgoingMessage::UnitRemoved { card });
        Ok(position)
    }

    pub fn set_row_owner(&mut self, row: usize, owner: Option<PlayerId>) -> Result<()> {
        if self.board.row_checked(row)?.owner() == owner {
            return Ok(());
        }
        self.board.set_owner(row, owner)?;
        debug!(row, ?owner, "row owner changed");
        self.broadcast(OutgoingMessage::RowOwnerChanged { row, owner });
        Ok(())
    }

    /// Units whose card belongs to `player`, top row first.
    #[must_use]
    pub fn units_owned_by(&self, player: PlayerId) -> Vec<CardId> {
        self.board
            .all_units()
            .filter(|&unit| self.card_owner(unit) == Some(player))
            .collect()
    }

    /// Sum of the power of `player`'s units.
    #[must_use]
    pub fn total_power(&self, player: PlayerId) -> i32 {
        self.units_owned_by(player)
            .into_iter()
            .filter_map(|unit| self.card(unit))
            .map(|card| card.power().max(0))
            .sum()
    }

    /// Send every unit to its owner's graveyard and give rows back to their
    /// starting owners.
    pub(crate) fn clear_board(&mut self) -> Result<()> {
        let units: Vec<CardId> = self.board.all_units().collect();
        for unit in units {
            match self.card_owner(unit) {
                Some(owner) => {
                    self.move_card(unit, CardLocation::Graveyard(owner), ZonePosition::Top)?;
                }
                None => {
                    self.remove_unit(unit)?;
                    self.zones.remove(unit);
                }
            }
        }
        for row in 0..self.board.row_count() {
            let owner = self.config.default_row_owner(row);
            self.set_row_owner(row, Some(owner))?;
        }
        Ok(())
    }
}
