//! Rule-following bot.
//!
//! The bot never touches match state directly. It looks at what a human in
//! its seat could do and answers with the same [`IncomingIntent`]s a client
//! would send, so everything it does is validated like any other player.

use std::cmp::Reverse;

use tracing::debug;

use crate::cards::Card;
use crate::core::{CardId, Game, GamePhase, PlayerId, Result};
use crate::net::{IncomingIntent, IntentOutcome};
use crate::targeting::{CardTarget, TargetMode, TargetSubject};
use crate::zones::CardLocation;

/// Highest-value target, first one on ties.
fn best_target(targets: impl IntoIterator<Item = CardTarget>) -> Option<CardTarget> {
    targets
        .into_iter()
        .enumerate()
        .max_by_key(|(i, target)| (target.expected_value, Reverse(*i)))
        .map(|(_, target)| target)
}

/// A bot seated as one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BotPlayer {
    player: PlayerId,
}

impl BotPlayer {
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self { player }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The next intent the bot wants to send, or `None` when it has nothing
    /// to do right now.
    #[must_use]
    pub fn choose_intent(&self, game: &Game) -> Option<IncomingIntent> {
        if !game.is_running() {
            return None;
        }
        if game.phase() == GamePhase::Mulligan {
            return (!game.player(self.player).mulligan_confirmed()).then_some(IncomingIntent::EndTurn);
        }

        // =====================================================================
        // Owed targets
        // =====================================================================

        if let Some(request) = game.pending_target_request(self.player) {
            return best_target(request.targets).map(|target| IncomingIntent::SelectTarget { target });
        }
        if game.active_player() != self.player || !game.resolve_stack().is_empty() {
            return None;
        }

        // =====================================================================
        // Card play
        // =====================================================================

        if let Some(intent) = self.choose_play(game) {
            return Some(intent);
        }

        // =====================================================================
        // Unit orders
        // =====================================================================

        if let Some(target) = self.choose_order(game) {
            return Some(IncomingIntent::UnitOrder { target });
        }

        Some(IncomingIntent::EndTurn)
    }

    fn choose_play(&self, game: &Game) -> Option<IncomingIntent> {
        let state = game.player(self.player);
        let affordable = |card: &Card| {
            i64::from(card.unit_cost()) <= i64::from(state.unit_mana())
                && i64::from(card.spell_cost()) <= i64::from(state.spell_mana())
        };

        game.zones()
            .cards_in(CardLocation::Hand(self.player))
            .iter()
            .filter_map(|&id| game.card(id))
            .filter(|card| affordable(card))
            .find_map(|card| self.placement(game, card.id(), card.is_unit()))
    }

    fn placement(&self, game: &Game, card: CardId, is_unit: bool) -> Option<IncomingIntent> {
        let rows = game
            .valid_targets(TargetMode::CardPlay, Some(card), self.player, &[])
            .into_iter()
            .filter(|t| matches!(t.subject, TargetSubject::Row { .. } | TargetSubject::Position { .. }));
        let row = match best_target(rows) {
            Some(target) => target.subject.row()?,
            None if is_unit => return None,
            None => game.config().front_row(self.player),
        };
        let index = game.board().row(row).map_or(0, |r| r.len());
        Some(IncomingIntent::PlayCard { card, row, index })
    }

    fn choose_order(&self, game: &Game) -> Option<CardTarget> {
        let orders = game.units_owned_by(self.player).into_iter().flat_map(|unit| {
            let previous: Vec<CardTarget> = game
                .turn_orders()
                .iter()
                .filter(|order| order.source == Some(unit))
                .cloned()
                .collect();
            game.valid_targets(TargetMode::UnitOrder, Some(unit), self.player, &previous)
        });
        best_target(orders).filter(|target| target.expected_value > 0)
    }

    /// Keep acting while the bot has something to do, up to `max_intents`.
    ///
    /// Returns how many intents were applied. Stops at the first rejection.
    pub fn act(&self, game: &mut Game, max_intents: usize) -> Result<usize> {
        let mut applied = 0;
        while applied < max_intents {
            let Some(intent) = self.choose_intent(game) else {
                break;
            };
            debug!(player = %self.player, ?intent, "bot intent");
            match game.handle_intent(self.player, intent)? {
                IntentOutcome::Applied => applied += 1,
                IntentOutcome::Rejected(reason) => {
                    debug!(player = %self.player, ?reason, "bot intent rejected");
                    break;
                }
            }
        }
        Ok(applied)
    }
}
