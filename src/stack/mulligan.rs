//! Opening-hand mulligan.
//!
//! Each pick puts the chosen card at the bottom of the deck, draws the top
//! unit card as a replacement and reshuffles. A player is done once they used
//! every pick, ran out of candidates or ended their turn.

use tracing::{debug, info};

use crate::cards::Card;
use crate::core::{CardId, Game, GamePhase, PlayerId, Result};
use crate::events::{CardDrawnArgs, PlayerTargetSelectedCardArgs};
use crate::net::{IntentOutcome, RejectReason};
use crate::targeting::{CardTarget, TargetMode};
use crate::zones::{CardLocation, ZonePosition};

impl Game {
    /// Replace one card from `player`'s opening hand.
    pub fn select_mulligan_target(&mut self, player: PlayerId, target: CardTarget) -> Result<IntentOutcome> {
        if self.phase != GamePhase::Mulligan {
            return Ok(IntentOutcome::Rejected(RejectReason::WrongPhase));
        }
        let state = &self.players[player];
        if state.mulligan_confirmed {
            return Ok(IntentOutcome::Rejected(RejectReason::NothingToTarget));
        }
        let chosen = self
            .valid_targets(TargetMode::Mulligan, None, player, &state.mulligan_picks)
            .into_iter()
            .find(|t| *t == target);
        let Some((chosen, picked)) = chosen.and_then(|t| t.subject.card().map(|card| (t, card))) else {
            self.resend_target_request(player);
            return Ok(IntentOutcome::Rejected(RejectReason::StaleTarget));
        };

        self.replace_from_deck(player, picked)?;
        self.players[player].mulligan_picks.push(chosen);
        self.post_event(PlayerTargetSelectedCardArgs { player, target: picked });

        let state = &self.players[player];
        let exhausted = state.mulligan_picks.len() >= self.config.mulligan_count
            || self
                .valid_targets(TargetMode::Mulligan, None, player, &state.mulligan_picks)
                .is_empty();
        if exhausted {
            return self.confirm_mulligan(player);
        }
        self.resend_target_request(player);
        Ok(IntentOutcome::Applied)
    }

    fn replace_from_deck(&mut self, player: PlayerId, picked: CardId) -> Result<()> {
        let deck = CardLocation::Deck(player);
        let replacement = self
            .zones
            .cards_in(deck)
            .iter()
            .rev()
            .copied()
            .find(|&card| self.card(card).is_some_and(Card::is_unit));

        self.move_card(picked, deck, ZonePosition::Bottom)?;
        if let Some(replacement) = replacement {
            self.move_card(replacement, CardLocation::Hand(player), ZonePosition::Top)?;
            self.post_event(CardDrawnArgs {
                card: replacement,
                owner: player,
            });
        }
        self.zones.shuffle(deck, &mut self.rng);
        debug!(%player, %picked, ?replacement, "mulligan replacement");
        Ok(())
    }

    /// Finish `player`'s mulligan. The first round starts once both players
    /// are done.
    pub fn confirm_mulligan(&mut self, player: PlayerId) -> Result<IntentOutcome> {
        if self.phase != GamePhase::Mulligan {
            return Ok(IntentOutcome::Rejected(RejectReason::WrongPhase));
        }
        if self.players[player].mulligan_confirmed {
            return Ok(IntentOutcome::Applied);
        }
        self.players[player].mulligan_confirmed = true;
        info!(%player, picks = self.players[player].mulligan_picks.len(), "mulligan confirmed");

        if self.players.iter().all(|(_, state)| state.mulligan_confirmed) {
            self.phase = GamePhase::Deploy;
            self.start_round()?;
        }
        Ok(IntentOutcome::Applied)
    }
}
