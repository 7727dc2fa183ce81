//! Turn, round and match lifecycle.
//!
//! A match is a sequence of rounds. Players alternate turns within a round;
//! ending a turn without playing a card passes for the rest of the round.
//! When both players have passed, board power decides who loses morale and
//! the board is cleared. A player at zero morale loses the match.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::cards::CardType;
use crate::core::{CardId, Game, GameError, GamePhase, PlayerId, Result};
use crate::events::{
    CardDrawnArgs, GameFinishedArgs, GameStartedArgs, RoundEndedArgs, RoundStartedArgs, TurnEndedArgs,
    TurnStartedArgs,
};
use crate::net::{IntentOutcome, OutgoingMessage, RejectReason};
use crate::zones::{CardLocation, ZonePosition};

use super::outcome::{FinishReason, GameOutcome};

impl Game {
    /// Shuffle decks, deal opening hands and open the mulligan (or the
    /// first round when mulligans are disabled).
    pub fn start(&mut self) -> Result<()> {
        if self.phase != GamePhase::Setup {
            return Err(GameError::Invariant(format!("cannot start a match in {:?}", self.phase)));
        }
        info!(seed = self.config.rng_seed, "match starting");

        for player in PlayerId::all() {
            self.zones.shuffle(CardLocation::Deck(player), &mut self.rng);
            for _ in 0..self.config.starting_unit_hand {
                self.draw_unit_card(player)?;
            }
            for _ in 0..self.config.starting_spell_hand {
                self.draw_spell_card(player)?;
            }
        }
        self.broadcast(OutgoingMessage::GameStarted);
        self.post_event(GameStartedArgs);

        if self.config.mulligan_count > 0 {
            self.phase = GamePhase::Mulligan;
            self.broadcast(OutgoingMessage::MulliganStarted {
                count: self.config.mulligan_count,
            });
            for player in PlayerId::all() {
                self.resend_target_request(player);
            }
            Ok(())
        } else {
            self.phase = GamePhase::Deploy;
            self.start_round()
        }
    }

    pub(crate) fn start_round(&mut self) -> Result<()> {
        self.round += 1;
        let round = self.round;
        info!(round, "round started");

        for player in PlayerId::all() {
            let state = &mut self.players[player];
            state.round_ended = false;
            state.turn_ended = false;

            let spell_mana = state.spell_mana + self.config.spell_mana_per_round;
            self.set_spell_mana(player, spell_mana);
            if round > 1 {
                for _ in 0..self.config.units_drawn_per_round {
                    self.draw_unit_card(player)?;
                }
            }
        }

        self.broadcast(OutgoingMessage::RoundStarted { round });
        self.post_event(RoundStartedArgs { round });
        if !self.is_running() {
            return Ok(());
        }
        self.active_player = if round % 2 == 1 { PlayerId::FIRST } else { PlayerId::SECOND };
        self.start_turn()
    }

    fn start_turn(&mut self) -> Result<()> {
        self.turn += 1;
        let (player, turn) = (self.active_player, self.turn);
        let state = &mut self.players[player];
        state.turn_ended = false;
        state.cards_played_this_turn = 0;
        self.set_unit_mana(player, self.config.unit_mana_per_turn);
        self.turn_orders.clear();
        info!(%player, turn, "turn started");

        self.broadcast(OutgoingMessage::TurnStarted { player, turn });
        self.post_event(TurnStartedArgs { player, turn });
        Ok(())
    }

    /// End `player`'s turn. During the mulligan this confirms their hand.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<IntentOutcome> {
        if !self.is_running() {
            return Ok(IntentOutcome::Rejected(RejectReason::MatchNotRunning));
        }
        if self.phase == GamePhase::Mulligan {
            return self.confirm_mulligan(player);
        }
        if self.phase != GamePhase::Deploy {
            return Ok(IntentOutcome::Rejected(RejectReason::WrongPhase));
        }
        if self.active_player != player {
            return Ok(IntentOutcome::Rejected(RejectReason::NotYourTurn));
        }
        if !self.resolve_stack.is_empty() {
            return Ok(IntentOutcome::Rejected(RejectReason::TargetRequired));
        }

        self.tick_buff_durations(player)?;
        let state = &mut self.players[player];
        let passed = state.cards_played_this_turn == 0;
        state.turn_ended = true;
        state.round_ended |= passed;
        info!(%player, turn = self.turn, passed, "turn ended");

        self.broadcast(OutgoingMessage::TurnEnded { player, passed });
        self.post_event(TurnEndedArgs { player, turn: self.turn });
        if !self.is_running() {
            return Ok(IntentOutcome::Applied);
        }

        if self.players.iter().all(|(_, state)| state.round_ended) {
            self.end_round()?;
        } else {
            let opponent = player.opponent();
            self.active_player = if self.players[opponent].round_ended { player } else { opponent };
            self.start_turn()?;
        }
        Ok(IntentOutcome::Applied)
    }

    fn end_round(&mut self) -> Result<()> {
        let round = self.round;
        let first = self.total_power(PlayerId::FIRST);
        let second = self.total_power(PlayerId::SECOND);
        let victorious = match first.cmp(&second) {
            Ordering::Greater => Some(PlayerId::FIRST),
            Ordering::Less => Some(PlayerId::SECOND),
            Ordering::Equal => None,
        };
        info!(round, first, second, ?victorious, "round ended");

        for player in PlayerId::all() {
            if victorious != Some(player) {
                let morale = self.players[player].morale.saturating_sub(1);
                self.set_morale(player, morale);
            }
        }
        self.broadcast(OutgoingMessage::RoundEnded { round, victorious });
        self.post_event(RoundEndedArgs { round, victorious });
        self.clear_board()?;

        let defeated: Vec<PlayerId> = PlayerId::all().filter(|&p| self.players[p].morale == 0).collect();
        match defeated.as_slice() {
            [] if self.is_running() => self.start_round(),
            [] => Ok(()),
            [loser] => self.finish_game(Some(loser.opponent()), FinishReason::Morale),
            _ => self.finish_game(None, FinishReason::Morale),
        }
    }

    /// End the match. Does nothing if it already ended.
    pub fn finish_game(&mut self, victorious: Option<PlayerId>, reason: FinishReason) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        self.phase = GamePhase::Finished;
        self.outcome = Some(GameOutcome { victorious, reason });
        self.resolve_stack.clear();
        info!(?victorious, ?reason, "match finished");

        self.broadcast(OutgoingMessage::GameFinished { victorious, reason });
        self.post_event(GameFinishedArgs { victorious });
        Ok(())
    }

    /// Concede the match to the opponent.
    pub fn surrender(&mut self, player: PlayerId) -> Result<IntentOutcome> {
        if !self.is_running() {
            return Ok(IntentOutcome::Rejected(RejectReason::MatchNotRunning));
        }
        self.finish_game(Some(player.opponent()), FinishReason::Surrender)?;
        Ok(IntentOutcome::Applied)
    }

    /// Draw the top unit card of `player`'s deck, if their hand has room.
    pub fn draw_unit_card(&mut self, player: PlayerId) -> Result<Option<CardId>> {
        self.draw_card_of_type(player, CardType::Unit, self.config.unit_hand_size)
    }

    /// Draw the top spell card of `player`'s deck, if their hand has room.
    pub fn draw_spell_card(&mut self, player: PlayerId) -> Result<Option<CardId>> {
        self.draw_card_of_type(player, CardType::Spell, self.config.spell_hand_size)
    }

    fn draw_card_of_type(&mut self, player: PlayerId, card_type: CardType, limit: usize) -> Result<Option<CardId>> {
        if self.hand_count(player, card_type) >= limit {
            debug!(%player, ?card_type, "hand full, nothing drawn");
            return Ok(None);
        }
        let top = self
            .zones
            .cards_in(CardLocation::Deck(player))
            .iter()
            .rev()
            .copied()
            .find(|&card| self.card(card).is_some_and(|c| c.card_type() == card_type));
        let Some(card) = top else {
            return Ok(None);
        };
        self.move_card(card, CardLocation::Hand(player), ZonePosition::Top)?;
        self.post_event(CardDrawnArgs { card, owner: player });
        Ok(Some(card))
    }

    /// Cards of `card_type` in `player`'s hand.
    #[must_use]
    pub fn hand_count(&self, player: PlayerId, card_type: CardType) -> usize {
        self.zones
            .cards_in(CardLocation::Hand(player))
            .iter()
            .filter(|&&card| self.card(card).is_some_and(|c| c.card_type() == card_type))
            .count()
    }

    pub fn set_unit_mana(&mut self, player: PlayerId, mana: u32) {
        let state = &mut self.players[player];
        if state.unit_mana != mana {
            state.unit_mana = mana;
            self.send_mana(player);
        }
    }

    pub fn set_spell_mana(&mut self, player: PlayerId, mana: u32) {
        let state = &mut self.players[player];
        if state.spell_mana != mana {
            state.spell_mana = mana;
            self.send_mana(player);
        }
    }

    fn send_mana(&mut self, player: PlayerId) {
        let state = &self.players[player];
        let message = OutgoingMessage::ManaChanged {
            player,
            unit_mana: state.unit_mana,
            spell_mana: state.spell_mana,
        };
        self.broadcast(message);
    }

    pub fn set_morale(&mut self, player: PlayerId, morale: u32) {
        if self.players[player].morale == morale {
            return;
        }
        self.players[player].morale = morale;
        debug!(%player, morale, "morale changed");
        self.broadcast(OutgoingMessage::MoraleChanged { player, morale });
    }
}
