//! Card play and resolution.
//!
//! A played card goes through `Announced → AwaitingTargets → resolved`. The
//! match never blocks waiting for a player: when a card needs a target the
//! owner is sent a request and control returns to the host. The answer comes
//! back later through [`Game::select_card_target`], which picks up where the
//! card left off.
//!
//! Anything that can post an event may start a nested resolution. After such
//! a call the code re-checks which entry is current instead of assuming it is
//! still its own; an entry that is not on top waits until the ones above it
//! are gone and is then resumed by [`Game::resume_pending_resolutions`].

use tracing::{debug, info};

use crate::core::{CardId, Game, GameError, GamePhase, PlayedCard, PlayerId, Result};
use crate::events::{
    CardPlayedArgs, CardResolvedArgs, CardTargetSelectedCardArgs, CardTargetSelectedLibraryCardArgs,
    CardTargetSelectedPositionArgs, CardTargetSelectedRowArgs, CardTargetSelectedUnitArgs,
    CardTargetsConfirmedArgs, SpellDeployedArgs, UnitDeployedArgs, UnitOrderedRowArgs, UnitOrderedUnitArgs,
};
use crate::net::{CardView, IntentOutcome, OutgoingMessage, RejectReason};
use crate::targeting::{CardTarget, TargetMode, TargetSubject};
use crate::zones::{CardLocation, ZonePosition};

use super::resolve::ResolveState;

/// Mana is never negative; costs below zero count as free.
fn mana_cost(cost: i32) -> u32 {
    u32::try_from(cost).unwrap_or(0)
}

impl Game {
    /// Play `card` from `player`'s hand onto `row` (units) or the stack
    /// (spells), paying its mana costs.
    pub fn play_card(&mut self, player: PlayerId, card: CardId, row: usize, index: usize) -> Result<IntentOutcome> {
        if let Some(reason) = self.check_play(player, card, row)? {
            debug!(%player, %card, row, ?reason, "play rejected");
            return Ok(IntentOutcome::Rejected(reason));
        }

        let played = self.card_checked(card)?;
        let (unit_cost, spell_cost) = (mana_cost(played.unit_cost()), mana_cost(played.spell_cost()));
        let state = &self.players[player];
        let (unit_mana, spell_mana) = (state.unit_mana - unit_cost, state.spell_mana - spell_cost);
        self.set_unit_mana(player, unit_mana);
        self.set_spell_mana(player, spell_mana);
        self.players[player].cards_played_this_turn += 1;

        self.force_play_card(card, row, index)?;
        self.resume_pending_resolutions()?;
        Ok(IntentOutcome::Applied)
    }

    fn check_play(&self, player: PlayerId, card: CardId, row: usize) -> Result<Option<RejectReason>> {
        if !self.is_running() {
            return Ok(Some(RejectReason::MatchNotRunning));
        }
        if self.phase != GamePhase::Deploy {
            return Ok(Some(RejectReason::WrongPhase));
        }
        if self.active_player != player {
            return Ok(Some(RejectReason::NotYourTurn));
        }
        if !self.resolve_stack.is_empty() {
            return Ok(Some(RejectReason::TargetRequired));
        }
        if !self.zones.is_in(card, CardLocation::Hand(player)) {
            return Ok(Some(RejectReason::CardNotInHand));
        }

        let played = self.card_checked(card)?;
        let state = &self.players[player];
        if state.unit_mana < mana_cost(played.unit_cost()) || state.spell_mana < mana_cost(played.spell_cost()) {
            return Ok(Some(RejectReason::NotEnoughMana));
        }

        let placements: Vec<CardTarget> = self
            .valid_targets(TargetMode::CardPlay, Some(card), player, &[])
            .into_iter()
            .filter(|t| matches!(t.subject, TargetSubject::Row { .. } | TargetSubject::Position { .. }))
            .collect();
        let row_allowed = placements.iter().any(|t| t.subject.row() == Some(row));
        if !row_allowed && (played.is_unit() || !placements.is_empty()) {
            return Ok(Some(RejectReason::InvalidRow));
        }
        Ok(None)
    }

    /// Play a card from its owner's hand or deck without checks or mana.
    ///
    /// Used by card scripts that play other cards. The caller is responsible
    /// for resuming resolutions left pending below the new one; inside a
    /// running intent that happens automatically.
    pub fn force_play_card(&mut self, card: CardId, row: usize, index: usize) -> Result<()> {
        let played = self.card_checked(card)?;
        let owner = played
            .owner()
            .ok_or_else(|| GameError::Invariant(format!("{card} has no owner to play for")))?;
        let is_unit = played.is_unit();
        match self.card_location(card) {
            Some(CardLocation::Hand(p) | CardLocation::Deck(p)) if p == owner => {}
            other => {
                return Err(GameError::Invariant(format!("{card} cannot be played from {other:?}")));
            }
        }

        self.played_cards.push(PlayedCard {
            card,
            player: owner,
            turn: self.turn,
            round: self.round,
        });
        info!(%card, %owner, row, index, "card played");
        let view = CardView::Visible(self.card_message(card)?);
        self.broadcast(OutgoingMessage::CardPlayed { card: view, row, index });
        self.post_event(CardPlayedArgs {
            card,
            owner,
            row,
            index,
        });

        if is_unit {
            self.play_unit(card, owner, row, index)
        } else {
            self.play_spell(card, owner)
        }
    }

    fn play_unit(&mut self, card: CardId, owner: PlayerId, row: usize, index: usize) -> Result<()> {
        self.start_resolving(card, owner)?;
        match self.create_unit(card, row, index)? {
            Some(position) => {
                self.post_event(UnitDeployedArgs {
                    card,
                    owner,
                    row: position.row,
                    index: position.index,
                });
                self.resume_if_current(card)
            }
            None => {
                debug!(%card, row, "no room to deploy, unit discarded");
                self.move_card(card, CardLocation::Graveyard(owner), ZonePosition::Top)?;
                self.finish_resolving(card)
            }
        }
    }

    fn play_spell(&mut self, card: CardId, owner: PlayerId) -> Result<()> {
        self.start_resolving(card, owner)?;
        self.move_card(card, CardLocation::Stack, ZonePosition::Top)?;
        self.post_event(SpellDeployedArgs { card, owner });
        self.resume_if_current(card)
    }

    /// Push a resolution for `card`. It becomes the current entry.
    pub fn start_resolving(&mut self, card: CardId, owner: PlayerId) -> Result<()> {
        if self.resolve_stack.contains(card) {
            return Err(GameError::Invariant(format!("{card} is already resolving")));
        }
        self.resolve_stack.push(card, owner);
        debug!(%card, %owner, depth = self.resolve_stack.depth(), "resolution started");
        let view = CardView::Visible(self.card_message(card)?);
        self.broadcast(OutgoingMessage::ResolveStarted { card: view });
        Ok(())
    }

    /// Compute the deploy-effect targets still open for the current entry.
    ///
    /// With none left the entry is finished (or marked to finish once the
    /// entries above it are gone). Otherwise the owner is asked to pick.
    pub fn check_card_targeting(&mut self, card: CardId) -> Result<()> {
        let entry = self
            .resolve_stack
            .current()
            .filter(|entry| entry.card == card)
            .ok_or_else(|| GameError::Invariant(format!("{card} is not the resolving card")))?;
        let owner = entry.owner;
        let confirmed = entry.targets.clone();
        let targets = self.valid_targets(TargetMode::DeployEffect, Some(card), owner, &confirmed);

        if !targets.is_empty() {
            self.set_resolve_state(ResolveState::AwaitingTargets);
            debug!(%card, count = targets.len(), "awaiting targets");
            self.send(
                owner,
                OutgoingMessage::TargetsRequested {
                    mode: TargetMode::DeployEffect,
                    source: Some(card),
                    targets,
                },
            );
            self.send(owner.opponent(), OutgoingMessage::OpponentSelecting { source: Some(card) });
            return Ok(());
        }

        self.set_resolve_state(ResolveState::Finishing);
        if !confirmed.is_empty() {
            self.post_event(CardTargetsConfirmedArgs {
                source: card,
                owner,
                targets: confirmed,
            });
        }
        if self.resolve_stack.is_current(card) {
            self.finish_resolving(card)?;
        }
        Ok(())
    }

    /// Pop the current entry for `card` and post `CardResolved`. A spell still
    /// on the stack goes to its owner's graveyard.
    pub fn finish_resolving(&mut self, card: CardId) -> Result<()> {
        if !self.resolve_stack.is_current(card) {
            return Err(GameError::Invariant(format!("{card} is not the resolving card")));
        }
        let entry = self
            .resolve_stack
            .pop()
            .ok_or_else(|| GameError::Invariant("resolve stack emptied underneath".into()))?;
        debug!(%card, depth = self.resolve_stack.depth(), "resolution finished");

        self.post_event(CardResolvedArgs {
            card,
            owner: entry.owner,
        });
        if self.zones.is_in(card, CardLocation::Stack) {
            self.move_card(card, CardLocation::Graveyard(entry.owner), ZonePosition::Top)?;
        }
        self.broadcast(OutgoingMessage::ResolveFinished { card });
        Ok(())
    }

    /// Answer the current target request.
    ///
    /// The pick is checked against a freshly computed list. A stale pick is
    /// rejected and the refreshed list is sent back to the player.
    pub fn select_card_target(&mut self, player: PlayerId, target: CardTarget) -> Result<IntentOutcome> {
        if !self.is_running() {
            return Ok(IntentOutcome::Rejected(RejectReason::MatchNotRunning));
        }
        let Some(entry) = self.resolve_stack.current() else {
            return Ok(IntentOutcome::Rejected(RejectReason::NothingToTarget));
        };
        if entry.owner != player {
            return Ok(IntentOutcome::Rejected(RejectReason::NotYourTurn));
        }
        if !entry.is_awaiting_targets() {
            return Ok(IntentOutcome::Rejected(RejectReason::NothingToTarget));
        }
        let card = entry.card;
        let valid = self.valid_targets(TargetMode::DeployEffect, Some(card), player, &entry.targets);

        let Some(chosen) = valid.iter().find(|t| **t == target).cloned() else {
            debug!(%player, %card, "stale target");
            if valid.is_empty() {
                self.set_resolve_state(ResolveState::Announced);
                self.resume_pending_resolutions()?;
            } else {
                self.resend_target_request(player);
            }
            return Ok(IntentOutcome::Rejected(RejectReason::StaleTarget));
        };

        if let Some(entry) = self.resolve_stack.current_mut() {
            entry.targets.push(chosen.clone());
            entry.state = ResolveState::Announced;
        }
        info!(%player, %card, subject = ?chosen.subject, "target selected");
        self.broadcast(OutgoingMessage::TargetSelected { target: chosen.clone() });
        self.post_target_selected(card, player, &chosen.subject);
        self.resume_pending_resolutions()?;
        Ok(IntentOutcome::Applied)
    }

    /// A unit is also a card: unit picks post the card event first.
    fn post_target_selected(&mut self, source: CardId, owner: PlayerId, subject: &TargetSubject) {
        match *subject {
            TargetSubject::Unit { card } => {
                self.post_event(CardTargetSelectedCardArgs {
                    source,
                    owner,
                    target: card,
                });
                self.post_event(CardTargetSelectedUnitArgs {
                    source,
                    owner,
                    target: card,
                });
            }
            TargetSubject::Card { card } => self.post_event(CardTargetSelectedCardArgs {
                source,
                owner,
                target: card,
            }),
            TargetSubject::Row { row } => self.post_event(CardTargetSelectedRowArgs { source, owner, row }),
            TargetSubject::Position { row, index } => self.post_event(CardTargetSelectedPositionArgs {
                source,
                owner,
                row,
                index,
            }),
            TargetSubject::LibraryCard { ref class } => self.post_event(CardTargetSelectedLibraryCardArgs {
                source,
                owner,
                class: class.clone(),
            }),
        }
    }

    /// Drive `card`'s resolution while it stays the current entry.
    pub(crate) fn resume_if_current(&mut self, card: CardId) -> Result<()> {
        while let Some(entry) = self.resolve_stack.current() {
            if entry.card != card {
                break;
            }
            match entry.state {
                ResolveState::Announced => self.check_card_targeting(card)?,
                ResolveState::Finishing => self.finish_resolving(card)?,
                ResolveState::AwaitingTargets => break,
            }
        }
        Ok(())
    }

    /// Drive whatever is on top of the stack until it is empty or waiting on
    /// a player.
    pub fn resume_pending_resolutions(&mut self) -> Result<()> {
        while let Some(entry) = self.resolve_stack.current() {
            if !self.is_running() {
                break;
            }
            let card = entry.card;
            match entry.state {
                ResolveState::Announced => self.check_card_targeting(card)?,
                ResolveState::Finishing => self.finish_resolving(card)?,
                ResolveState::AwaitingTargets => break,
            }
        }
        Ok(())
    }

    fn set_resolve_state(&mut self, state: ResolveState) {
        if let Some(entry) = self.resolve_stack.current_mut() {
            entry.state = state;
        }
    }

    /// Send `player` the targets they currently owe, if any.
    pub(crate) fn resend_target_request(&mut self, player: PlayerId) {
        if let Some(request) = self.pending_target_request(player) {
            self.send(
                player,
                OutgoingMessage::TargetsRequested {
                    mode: request.mode,
                    source: request.source,
                    targets: request.targets,
                },
            );
        }
    }

    /// Issue a unit order, such as an attack.
    pub fn order_unit(&mut self, player: PlayerId, target: CardTarget) -> Result<IntentOutcome> {
        let reject = |reason| Ok(IntentOutcome::Rejected(reason));
        if !self.is_running() {
            return reject(RejectReason::MatchNotRunning);
        }
        if self.phase != GamePhase::Deploy {
            return reject(RejectReason::WrongPhase);
        }
        if self.active_player != player {
            return reject(RejectReason::NotYourTurn);
        }
        if !self.resolve_stack.is_empty() {
            return reject(RejectReason::TargetRequired);
        }
        let (TargetMode::UnitOrder, Some(unit)) = (target.mode, target.source) else {
            return reject(RejectReason::InvalidTarget);
        };
        let commandable = self.card(unit).is_some_and(|c| c.is_unit() && c.owner() == Some(player))
            && self.board.find_unit(unit).is_some();
        if !commandable {
            return reject(RejectReason::NotYourUnit);
        }

        let previous: Vec<CardTarget> = self
            .turn_orders
            .iter()
            .filter(|order| order.source == Some(unit))
            .cloned()
            .collect();
        let Some(chosen) = self
            .valid_targets(TargetMode::UnitOrder, Some(unit), player, &previous)
            .into_iter()
            .find(|t| *t == target)
        else {
            return reject(RejectReason::InvalidTarget);
        };

        self.turn_orders.push(chosen.clone());
        info!(%player, %unit, subject = ?chosen.subject, "unit ordered");
        self.broadcast(OutgoingMessage::TargetSelected { target: chosen.clone() });
        match chosen.subject {
            TargetSubject::Unit { card } => self.post_event(UnitOrderedUnitArgs {
                unit,
                owner: player,
                target: card,
            }),
            TargetSubject::Row { row } | TargetSubject::Position { row, .. } => {
                self.post_event(UnitOrderedRowArgs {
                    unit,
                    owner: player,
                    row,
                });
            }
            TargetSubject::Card { .. } | TargetSubject::LibraryCard { .. } => {
                debug!(%unit, "order subject has no order event");
            }
        }
        self.resume_pending_resolutions()?;
        Ok(IntentOutcome::Applied)
    }
}
