//! Per-match state.
//!
//! [`Game`] owns everything one match needs: players, card instances, zones,
//! the board, the subscription registry, the resolution stack and the outbox
//! of messages for connected clients. All mutation of a match goes through
//! `&mut Game` on a single thread; cross-card effects use its zone and board
//! operations rather than touching other cards directly.
//!
//! Behavior is spread across the modules that own each concern: event
//! dispatch in `events`, card play in `stack`, damage in `combat`, turn flow
//! in `rules`, and so on. This file holds the data and read accessors.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::config::GameConfig;
use super::entity::{BuffId, CardId, IdAllocator};
use super::error::{GameError, Result};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, CardLibrary};
use crate::events::EventBus;
use crate::net::Outbox;
use crate::rules::GameOutcome;
use crate::stack::ResolveStack;
use crate::targeting::CardTarget;
use crate::zones::{Board, CardLocation, ZoneManager};

/// Coarse match phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Decks loaded, match not started.
    Setup,
    /// Players replace cards from their opening hand.
    Mulligan,
    /// Normal play.
    Deploy,
    /// A winner (or draw) has been decided.
    Finished,
    /// Torn down after a structural failure.
    Destroyed,
}

/// Seat-level state of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInGame {
    pub(crate) id: PlayerId,
    pub(crate) morale: u32,
    pub(crate) unit_mana: u32,
    pub(crate) spell_mana: u32,
    pub(crate) turn_ended: bool,
    pub(crate) round_ended: bool,
    pub(crate) cards_played_this_turn: u32,
    pub(crate) mulligan_picks: Vec<CardTarget>,
    pub(crate) mulligan_confirmed: bool,
}

impl PlayerInGame {
    pub(crate) fn new(id: PlayerId, config: &GameConfig) -> Self {
        Self {
            id,
            morale: config.starting_morale,
            unit_mana: 0,
            spell_mana: 0,
            turn_ended: false,
            round_ended: false,
            cards_played_this_turn: 0,
            mulligan_picks: Vec::new(),
            mulligan_confirmed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn morale(&self) -> u32 {
        self.morale
    }

    #[must_use]
    pub fn unit_mana(&self) -> u32 {
        self.unit_mana
    }

    #[must_use]
    pub fn spell_mana(&self) -> u32 {
        self.spell_mana
    }

    #[must_use]
    pub fn turn_ended(&self) -> bool {
        self.turn_ended
    }

    /// Whether the player has passed for the rest of the round.
    #[must_use]
    pub fn round_ended(&self) -> bool {
        self.round_ended
    }

    #[must_use]
    pub fn cards_played_this_turn(&self) -> u32 {
        self.cards_played_this_turn
    }

    #[must_use]
    pub fn mulligan_confirmed(&self) -> bool {
        self.mulligan_confirmed
    }
}

/// One entry of the played-cards history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub card: CardId,
    pub player: PlayerId,
    pub turn: u32,
    pub round: u32,
}

/// The authoritative state of one match.
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) library: Arc<CardLibrary>,
    pub(crate) players: PlayerMap<PlayerInGame>,
    pub(crate) cards: FxHashMap<CardId, Card>,
    pub(crate) buff_owners: FxHashMap<BuffId, CardId>,
    pub(crate) zones: ZoneManager,
    pub(crate) board: Board,
    pub(crate) events: EventBus,
    pub(crate) resolve_stack: ResolveStack,
    pub(crate) played_cards: Vec<PlayedCard>,
    /// Orders issued during the current turn.
    pub(crate) turn_orders: Vec<CardTarget>,
    pub(crate) rng: GameRng,
    pub(crate) outbox: Outbox,
    pub(crate) ids: IdAllocator,
    pub(crate) phase: GamePhase,
    pub(crate) active_player: PlayerId,
    pub(crate) turn: u32,
    pub(crate) round: u32,
    pub(crate) outcome: Option<GameOutcome>,
}

impl Game {
    /// Create an empty match using cards from `library`.
    ///
    /// Load decks with [`Game::load_deck`], then call [`Game::start`].
    #[must_use]
    pub fn new(config: GameConfig, library: Arc<CardLibrary>) -> Self {
        let players = PlayerMap::new(|player| PlayerInGame::new(player, &config));
        Self {
            board: Board::new(&config),
            rng: GameRng::new(config.rng_seed),
            config,
            library,
            players,
            cards: FxHashMap::default(),
            buff_owners: FxHashMap::default(),
            zones: ZoneManager::new(),
            events: EventBus::new(),
            resolve_stack: ResolveStack::new(),
            played_cards: Vec::new(),
            turn_orders: Vec::new(),
            outbox: Outbox::default(),
            ids: IdAllocator::default(),
            phase: GamePhase::Setup,
            active_player: PlayerId::FIRST,
            turn: 0,
            round: 0,
            outcome: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn library(&self) -> &CardLibrary {
        &self.library
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerInGame {
        &self.players[player]
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Card lookup that treats a missing card as a structural error.
    pub fn card_checked(&self, id: CardId) -> Result<&Card> {
        self.cards.get(&id).ok_or(GameError::CardNotFound(id))
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards.get_mut(&id).ok_or(GameError::CardNotFound(id))
    }

    /// Every card instance in the match, in no particular order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    #[must_use]
    pub fn card_location(&self, id: CardId) -> Option<CardLocation> {
        self.zones.location(id)
    }

    /// Owner of a card, or `None` for unowned cards.
    #[must_use]
    pub fn card_owner(&self, id: CardId) -> Option<PlayerId> {
        self.cards.get(&id).and_then(Card::owner)
    }

    /// Card carrying a buff.
    #[must_use]
    pub fn buff_card(&self, buff: BuffId) -> Option<CardId> {
        self.buff_owners.get(&buff).copied()
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneManager {
        &self.zones
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscription registry, for subscriptions made outside card scripts.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    #[must_use]
    pub fn resolve_stack(&self) -> &ResolveStack {
        &self.resolve_stack
    }

    #[must_use]
    pub fn played_cards(&self) -> &[PlayedCard] {
        &self.played_cards
    }

    /// Orders issued so far this turn.
    #[must_use]
    pub fn turn_orders(&self) -> &[CardTarget] {
        &self.turn_orders
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    /// Turn counter across the whole match, starting at 1.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Round counter, starting at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Whether intents are still accepted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, GamePhase::Finished | GamePhase::Destroyed)
    }

    /// Whether `player` owes a target selection before doing anything else.
    #[must_use]
    pub fn target_required(&self, player: PlayerId) -> bool {
        self.resolve_stack
            .current()
            .is_some_and(|entry| entry.owner == player)
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("turn", &self.turn)
            .field("active_player", &self.active_player)
            .field("cards", &self.cards.len())
            .field("events", &self.events)
            .field("resolve_stack", &self.resolve_stack.depth())
            .finish()
    }
}
