//! Client-facing views of match state.
//!
//! These are plain serializable models. A card the viewer may not see is
//! sent as a [`HiddenCardMessage`] carrying only its id, owner and location.

use serde::{Deserialize, Serialize};

use crate::buffs::{BuffAlignment, BuffSource};
use crate::cards::{CardColor, CardFaction, CardFeature, CardTribe, CardType};
use crate::core::{BuffId, CardId, Game, GameError, GamePhase, PlayerId, Result};
use crate::targeting::{CardTarget, TargetMode};
use crate::zones::CardLocation;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsMessage {
    pub power: i32,
    pub armor: i32,
    pub max_power: i32,
    pub max_armor: i32,
    pub attack: i32,
    pub unit_cost: i32,
    pub spell_cost: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffMessage {
    pub id: BuffId,
    pub card: CardId,
    pub class: String,
    pub alignment: BuffAlignment,
    pub intensity: u32,
    pub duration: Option<u32>,
}

/// A buff on a card the viewer may not see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenBuffMessage {
    pub id: BuffId,
    pub card: CardId,
    pub source: Option<CardId>,
}

/// A buff as one particular viewer may see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuffView {
    Visible(BuffMessage),
    Hidden(HiddenBuffMessage),
}

impl BuffView {
    #[must_use]
    pub fn id(&self) -> BuffId {
        match self {
            BuffView::Visible(buff) => buff.id,
            BuffView::Hidden(buff) => buff.id,
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, BuffView::Hidden(_))
    }
}

/// Full card view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMessage {
    pub id: CardId,
    pub class: String,
    pub name: String,
    pub card_type: CardType,
    pub color: CardColor,
    pub faction: CardFaction,
    pub owner: Option<PlayerId>,
    pub location: Option<CardLocation>,
    pub stats: StatsMessage,
    pub tribes: Vec<CardTribe>,
    pub features: Vec<CardFeature>,
    pub buffs: Vec<BuffMessage>,
    pub is_revealed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenCardMessage {
    pub id: CardId,
    pub owner: Option<PlayerId>,
    pub location: Option<CardLocation>,
}

/// A card as one particular viewer may see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardView {
    Visible(CardMessage),
    Hidden(HiddenCardMessage),
}

impl CardView {
    #[must_use]
    pub fn id(&self) -> CardId {
        match self {
            CardView::Visible(card) => card.id,
            CardView::Hidden(card) => card.id,
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, CardView::Hidden(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMessage {
    pub card: CardMessage,
    pub row: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowMessage {
    pub index: usize,
    pub owner: Option<PlayerId>,
    pub units: Vec<CardId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMessage {
    pub id: PlayerId,
    pub morale: u32,
    pub unit_mana: u32,
    pub spell_mana: u32,
    pub turn_ended: bool,
    pub round_ended: bool,
    pub hand_size: usize,
    pub deck_size: usize,
}

/// Targets the viewer owes an answer for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRequest {
    pub mode: TargetMode,
    pub source: Option<CardId>,
    pub targets: Vec<CardTarget>,
}

/// Everything one player may know about the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub viewer: PlayerId,
    pub phase: GamePhase,
    pub round: u32,
    pub turn: u32,
    pub active_player: PlayerId,
    pub players: Vec<PlayerMessage>,
    pub rows: Vec<RowMessage>,
    pub units: Vec<CardMessage>,
    pub hand: Vec<CardMessage>,
    pub opponent_hand: Vec<CardView>,
    pub graveyards: Vec<Vec<CardMessage>>,
    pub leaders: Vec<CardMessage>,
    /// Resolving cards, bottom first.
    pub stack: Vec<CardView>,
    pub pending_targets: Option<TargetRequest>,
}

impl Game {
    pub fn stats_message(&self, card: CardId) -> Result<StatsMessage> {
        let card = self.card_checked(card)?;
        Ok(StatsMessage {
            power: card.power(),
            armor: card.armor(),
            max_power: card.max_power(),
            max_armor: card.max_armor(),
            attack: card.attack(),
            unit_cost: card.unit_cost(),
            spell_cost: card.spell_cost(),
        })
    }

    pub fn buff_message(&self, card: CardId, buff: BuffId) -> Result<BuffMessage> {
        let buff = self
            .card_checked(card)?
            .buffs()
            .get(buff)
            .ok_or(GameError::BuffNotFound(buff))?;
        Ok(BuffMessage {
            id: buff.id(),
            card,
            class: buff.class().to_string(),
            alignment: buff.alignment(),
            intensity: buff.intensity(),
            duration: buff.duration(),
        })
    }

    pub fn hidden_buff_message(&self, card: CardId, buff: BuffId) -> Result<HiddenBuffMessage> {
        let buff = self
            .card_checked(card)?
            .buffs()
            .get(buff)
            .ok_or(GameError::BuffNotFound(buff))?;
        Ok(HiddenBuffMessage {
            id: buff.id(),
            card,
            source: match buff.source() {
                Some(BuffSource::Card(source)) => Some(source),
                _ => None,
            },
        })
    }

    pub fn card_message(&self, id: CardId) -> Result<CardMessage> {
        let card = self.card_checked(id)?;
        let definition = card.definition();
        Ok(CardMessage {
            id,
            class: definition.class.clone(),
            name: definition.name.clone(),
            card_type: definition.card_type,
            color: definition.color,
            faction: definition.faction,
            owner: card.owner(),
            location: self.card_location(id),
            stats: self.stats_message(id)?,
            tribes: card.tribes().to_vec(),
            features: card.features().to_vec(),
            buffs: card
                .buffs()
                .iter()
                .map(|b| self.buff_message(id, b.id()))
                .collect::<Result<_>>()?,
            is_revealed: card.is_revealed(),
        })
    }

    /// Whether `viewer` may see `card` where it currently is.
    #[must_use]
    pub fn is_visible_to(&self, card: CardId, viewer: PlayerId) -> bool {
        let Some(instance) = self.card(card) else {
            return false;
        };
        instance.owner() == Some(viewer)
            || instance.is_revealed()
            || self.card_location(card).map_or(true, CardLocation::is_public)
    }

    pub fn card_view(&self, card: CardId, viewer: PlayerId) -> Result<CardView> {
        if self.is_visible_to(card, viewer) {
            return self.card_message(card).map(CardView::Visible);
        }
        self.hidden_card_message(card).map(CardView::Hidden)
    }

    pub fn hidden_card_message(&self, card: CardId) -> Result<HiddenCardMessage> {
        let instance = self.card_checked(card)?;
        Ok(HiddenCardMessage {
            id: card,
            owner: instance.owner(),
            location: self.card_location(card),
        })
    }

    pub fn unit_message(&self, card: CardId) -> Result<UnitMessage> {
        let position = self.board.find_unit(card).ok_or(GameError::NotOnBoard(card))?;
        Ok(UnitMessage {
            card: self.card_message(card)?,
            row: position.row,
            index: position.index,
        })
    }

    fn player_message(&self, player: PlayerId) -> PlayerMessage {
        let state = &self.players[player];
        PlayerMessage {
            id: player,
            morale: state.morale,
            unit_mana: state.unit_mana,
            spell_mana: state.spell_mana,
            turn_ended: state.turn_ended,
            round_ended: state.round_ended,
            hand_size: self.zones.size(CardLocation::Hand(player)),
            deck_size: self.zones.size(CardLocation::Deck(player)),
        }
    }

    /// Targets `player` currently has to pick from, if any.
    #[must_use]
    pub fn pending_target_request(&self, player: PlayerId) -> Option<TargetRequest> {
        if self.phase == GamePhase::Mulligan {
            let state = &self.players[player];
            if state.mulligan_confirmed {
                return None;
            }
            let targets = self.valid_targets(TargetMode::Mulligan, None, player, &state.mulligan_picks);
            return Some(TargetRequest {
                mode: TargetMode::Mulligan,
                source: None,
                targets,
            });
        }
        let entry = self.resolve_stack.current()?;
        if entry.owner != player || !entry.is_awaiting_targets() {
            return None;
        }
        Some(TargetRequest {
            mode: TargetMode::DeployEffect,
            source: Some(entry.card),
            targets: self.valid_targets(TargetMode::DeployEffect, Some(entry.card), player, &entry.targets),
        })
    }

    /// Authoritative view of the match for `viewer`.
    pub fn snapshot_for(&self, viewer: PlayerId) -> Result<GameSnapshot> {
        let opponent = viewer.opponent();
        let messages = |location: CardLocation| -> Result<Vec<CardMessage>> {
            self.zones
                .cards_in(location)
                .iter()
                .map(|&card| self.card_message(card))
                .collect()
        };

        Ok(GameSnapshot {
            viewer,
            phase: self.phase,
            round: self.round,
            turn: self.turn,
            active_player: self.active_player,
            players: PlayerId::all().map(|p| self.player_message(p)).collect(),
            rows: self
                .board
                .rows()
                .iter()
                .map(|row| RowMessage {
                    index: row.index(),
                    owner: row.owner(),
                    units: row.units().to_vec(),
                })
                .collect(),
            units: self
                .board
                .all_units()
                .map(|unit| self.card_message(unit))
                .collect::<Result<_>>()?,
            hand: messages(CardLocation::Hand(viewer))?,
            opponent_hand: self
                .zones
                .cards_in(CardLocation::Hand(opponent))
                .iter()
                .map(|&card| self.card_view(card, viewer))
                .collect::<Result<_>>()?,
            graveyards: PlayerId::all()
                .map(|p| messages(CardLocation::Graveyard(p)))
                .collect::<Result<_>>()?,
            leaders: PlayerId::all()
                .map(|p| messages(CardLocation::Leader(p)))
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .flatten()
                .collect(),
            stack: self
                .resolve_stack
                .iter()
                .map(|entry| self.card_view(entry.card, viewer))
                .collect::<Result<_>>()?,
            pending_targets: self.pending_target_request(viewer),
        })
    }
}
