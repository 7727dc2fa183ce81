//! Outgoing messages.
//!
//! Every message is one variant of [`OutgoingMessage`], serialized as a
//! `{"type": ..., "data": ...}` envelope. Mutations queue messages in the
//! match's [`Outbox`]; the host drains it after each intent and delivers
//! them over whatever transport it uses.
//!
//! ```
//! use ccg_rules::core::CardId;
//! use ccg_rules::net::OutgoingMessage;
//!
//! let message = OutgoingMessage::UnitRemoved { card: CardId(4) };
//! let json = serde_json::to_value(&message).unwrap();
//! assert_eq!(json["type"], "board/unitRemoved");
//! assert_eq!(json["data"]["card"], 4);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::combat::DamageSource;
use crate::core::{BuffId, CardId, Game, PlayerId, Result};
use crate::rules::FinishReason;
use crate::targeting::{CardTarget, TargetMode};
use crate::zones::CardLocation;

use super::messages::{BuffView, CardMessage, CardView, GameSnapshot, HiddenCardMessage, StatsMessage, UnitMessage};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all_fields = "camelCase")]
pub enum OutgoingMessage {
    #[serde(rename = "game/snapshot")]
    Snapshot(Box<GameSnapshot>),
    #[serde(rename = "game/started")]
    GameStarted,
    #[serde(rename = "game/finished")]
    GameFinished {
        victorious: Option<PlayerId>,
        reason: FinishReason,
    },
    #[serde(rename = "game/destroyed")]
    GameDestroyed { reason: String },
    #[serde(rename = "game/mulliganStarted")]
    MulliganStarted { count: usize },
    #[serde(rename = "game/roundStarted")]
    RoundStarted { round: u32 },
    #[serde(rename = "game/roundEnded")]
    RoundEnded { round: u32, victorious: Option<PlayerId> },
    #[serde(rename = "game/turnStarted")]
    TurnStarted { player: PlayerId, turn: u32 },
    #[serde(rename = "game/turnEnded")]
    TurnEnded { player: PlayerId, passed: bool },

    #[serde(rename = "player/manaChanged")]
    ManaChanged {
        player: PlayerId,
        unit_mana: u32,
        spell_mana: u32,
    },
    #[serde(rename = "player/moraleChanged")]
    MoraleChanged { player: PlayerId, morale: u32 },

    #[serde(rename = "card/moved")]
    CardMoved {
        card: CardView,
        from: Option<CardLocation>,
        to: CardLocation,
    },
    #[serde(rename = "card/played")]
    CardPlayed { card: CardView, row: usize, index: usize },
    #[serde(rename = "card/revealed")]
    CardRevealed(CardMessage),
    #[serde(rename = "card/statsChanged")]
    CardStatsChanged { card: CardId, stats: StatsMessage },
    /// Something changed on a card the receiver may not see.
    #[serde(rename = "card/hiddenChanged")]
    HiddenCardChanged(HiddenCardMessage),
    /// Damage animation request, sent before the stats change.
    #[serde(rename = "card/hit")]
    CardHit {
        card: CardId,
        source: DamageSource,
        value: i32,
    },
    #[serde(rename = "card/healed")]
    CardHealed { card: CardId, value: i32 },
    #[serde(rename = "card/destroyed")]
    CardDestroyed { card: CardId },
    #[serde(rename = "card/buffAdded")]
    BuffAdded(BuffView),
    #[serde(rename = "card/buffUpdated")]
    BuffUpdated(BuffView),
    #[serde(rename = "card/buffRemoved")]
    BuffRemoved { card: CardId, buff: BuffId },

    #[serde(rename = "board/unitCreated")]
    UnitCreated(UnitMessage),
    #[serde(rename = "board/unitMoved")]
    UnitMoved { card: CardId, row: usize, index: usize },
    #[serde(rename = "board/unitRemoved")]
    UnitRemoved { card: CardId },
    #[serde(rename = "board/rowOwnerChanged")]
    RowOwnerChanged { row: usize, owner: Option<PlayerId> },

    #[serde(rename = "resolve/started")]
    ResolveStarted { card: CardView },
    #[serde(rename = "resolve/finished")]
    ResolveFinished { card: CardId },
    #[serde(rename = "targets/requested")]
    TargetsRequested {
        mode: TargetMode,
        source: Option<CardId>,
        targets: Vec<CardTarget>,
    },
    #[serde(rename = "targets/opponentSelecting")]
    OpponentSelecting { source: Option<CardId> },
    #[serde(rename = "targets/selected")]
    TargetSelected { target: CardTarget },
}

/// A message addressed to one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub to: PlayerId,
    pub message: OutgoingMessage,
}

/// Queue of messages not yet handed to the transport.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    queue: Vec<Delivery>,
}

impl Outbox {
    pub fn push(&mut self, to: PlayerId, message: OutgoingMessage) {
        self.queue.push(Delivery { to, message });
    }

    pub fn drain(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.queue)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Delivery> {
        self.queue.iter()
    }
}

impl Game {
    pub(crate) fn send(&mut self, to: PlayerId, message: OutgoingMessage) {
        trace!(%to, ?message, "message queued");
        self.outbox.push(to, message);
    }

    pub(crate) fn broadcast(&mut self, message: OutgoingMessage) {
        self.send(PlayerId::FIRST, message.clone());
        self.send(PlayerId::SECOND, message);
    }

    /// Send a message about `card` to both players. A player who cannot see
    /// the card gets the redacted variant.
    pub(crate) fn broadcast_card_update(&mut self, card: CardId, message: OutgoingMessage) -> Result<()> {
        self.card_checked(card)?;
        for viewer in PlayerId::all() {
            let message = if self.is_visible_to(card, viewer) {
                message.clone()
            } else {
                self.redact(card, &message)?
            };
            self.send(viewer, message);
        }
        Ok(())
    }

    /// Strip a card update down to what an opponent may know. Buff removals
    /// and hits carry only ids and the incoming value and pass unchanged.
    fn redact(&self, card: CardId, message: &OutgoingMessage) -> Result<OutgoingMessage> {
        Ok(match message {
            OutgoingMessage::BuffAdded(buff) => {
                OutgoingMessage::BuffAdded(BuffView::Hidden(self.hidden_buff_message(card, buff.id())?))
            }
            OutgoingMessage::BuffUpdated(buff) => {
                OutgoingMessage::BuffUpdated(BuffView::Hidden(self.hidden_buff_message(card, buff.id())?))
            }
            OutgoingMessage::CardStatsChanged { .. } | OutgoingMessage::CardHealed { .. } => {
                OutgoingMessage::HiddenCardChanged(self.hidden_card_message(card)?)
            }
            other => other.clone(),
        })
    }

    pub(crate) fn send_stats(&mut self, card: CardId) -> Result<()> {
        let stats = self.stats_message(card)?;
        self.broadcast_card_update(card, OutgoingMessage::CardStatsChanged { card, stats })
    }

    pub(crate) fn send_card_moved(
        &mut self,
        card: CardId,
        from: Option<CardLocation>,
        to: CardLocation,
    ) -> Result<()> {
        for viewer in PlayerId::all() {
            let card = self.card_view(card, viewer)?;
            self.send(viewer, OutgoingMessage::CardMoved { card, from, to });
        }
        Ok(())
    }

    /// Queue a fresh snapshot for `player`.
    pub fn send_snapshot(&mut self, player: PlayerId) -> Result<()> {
        let snapshot = self.snapshot_for(player)?;
        self.send(player, OutgoingMessage::Snapshot(Box::new(snapshot)));
        Ok(())
    }

    /// Take every queued message.
    pub fn drain_messages(&mut self) -> Vec<Delivery> {
        self.outbox.drain()
    }

    /// Queued messages, oldest first.
    #[must_use]
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }
}
