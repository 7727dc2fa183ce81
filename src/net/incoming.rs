//! Incoming intents.
//!
//! Clients send one [`IncomingIntent`] per message. Dispatch is an exhaustive
//! match, so adding an intent kind is a compile error until it is handled.
//! An illegal intent is not an error: it is rejected with a reason and the
//! player receives a fresh snapshot to resync from.
//!
//! ```
//! use ccg_rules::core::CardId;
//! use ccg_rules::net::IncomingIntent;
//!
//! let intent: IncomingIntent =
//!     serde_json::from_str(r#"{"type":"playCard","data":{"card":4,"row":3,"index":0}}"#).unwrap();
//! assert_eq!(intent, IncomingIntent::PlayCard { card: CardId(4), row: 3, index: 0 });
//!
//! let end: IncomingIntent = serde_json::from_str(r#"{"type":"endTurn"}"#).unwrap();
//! assert_eq!(end, IncomingIntent::EndTurn);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::core::{CardId, Game, GamePhase, PlayerId, Result};
use crate::rules::{FinishReason, GameOutcome};
use crate::targeting::{CardTarget, TargetMode};

use super::outgoing::OutgoingMessage;

/// Something a player asks the match to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum IncomingIntent {
    PlayCard { card: CardId, row: usize, index: usize },
    /// Answer a target request, including mulligan picks.
    SelectTarget { target: CardTarget },
    /// End the turn, or confirm the mulligan.
    EndTurn,
    Surrender,
    UnitOrder { target: CardTarget },
}

/// Why an intent was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    MatchNotRunning,
    WrongPhase,
    NotYourTurn,
    /// A resolution is waiting on a target.
    TargetRequired,
    CardNotInHand,
    NotEnoughMana,
    InvalidRow,
    InvalidTarget,
    /// The target was valid when requested but no longer is.
    StaleTarget,
    NotYourUnit,
    NothingToTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentOutcome {
    Applied,
    Rejected(RejectReason),
}

impl IntentOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == IntentOutcome::Applied
    }
}

impl Game {
    /// Apply one intent from `player`.
    ///
    /// A rejected intent leaves the match untouched and queues a snapshot for
    /// the player. An `Err` means the match state could not be trusted; the
    /// host decides whether to [`destroy_match`](Self::destroy_match).
    pub fn handle_intent(&mut self, player: PlayerId, intent: IncomingIntent) -> Result<IntentOutcome> {
        debug!(%player, ?intent, "intent received");
        let outcome = match intent {
            IncomingIntent::PlayCard { card, row, index } => self.play_card(player, card, row, index),
            IncomingIntent::SelectTarget { target } if target.mode == TargetMode::Mulligan => {
                self.select_mulligan_target(player, target)
            }
            IncomingIntent::SelectTarget { target } => self.select_card_target(player, target),
            IncomingIntent::EndTurn => self.end_turn(player),
            IncomingIntent::Surrender => self.surrender(player),
            IncomingIntent::UnitOrder { target } => self.order_unit(player, target),
        };

        match outcome {
            Ok(IntentOutcome::Rejected(reason)) => {
                debug!(%player, ?reason, "intent rejected, resyncing");
                self.send_snapshot(player)?;
                Ok(IntentOutcome::Rejected(reason))
            }
            Ok(IntentOutcome::Applied) => Ok(IntentOutcome::Applied),
            Err(err) => {
                error!(%player, %err, "intent failed");
                Err(err)
            }
        }
    }

    /// Parse a raw client message and apply it.
    pub fn handle_message(&mut self, player: PlayerId, raw: &str) -> Result<IntentOutcome> {
        let intent: IncomingIntent = serde_json::from_str(raw).map_err(|err| {
            error!(%player, %err, "malformed message");
            err
        })?;
        self.handle_intent(player, intent)
    }

    /// Tear the match down and tell both players.
    pub fn destroy_match(&mut self, reason: impl Into<String>) {
        if self.phase == GamePhase::Destroyed {
            return;
        }
        let reason = reason.into();
        info!(%reason, "match destroyed");
        self.phase = GamePhase::Destroyed;
        self.outcome.get_or_insert(GameOutcome {
            victorious: None,
            reason: FinishReason::Destroyed,
        });
        self.resolve_stack.clear();
        self.broadcast(OutgoingMessage::GameDestroyed { reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::{TargetSubject, TargetType};

    #[test]
    fn test_intent_envelope() {
        let intent = IncomingIntent::UnitOrder {
            target: CardTarget::new(
                TargetMode::UnitOrder,
                TargetType::Unit,
                Some(CardId(1)),
                TargetSubject::Unit { card: CardId(2) },
            ),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "unitOrder");
        assert_eq!(json["data"]["target"]["subject"]["kind"], "unit");

        let back: IncomingIntent = serde_json::from_value(json).unwrap();
        assert_eq!(back, intent);
    }

    #[test]
    fn test_unknown_intent_is_malformed() {
        let result: std::result::Result<IncomingIntent, _> = serde_json::from_str(r#"{"type":"cheat"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(IntentOutcome::Applied.is_applied());
        assert!(!IntentOutcome::Rejected(RejectReason::StaleTarget).is_applied());
    }
}
