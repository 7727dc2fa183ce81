//! Game events.
//!
//! Every occurrence a card script can react to is a variant of [`GameEvent`]
//! carrying a typed argument struct. Subscriptions are keyed by the fieldless
//! [`EventType`] and receive the argument struct directly through the
//! [`EventPayload`] trait, so a callback registered for `UnitDeployedArgs`
//! can never observe a different event shape.
//!
//! ```
//! use ccg_rules::core::{CardId, PlayerId};
//! use ccg_rules::events::{EffectSource, EventPayload, EventType, GameEvent, UnitDeployedArgs};
//!
//! let event: GameEvent = UnitDeployedArgs {
//!     card: CardId(3),
//!     owner: PlayerId::FIRST,
//!     row: 4,
//!     index: 0,
//! }
//! .into();
//!
//! assert_eq!(event.event_type(), EventType::UnitDeployed);
//! assert_eq!(event.effect_source(), Some(EffectSource::Card(CardId(3))));
//! assert!(UnitDeployedArgs::extract(&event).is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::combat::DamageInstance;
use crate::core::{BuffId, CardId, PlayerId};
use crate::targeting::CardTarget;

/// The card or buff an event is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectSource {
    Card(CardId),
    Buff(BuffId),
}

/// Typed access to one event variant's arguments.
pub trait EventPayload: Into<GameEvent> + std::fmt::Debug + Send + Sync + 'static {
    const TYPE: EventType;

    /// Borrow the arguments if `event` is this variant.
    fn extract(event: &GameEvent) -> Option<&Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameStartedArgs;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundStartedArgs {
    pub round: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnStartedArgs {
    pub player: PlayerId,
    pub turn: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnEndedArgs {
    pub player: PlayerId,
    pub turn: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundEndedArgs {
    pub round: u32,
    /// Player with more board power, `None` on a tie.
    pub victorious: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameFinishedArgs {
    pub victorious: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardDrawnArgs {
    pub card: CardId,
    pub owner: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardPlayedArgs {
    pub card: CardId,
    pub owner: PlayerId,
    pub row: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardResolvedArgs {
    pub card: CardId,
    pub owner: PlayerId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardTakesDamageArgs {
    pub card: CardId,
    /// The instance after hooks.
    pub damage: DamageInstance,
    pub armor_damage: Option<DamageInstance>,
    pub power_damage: Option<DamageInstance>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardDestroyedArgs {
    pub card: CardId,
    pub former_owner: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTargetSelectedCardArgs {
    pub source: CardId,
    pub owner: PlayerId,
    pub target: CardId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTargetSelectedUnitArgs {
    pub source: CardId,
    pub owner: PlayerId,
    pub target: CardId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTargetSelectedRowArgs {
    pub source: CardId,
    pub owner: PlayerId,
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTargetSelectedPositionArgs {
    pub source: CardId,
    pub owner: PlayerId,
    pub row: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTargetSelectedLibraryCardArgs {
    pub source: CardId,
    pub owner: PlayerId,
    pub class: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTargetsConfirmedArgs {
    pub source: CardId,
    pub owner: PlayerId,
    pub targets: Vec<CardTarget>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerTargetSelectedCardArgs {
    pub player: PlayerId,
    pub target: CardId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitCreatedArgs {
    pub card: CardId,
    pub owner: PlayerId,
    pub row: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitMovedArgs {
    pub card: CardId,
    pub from_row: usize,
    pub from_index: usize,
    pub to_row: usize,
    pub to_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitDeployedArgs {
    pub card: CardId,
    pub owner: PlayerId,
    pub row: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOrderedUnitArgs {
    pub unit: CardId,
    pub owner: PlayerId,
    pub target: CardId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOrderedRowArgs {
    pub unit: CardId,
    pub owner: PlayerId,
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitDestroyedArgs {
    pub card: CardId,
    pub owner: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellDeployedArgs {
    pub card: CardId,
    pub owner: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuffCreatedArgs {
    pub buff: BuffId,
    pub card: CardId,
    pub class: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuffRemovedArgs {
    pub buff: BuffId,
    pub card: CardId,
    pub class: String,
}

macro_rules! game_events {
    ($( $(#[$meta:meta])* $variant:ident($args:ident) ),* $(,)?) => {
        /// Closed set of event kinds.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum EventType {
            $( $(#[$meta])* $variant, )*
        }

        /// A posted event with its arguments.
        #[derive(Clone, Debug, PartialEq)]
        pub enum GameEvent {
            $( $variant($args), )*
        }

        impl GameEvent {
            #[must_use]
            pub fn event_type(&self) -> EventType {
                match self {
                    $( GameEvent::$variant(_) => EventType::$variant, )*
                }
            }
        }

        $(
            impl EventPayload for $args {
                const TYPE: EventType = EventType::$variant;

                fn extract(event: &GameEvent) -> Option<&Self> {
                    match event {
                        GameEvent::$variant(args) => Some(args),
                        _ => None,
                    }
                }
            }

            impl From<$args> for GameEvent {
                fn from(args: $args) -> Self {
                    GameEvent::$variant(args)
                }
            }
        )*
    };
}

game_events! {
    GameStarted(GameStartedArgs),
    RoundStarted(RoundStartedArgs),
    TurnStarted(TurnStartedArgs),
    TurnEnded(TurnEndedArgs),
    RoundEnded(RoundEndedArgs),
    GameFinished(GameFinishedArgs),
    CardDrawn(CardDrawnArgs),
    CardPlayed(CardPlayedArgs),
    CardResolved(CardResolvedArgs),
    /// Attributed to the damaged card.
    CardTakesDamage(CardTakesDamageArgs),
    CardDestroyed(CardDestroyedArgs),
    CardTargetSelectedCard(CardTargetSelectedCardArgs),
    CardTargetSelectedUnit(CardTargetSelectedUnitArgs),
    CardTargetSelectedRow(CardTargetSelectedRowArgs),
    CardTargetSelectedPosition(CardTargetSelectedPositionArgs),
    CardTargetSelectedLibraryCard(CardTargetSelectedLibraryCardArgs),
    CardTargetsConfirmed(CardTargetsConfirmedArgs),
    /// Mulligan pick.
    PlayerTargetSelectedCard(PlayerTargetSelectedCardArgs),
    UnitCreated(UnitCreatedArgs),
    UnitMoved(UnitMovedArgs),
    UnitDeployed(UnitDeployedArgs),
    UnitOrderedUnit(UnitOrderedUnitArgs),
    UnitOrderedRow(UnitOrderedRowArgs),
    UnitDestroyed(UnitDestroyedArgs),
    SpellDeployed(SpellDeployedArgs),
    BuffCreated(BuffCreatedArgs),
    BuffRemoved(BuffRemovedArgs),
}

impl GameEvent {
    /// The card or buff this event is attributed to.
    ///
    /// Subscriptions made with `create_effect` only fire when this equals the
    /// subscriber.
    #[must_use]
    pub fn effect_source(&self) -> Option<EffectSource> {
        use GameEvent as E;
        let card = match self {
            E::GameStarted(_)
            | E::RoundStarted(_)
            | E::TurnStarted(_)
            | E::TurnEnded(_)
            | E::RoundEnded(_)
            | E::GameFinished(_)
            | E::UnitCreated(_)
            | E::UnitMoved(_)
            | E::PlayerTargetSelectedCard(_) => return None,
            E::BuffCreated(args) => return Some(EffectSource::Buff(args.buff)),
            E::BuffRemoved(args) => return Some(EffectSource::Buff(args.buff)),
            E::CardDrawn(args) => args.card,
            E::CardPlayed(args) => args.card,
            E::CardResolved(args) => args.card,
            E::CardTakesDamage(args) => args.card,
            E::CardDestroyed(args) => args.card,
            E::CardTargetSelectedCard(args) => args.source,
            E::CardTargetSelectedUnit(args) => args.source,
            E::CardTargetSelectedRow(args) => args.source,
            E::CardTargetSelectedPosition(args) => args.source,
            E::CardTargetSelectedLibraryCard(args) => args.source,
            E::CardTargetsConfirmed(args) => args.source,
            E::UnitDeployed(args) => args.card,
            E::UnitOrderedUnit(args) => args.unit,
            E::UnitOrderedRow(args) => args.unit,
            E::UnitDestroyed(args) => args.card,
            E::SpellDeployed(args) => args.card,
        };
        Some(EffectSource::Card(card))
    }

    /// Short tag for log lines, grouping related events.
    #[must_use]
    pub fn log_subtype(&self) -> &'static str {
        use GameEvent as E;
        match self {
            E::GameStarted(_) | E::RoundStarted(_) | E::TurnStarted(_) => "start",
            E::TurnEnded(_) | E::RoundEnded(_) | E::GameFinished(_) => "end",
            E::CardDrawn(_) => "draw",
            E::CardPlayed(_) | E::UnitDeployed(_) | E::SpellDeployed(_) => "play",
            E::CardResolved(_) | E::CardTargetsConfirmed(_) => "resolve",
            E::CardTakesDamage(_) => "damage",
            E::CardDestroyed(_) | E::UnitDestroyed(_) => "destroy",
            E::CardTargetSelectedCard(_)
            | E::CardTargetSelectedUnit(_)
            | E::CardTargetSelectedRow(_)
            | E::CardTargetSelectedPosition(_)
            | E::CardTargetSelectedLibraryCard(_) => "target",
            E::PlayerTargetSelectedCard(_) => "mulligan",
            E::UnitCreated(_) | E::UnitMoved(_) => "board",
            E::UnitOrderedUnit(_) | E::UnitOrderedRow(_) => "order",
            E::BuffCreated(_) | E::BuffRemoved(_) => "buff",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_only_matches_own_variant() {
        let event: GameEvent = CardDrawnArgs {
            card: CardId(1),
            owner: PlayerId::FIRST,
        }
        .into();

        assert!(CardDrawnArgs::extract(&event).is_some());
        assert!(CardPlayedArgs::extract(&event).is_none());
        assert_eq!(CardDrawnArgs::TYPE, event.event_type());
    }

    #[test]
    fn test_lifecycle_events_have_no_source() {
        let event: GameEvent = TurnStartedArgs {
            player: PlayerId::SECOND,
            turn: 2,
        }
        .into();
        assert_eq!(event.effect_source(), None);
        assert_eq!(event.log_subtype(), "start");
    }

    #[test]
    fn test_target_events_are_attributed_to_the_resolving_card() {
        let event: GameEvent = CardTargetSelectedUnitArgs {
            source: CardId(5),
            owner: PlayerId::FIRST,
            target: CardId(9),
        }
        .into();
        assert_eq!(event.effect_source(), Some(EffectSource::Card(CardId(5))));
    }

    #[test]
    fn test_buff_events_are_attributed_to_the_buff() {
        let event: GameEvent = BuffCreatedArgs {
            buff: BuffId(2),
            card: CardId(5),
            class: "strength".into(),
        }
        .into();
        assert_eq!(event.effect_source(), Some(EffectSource::Buff(BuffId(2))));
    }

    #[test]
    fn test_damage_is_attributed_to_the_damaged_card() {
        let event: GameEvent = CardTakesDamageArgs {
            card: CardId(7),
            damage: DamageInstance::from_card(3, CardId(1)),
            armor_damage: None,
            power_damage: Some(DamageInstance::from_card(3, CardId(1))),
        }
        .into();
        assert_eq!(event.effect_source(), Some(EffectSource::Card(CardId(7))));
    }
}
