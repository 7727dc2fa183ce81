//! The surface a card's ability script sees while an instance is created.

use crate::core::{CardId, PlayerId};
use crate::events::{CallbackBuilder, EventBus, EventPayload, HookBuilder, HookPayload, Subscriber};
use crate::targeting::{TargetBuilder, TargetDefinition, TargetMode, TargetType};

use super::card::Card;
use super::definition::CardDefinition;

/// Registration context for one new card instance.
///
/// Everything a script registers is owned by the card: subscriptions are
/// keyed to `Subscriber::Card(id)` and target definitions are stored on the
/// card.
///
/// ```
/// use ccg_rules::cards::{CardDefinition, CardLibrary};
/// use ccg_rules::events::CardTargetSelectedUnitArgs;
/// use ccg_rules::targeting::TargetType;
///
/// let mut library = CardLibrary::new();
/// library.register_scripted(CardDefinition::spell("spark", "Spark").with_spell_cost(1), |setup| {
///     setup.create_deploy_targets(TargetType::Unit).require_enemy();
///     setup
///         .create_effect::<CardTargetSelectedUnitArgs>()
///         .perform(|game, args| game.deal_damage_from(args.target, 1, args.source));
/// });
/// ```
pub struct CardSetup<'a> {
    card: &'a mut Card,
    events: &'a mut EventBus,
    pending_buffs: &'a mut Vec<String>,
}

impl<'a> CardSetup<'a> {
    pub(crate) fn new(card: &'a mut Card, events: &'a mut EventBus, pending_buffs: &'a mut Vec<String>) -> Self {
        Self {
            card,
            events,
            pending_buffs,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.card.id
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.card.owner
    }

    #[must_use]
    pub fn definition(&self) -> &CardDefinition {
        &self.card.definition
    }

    /// Callback for any event of type `E`.
    pub fn create_callback<E: EventPayload>(&mut self) -> CallbackBuilder<'_, E> {
        self.events.callback::<E>(Subscriber::Card(self.card.id))
    }

    /// Callback for events of type `E` attributed to this card.
    pub fn create_effect<E: EventPayload>(&mut self) -> CallbackBuilder<'_, E> {
        self.events.effect::<E>(Subscriber::Card(self.card.id))
    }

    pub fn create_hook<H: HookPayload>(&mut self) -> HookBuilder<'_, H> {
        self.events.hook::<H>(Subscriber::Card(self.card.id))
    }

    /// Where the card may be played from hand. Replaces the default row rule.
    pub fn create_play_targets(&mut self, target_type: TargetType) -> TargetBuilder<'_> {
        self.create_targets(TargetMode::CardPlay, target_type)
    }

    /// Targets of the card's deploy or spell effect.
    pub fn create_deploy_targets(&mut self, target_type: TargetType) -> TargetBuilder<'_> {
        self.create_targets(TargetMode::DeployEffect, target_type)
    }

    /// Orders the unit can be given. Replaces the default attack order.
    pub fn create_order_targets(&mut self, target_type: TargetType) -> TargetBuilder<'_> {
        self.create_targets(TargetMode::UnitOrder, target_type)
    }

    fn create_targets(&mut self, mode: TargetMode, target_type: TargetType) -> TargetBuilder<'_> {
        self.card.targets.push(TargetDefinition::new(mode, target_type));
        let last = self.card.targets.len() - 1;
        TargetBuilder::new(&mut self.card.targets[last])
    }

    /// Start the instance with a buff of `class`, sourced from itself.
    pub fn add_buff(&mut self, class: impl Into<String>) {
        self.pending_buffs.push(class.into());
    }
}
