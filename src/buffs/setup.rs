//! Registration context for a buff's own subscriptions.

use crate::core::{BuffId, CardId};
use crate::events::{CallbackBuilder, EventBus, EventPayload, HookBuilder, HookPayload, Subscriber};

/// Handed to a buff script when a buff instance is created.
///
/// Subscriptions are owned by the buff and removed together with it. Their
/// location filters follow the card carrying the buff.
pub struct BuffSetup<'a> {
    buff: BuffId,
    card: CardId,
    events: &'a mut EventBus,
}

impl<'a> BuffSetup<'a> {
    pub(crate) fn new(buff: BuffId, card: CardId, events: &'a mut EventBus) -> Self {
        Self { buff, card, events }
    }

    #[must_use]
    pub fn buff_id(&self) -> BuffId {
        self.buff
    }

    /// The card carrying the buff.
    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.card
    }

    pub fn create_callback<E: EventPayload>(&mut self) -> CallbackBuilder<'_, E> {
        self.events.callback::<E>(Subscriber::Buff(self.buff))
    }

    /// Callback for events attributed to this buff.
    pub fn create_effect<E: EventPayload>(&mut self) -> CallbackBuilder<'_, E> {
        self.events.effect::<E>(Subscriber::Buff(self.buff))
    }

    pub fn create_hook<H: HookPayload>(&mut self) -> HookBuilder<'_, H> {
        self.events.hook::<H>(Subscriber::Buff(self.buff))
    }
}
