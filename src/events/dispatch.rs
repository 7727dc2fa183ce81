//! Event posting and hook application.
//!
//! Posting is synchronous and depth-first: matching callbacks are selected
//! when the event is posted, then run one by one, and any event a callback
//! posts is fully dispatched before the next sibling callback starts.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::Game;
use crate::zones::{CardLocation, LocationSet};

use super::bus::{CallbackFn, EventPredicate, HookHandler, Subscriber, SubscriptionId};
use super::event::GameEvent;
use super::hooks::HookPayload;

impl Game {
    /// Post an event to every matching callback.
    pub fn post_event(&mut self, event: impl Into<GameEvent>) {
        let event = event.into();
        debug!(
            event_type = ?event.event_type(),
            subtype = event.log_subtype(),
            source = ?event.effect_source(),
            "posting event"
        );

        let game: &Game = self;
        let handlers: Vec<(SubscriptionId, CallbackFn)> = game
            .events
            .callbacks_for(event.event_type())
            .filter(|callback| {
                game.location_allows(callback.subscriber, callback.locations)
                    && game.requirements_hold(callback.id, &callback.requirements, &event)
            })
            .map(|callback| (callback.id, Arc::clone(&callback.handler)))
            .collect();

        for (id, handler) in handlers {
            // A subscriber removed by an earlier sibling no longer fires.
            if !self.events.contains(id) {
                continue;
            }
            if let Err(error) = handler(self, &event) {
                warn!(subscription = %id, event_type = ?event.event_type(), %error, "callback failed");
            }
        }
    }

    /// Fold every matching hook for `H` over `initial`, in registration order.
    #[must_use]
    pub fn apply_hooks<H: HookPayload>(&self, initial: H, args: H::Args) -> H {
        let mut value = initial;
        for hook in self.events.hooks_for(H::TYPE) {
            let Some(handler) = hook.handler.downcast_ref::<HookHandler<H>>() else {
                warn!(subscription = %hook.id, hook_type = ?H::TYPE, "hook payload type mismatch");
                continue;
            };
            if !self.location_allows(hook.subscriber, hook.locations) {
                continue;
            }
            let matches = handler.requirements.iter().all(|predicate| {
                match predicate(self, &value, &args) {
                    Ok(result) => result,
                    Err(error) => {
                        trace!(subscription = %hook.id, %error, "hook predicate failed");
                        false
                    }
                }
            });
            if matches {
                value = (handler.transform)(self, value, &args);
            }
        }
        debug!(hook_type = ?H::TYPE, ?args, result = ?value, "hooks applied");
        value
    }

    /// Current location of a subscription owner. Buffs report their card's
    /// location.
    #[must_use]
    pub fn subscriber_location(&self, subscriber: Subscriber) -> Option<CardLocation> {
        let card = match subscriber {
            Subscriber::Card(card) => card,
            Subscriber::Buff(buff) => *self.buff_owners.get(&buff)?,
        };
        self.zones.location(card)
    }

    fn location_allows(&self, subscriber: Subscriber, allowed: Option<LocationSet>) -> bool {
        let Some(allowed) = allowed else {
            return true;
        };
        self.subscriber_location(subscriber)
            .is_some_and(|location| allowed.contains(location.kind()))
    }

    fn requirements_hold(
        &self,
        id: SubscriptionId,
        requirements: &[EventPredicate],
        event: &GameEvent,
    ) -> bool {
        requirements.iter().all(|predicate| match predicate(self, event) {
            Ok(result) => {
                if !result {
                    trace!(subscription = %id, "predicate rejected event");
                }
                result
            }
            Err(error) => {
                trace!(subscription = %id, %error, "predicate failed");
                false
            }
        })
    }
}
