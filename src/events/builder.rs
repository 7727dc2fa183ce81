//! Subscription builders.
//!
//! Builders are plain values: they hold the owning subscriber, the location
//! filter and the predicate list, and register everything in one step when
//! finished with `perform` (callbacks) or `replace` (hooks).
//!
//! ```
//! use ccg_rules::core::CardId;
//! use ccg_rules::events::{EventBus, Subscriber, UnitDeployedArgs};
//! use ccg_rules::zones::LocationSet;
//!
//! let mut bus = EventBus::new();
//! let me = CardId(1);
//! bus.callback::<UnitDeployedArgs>(Subscriber::Card(me))
//!     .require(move |_, args| args.card != me)
//!     .require_location(LocationSet::BOARD)
//!     .perform(|_game, _args| Ok(()));
//! assert_eq!(bus.len(), 1);
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::core::{Game, Result};
use crate::zones::LocationSet;

use super::bus::{EventBus, EventPredicate, HookHandler, HookPredicate, Subscriber, SubscriptionId};
use super::event::{EventPayload, GameEvent};
use super::hooks::HookPayload;

/// Builder for a read-only event callback.
#[must_use = "a callback is only registered once `perform` is called"]
pub struct CallbackBuilder<'a, E: EventPayload> {
    bus: &'a mut EventBus,
    subscriber: Subscriber,
    locations: Option<LocationSet>,
    requirements: Vec<EventPredicate>,
    _event: PhantomData<fn(&E)>,
}

impl<'a, E: EventPayload> CallbackBuilder<'a, E> {
    pub(crate) fn new(bus: &'a mut EventBus, subscriber: Subscriber) -> Self {
        Self {
            bus,
            subscriber,
            locations: None,
            requirements: Vec::new(),
            _event: PhantomData,
        }
    }

    pub(crate) fn require_event(
        mut self,
        predicate: impl Fn(&Game, &GameEvent) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.requirements.push(Arc::new(predicate));
        self
    }

    /// Only fire when `predicate` holds.
    pub fn require(self, predicate: impl Fn(&Game, &E) -> bool + Send + Sync + 'static) -> Self {
        self.require_event(move |game, event| Ok(E::extract(event).is_some_and(|args| predicate(game, args))))
    }

    /// Only fire when `predicate` returns `Ok(true)`. An error counts as a
    /// mismatch.
    pub fn require_checked(
        self,
        predicate: impl Fn(&Game, &E) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.require_event(move |game, event| match E::extract(event) {
            Some(args) => predicate(game, args),
            None => Ok(false),
        })
    }

    /// Only fire while the subscriber is in one of `locations`. Repeated
    /// calls widen the set.
    pub fn require_location(mut self, locations: LocationSet) -> Self {
        self.locations = Some(self.locations.unwrap_or_else(LocationSet::empty) | locations);
        self
    }

    /// Register the callback.
    pub fn perform(
        self,
        action: impl Fn(&mut Game, &E) -> Result<()> + Send + Sync + 'static,
    ) -> SubscriptionId {
        let handler = Arc::new(move |game: &mut Game, event: &GameEvent| match E::extract(event) {
            Some(args) => action(game, args),
            None => {
                trace!(event_type = ?event.event_type(), "callback skipped for foreign event");
                Ok(())
            }
        });
        self.bus
            .insert_callback(self.subscriber, E::TYPE, self.locations, self.requirements, handler)
    }
}

/// Builder for a hook that transforms a threaded value.
#[must_use = "a hook is only registered once `replace` is called"]
pub struct HookBuilder<'a, H: HookPayload> {
    bus: &'a mut EventBus,
    subscriber: Subscriber,
    locations: Option<LocationSet>,
    requirements: Vec<HookPredicate<H>>,
}

impl<'a, H: HookPayload> HookBuilder<'a, H> {
    pub(crate) fn new(bus: &'a mut EventBus, subscriber: Subscriber) -> Self {
        Self {
            bus,
            subscriber,
            locations: None,
            requirements: Vec::new(),
        }
    }

    /// Only apply when `predicate` holds for the current value.
    pub fn require(
        mut self,
        predicate: impl Fn(&Game, &H, &H::Args) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.requirements
            .push(Box::new(move |game: &Game, value: &H, args: &H::Args| {
                Ok(predicate(game, value, args))
            }));
        self
    }

    /// Only apply when `predicate` returns `Ok(true)`.
    pub fn require_checked(
        mut self,
        predicate: impl Fn(&Game, &H, &H::Args) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.requirements.push(Box::new(predicate));
        self
    }

    /// Only apply while the subscriber is in one of `locations`.
    pub fn require_location(mut self, locations: LocationSet) -> Self {
        self.locations = Some(self.locations.unwrap_or_else(LocationSet::empty) | locations);
        self
    }

    /// Register the hook with its transformation.
    pub fn replace(
        self,
        transform: impl Fn(&Game, H, &H::Args) -> H + Send + Sync + 'static,
    ) -> SubscriptionId {
        let handler = HookHandler {
            requirements: self.requirements,
            transform: Box::new(transform),
        };
        self.bus.insert_hook(self.subscriber, self.locations, handler)
    }
}
