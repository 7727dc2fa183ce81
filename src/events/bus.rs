//! Subscription registry.
//!
//! The bus stores every callback and hook registered by card and buff scripts
//! and indexes them by event or hook type. Per-type lists keep registration
//! order, which is also the order subscribers run in. Dispatch itself lives on
//! [`Game`](crate::core::Game) (see `dispatch.rs`) because subscribers need the
//! whole match state.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

use crate::core::{BuffId, CardId, Game, Result};
use crate::zones::LocationSet;

use super::builder::{CallbackBuilder, HookBuilder};
use super::event::{EffectSource, EventPayload, EventType, GameEvent};
use super::hooks::{HookPayload, HookType};

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// The card or buff that owns a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscriber {
    Card(CardId),
    Buff(BuffId),
}

impl Subscriber {
    /// Whether `event` is attributed to this subscriber.
    #[must_use]
    pub fn is_source_of(self, event: &GameEvent) -> bool {
        match (self, event.effect_source()) {
            (Subscriber::Card(card), Some(EffectSource::Card(source))) => card == source,
            (Subscriber::Buff(buff), Some(EffectSource::Buff(source))) => buff == source,
            _ => false,
        }
    }
}

pub(crate) type CallbackFn = Arc<dyn Fn(&mut Game, &GameEvent) -> Result<()> + Send + Sync>;
pub(crate) type EventPredicate = Arc<dyn Fn(&Game, &GameEvent) -> Result<bool> + Send + Sync>;

pub(crate) type HookPredicate<H> =
    Box<dyn Fn(&Game, &H, &<H as HookPayload>::Args) -> Result<bool> + Send + Sync>;
pub(crate) type HookTransform<H> =
    Box<dyn Fn(&Game, H, &<H as HookPayload>::Args) -> H + Send + Sync>;

pub(crate) struct Callback {
    pub(crate) id: SubscriptionId,
    pub(crate) subscriber: Subscriber,
    pub(crate) event_type: EventType,
    pub(crate) locations: Option<LocationSet>,
    pub(crate) requirements: Vec<EventPredicate>,
    pub(crate) handler: CallbackFn,
}

pub(crate) struct HookHandler<H: HookPayload> {
    pub(crate) requirements: Vec<HookPredicate<H>>,
    pub(crate) transform: HookTransform<H>,
}

pub(crate) struct Hook {
    pub(crate) id: SubscriptionId,
    pub(crate) subscriber: Subscriber,
    pub(crate) hook_type: HookType,
    pub(crate) locations: Option<LocationSet>,
    /// A `HookHandler<H>` for the payload matching `hook_type`.
    pub(crate) handler: Box<dyn Any + Send + Sync>,
}

/// Registry of callbacks and hooks for one match.
#[derive(Default)]
pub struct EventBus {
    callbacks: FxHashMap<SubscriptionId, Callback>,
    by_event_type: FxHashMap<EventType, Vec<SubscriptionId>>,
    hooks: FxHashMap<SubscriptionId, Hook>,
    by_hook_type: FxHashMap<HookType, Vec<SubscriptionId>>,
    next_id: u32,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a callback for `E` owned by `subscriber`.
    pub fn callback<E: EventPayload>(&mut self, subscriber: Subscriber) -> CallbackBuilder<'_, E> {
        CallbackBuilder::new(self, subscriber)
    }

    /// Start a callback for `E` that only fires for events attributed to
    /// `subscriber` itself.
    pub fn effect<E: EventPayload>(&mut self, subscriber: Subscriber) -> CallbackBuilder<'_, E> {
        CallbackBuilder::new(self, subscriber).require_event(move |_, event| Ok(subscriber.is_source_of(event)))
    }

    /// Start a hook for `H` owned by `subscriber`.
    pub fn hook<H: HookPayload>(&mut self, subscriber: Subscriber) -> HookBuilder<'_, H> {
        HookBuilder::new(self, subscriber)
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert_callback(
        &mut self,
        subscriber: Subscriber,
        event_type: EventType,
        locations: Option<LocationSet>,
        requirements: Vec<EventPredicate>,
        handler: CallbackFn,
    ) -> SubscriptionId {
        let id = self.allocate_id();
        self.by_event_type.entry(event_type).or_default().push(id);
        self.callbacks.insert(
            id,
            Callback {
                id,
                subscriber,
                event_type,
                locations,
                requirements,
                handler,
            },
        );
        id
    }

    pub(crate) fn insert_hook<H: HookPayload>(
        &mut self,
        subscriber: Subscriber,
        locations: Option<LocationSet>,
        handler: HookHandler<H>,
    ) -> SubscriptionId {
        let id = self.allocate_id();
        self.by_hook_type.entry(H::TYPE).or_default().push(id);
        self.hooks.insert(
            id,
            Hook {
                id,
                subscriber,
                hook_type: H::TYPE,
                locations,
                handler: Box::new(handler),
            },
        );
        id
    }

    /// Remove a callback or hook. Returns whether anything was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if let Some(callback) = self.callbacks.remove(&id) {
            if let Some(list) = self.by_event_type.get_mut(&callback.event_type) {
                list.retain(|&other| other != id);
                if list.is_empty() {
                    self.by_event_type.remove(&callback.event_type);
                }
            }
            return true;
        }
        if let Some(hook) = self.hooks.remove(&id) {
            if let Some(list) = self.by_hook_type.get_mut(&hook.hook_type) {
                list.retain(|&other| other != id);
                if list.is_empty() {
                    self.by_hook_type.remove(&hook.hook_type);
                }
            }
            return true;
        }
        false
    }

    /// Remove every subscription owned by `subscriber`. Returns how many were removed.
    pub fn remove_for_subscriber(&mut self, subscriber: Subscriber) -> usize {
        let ids = self.subscriptions_of(subscriber);
        for &id in &ids {
            self.unsubscribe(id);
        }
        ids.len()
    }

    /// All subscriptions owned by `subscriber`, in registration order.
    #[must_use]
    pub fn subscriptions_of(&self, subscriber: Subscriber) -> Vec<SubscriptionId> {
        let mut ids: Vec<_> = self
            .callbacks
            .values()
            .filter(|c| c.subscriber == subscriber)
            .map(|c| c.id)
            .chain(
                self.hooks
                    .values()
                    .filter(|h| h.subscriber == subscriber)
                    .map(|h| h.id),
            )
            .collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.callbacks.contains_key(&id) || self.hooks.contains_key(&id)
    }

    #[must_use]
    pub fn callback_count(&self, event_type: EventType) -> usize {
        self.by_event_type.get(&event_type).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn hook_count(&self, hook_type: HookType) -> usize {
        self.by_hook_type.get(&hook_type).map_or(0, Vec::len)
    }

    /// Total subscription count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len() + self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty() && self.hooks.is_empty()
    }

    pub(crate) fn callbacks_for(&self, event_type: EventType) -> impl Iterator<Item = &Callback> {
        self.by_event_type
            .get(&event_type)
            .into_iter()
            .flatten()
            .filter_map(|id| self.callbacks.get(id))
    }

    pub(crate) fn hooks_for(&self, hook_type: HookType) -> impl Iterator<Item = &Hook> {
        self.by_hook_type
            .get(&hook_type)
            .into_iter()
            .flatten()
            .filter_map(|id| self.hooks.get(id))
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("callbacks", &self.callbacks.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
