//! Event bus: callbacks, hooks and the typed event catalogue.
//!
//! Card and buff scripts subscribe through builders obtained from
//! [`EventBus`] (usually via [`CardSetup`](crate::cards::CardSetup) or
//! [`BuffSetup`](crate::buffs::BuffSetup)). The match posts events with
//! [`Game::post_event`](crate::core::Game::post_event) and folds hooks with
//! [`Game::apply_hooks`](crate::core::Game::apply_hooks).

pub mod builder;
pub mod bus;
mod dispatch;
pub mod event;
pub mod hooks;

pub use builder::{CallbackBuilder, HookBuilder};
pub use bus::{EventBus, Subscriber, SubscriptionId};
pub use event::*;
pub use hooks::{
    CardDestroyedHook, CardDestroyedHookArgs, CardTakesDamageHook, CardTakesDamageHookArgs,
    HookPayload, HookType,
};
