//! Hook payloads.
//!
//! A hook threads a value through every matching subscriber in registration
//! order; each subscriber returns a possibly-modified copy. The caller seeds
//! the value, reads the final result and proceeds with it.

use serde::{Deserialize, Serialize};

use crate::combat::DamageInstance;
use crate::core::CardId;

/// Closed set of hook kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HookType {
    CardTakesDamage,
    CardDestroyed,
}

/// Typed threaded value for one hook kind.
pub trait HookPayload: Clone + std::fmt::Debug + Send + Sync + 'static {
    const TYPE: HookType;

    /// Read-only context describing the original request.
    type Args: std::fmt::Debug + Send + Sync + 'static;
}

/// Threaded value for incoming damage. Hooks may redirect the damage to another
/// card or change the instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTakesDamageHook {
    pub target: CardId,
    pub damage: DamageInstance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTakesDamageHookArgs {
    pub target: CardId,
    pub damage: DamageInstance,
}

impl HookPayload for CardTakesDamageHook {
    const TYPE: HookType = HookType::CardTakesDamage;
    type Args = CardTakesDamageHookArgs;
}

/// Threaded value for a pending destruction. When several hooks disagree, the
/// last one applied wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardDestroyedHook {
    pub destruction_prevented: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardDestroyedHookArgs {
    pub target: CardId,
}

impl HookPayload for CardDestroyedHook {
    const TYPE: HookType = HookType::CardDestroyed;
    type Args = CardDestroyedHookArgs;
}
