//! Damage and healing value objects.

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Where a damage or healing instance comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DamageSource {
    Card { card: CardId },
    /// Not caused by any card.
    Universe,
}

/// One hit.
///
/// ```
/// use ccg_rules::combat::{DamageInstance, DamageSource};
/// use ccg_rules::core::CardId;
///
/// let hit = DamageInstance::from_card(4, CardId(2));
/// assert_eq!(hit.source, DamageSource::Card { card: CardId(2) });
/// assert_eq!(hit.with_value(1).value, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInstance {
    pub value: i32,
    pub source: DamageSource,
}

impl DamageInstance {
    #[must_use]
    pub fn from_card(value: i32, card: CardId) -> Self {
        Self {
            value,
            source: DamageSource::Card { card },
        }
    }

    #[must_use]
    pub fn from_universe(value: i32) -> Self {
        Self {
            value,
            source: DamageSource::Universe,
        }
    }

    /// Same source, different amount.
    #[must_use]
    pub fn with_value(&self, value: i32) -> Self {
        Self {
            value,
            source: self.source,
        }
    }

    #[must_use]
    pub fn source_card(&self) -> Option<CardId> {
        match self.source {
            DamageSource::Card { card } => Some(card),
            DamageSource::Universe => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealingInstance {
    pub value: i32,
    pub source: DamageSource,
}

impl HealingInstance {
    #[must_use]
    pub fn from_card(value: i32, card: CardId) -> Self {
        Self {
            value,
            source: DamageSource::Card { card },
        }
    }

    #[must_use]
    pub fn from_universe(value: i32) -> Self {
        Self {
            value,
            source: DamageSource::Universe,
        }
    }
}

/// How a hit is absorbed: armor first, then power.
///
/// Returns `(armor_part, power_part)`. The power part never exceeds current
/// power, so power cannot go negative from one hit.
#[must_use]
pub fn split_damage(value: i32, armor: i32, power: i32) -> (i32, i32) {
    let value = value.max(0);
    let armor_part = armor.max(0).min(value);
    let power_part = (value - armor_part).min(power.max(0));
    (armor_part, power_part)
}
