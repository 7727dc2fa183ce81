//! Buff definitions - static buff data registered in the card library.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cards::{CardFeature, CardTribe};
use crate::targeting::{TargetDefinition, TargetMode};

use super::setup::BuffSetup;

/// How a new buff combines with an existing buff of the same class on the
/// same card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuffStackType {
    /// The existing buff is removed and the new one takes its place.
    Replace,
    /// The existing buff gains intensity.
    AddIntensity,
    /// The existing buff gains duration.
    AddDuration,
    /// Each application is a separate buff.
    StackIndependently,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuffAlignment {
    Positive,
    Negative,
    Neutral,
}

/// Stats a buff can modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStat {
    MaxPower,
    MaxArmor,
    Attack,
    UnitCost,
    SpellCost,
}

/// Flat stat change applied once per point of intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: CardStat,
    pub per_intensity: i32,
}

pub type BuffScript = Arc<dyn Fn(&mut BuffSetup<'_>) + Send + Sync>;

pub type TargetOverride = Arc<dyn Fn(TargetDefinition) -> TargetDefinition + Send + Sync>;

/// Static buff definition.
///
/// ```
/// use ccg_rules::buffs::{BuffAlignment, BuffDefinition, BuffStackType, CardStat};
///
/// let strength = BuffDefinition::new("strength", BuffStackType::AddIntensity, BuffAlignment::Positive)
///     .with_modifier(CardStat::MaxPower, 1);
///
/// assert_eq!(strength.contribution(CardStat::MaxPower, 3), 3);
/// assert_eq!(strength.contribution(CardStat::Attack, 3), 0);
/// ```
#[derive(Clone)]
pub struct BuffDefinition {
    pub class: String,
    pub stack_type: BuffStackType,
    pub alignment: BuffAlignment,
    pub modifiers: Vec<StatModifier>,
    pub features: Vec<CardFeature>,
    pub tribes: Vec<CardTribe>,

    /// Duration given to new instances when the caller does not pick one.
    /// `None` is infinite.
    pub default_duration: Option<u32>,

    pub(crate) target_merges: Vec<TargetDefinition>,
    pub(crate) target_overrides: Vec<(TargetMode, TargetOverride)>,
    pub(crate) script: Option<BuffScript>,
}

impl BuffDefinition {
    #[must_use]
    pub fn new(class: impl Into<String>, stack_type: BuffStackType, alignment: BuffAlignment) -> Self {
        Self {
            class: class.into(),
            stack_type,
            alignment,
            modifiers: Vec::new(),
            features: Vec::new(),
            tribes: Vec::new(),
            default_duration: None,
            target_merges: Vec::new(),
            target_overrides: Vec::new(),
            script: None,
        }
    }

    #[must_use]
    pub fn with_modifier(mut self, stat: CardStat, per_intensity: i32) -> Self {
        self.modifiers.push(StatModifier { stat, per_intensity });
        self
    }

    #[must_use]
    pub fn grants_feature(mut self, feature: CardFeature) -> Self {
        self.features.push(feature);
        self
    }

    #[must_use]
    pub fn grants_tribe(mut self, tribe: CardTribe) -> Self {
        self.tribes.push(tribe);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, turns: u32) -> Self {
        self.default_duration = Some(turns);
        self
    }

    /// Merge extra rules into the carrier card's definitions of the same mode.
    #[must_use]
    pub fn merges_targets(mut self, definition: TargetDefinition) -> Self {
        self.target_merges.push(definition);
        self
    }

    /// Replace the carrier card's definitions of `mode` wholesale.
    #[must_use]
    pub fn overrides_targets(
        mut self,
        mode: TargetMode,
        f: impl Fn(TargetDefinition) -> TargetDefinition + Send + Sync + 'static,
    ) -> Self {
        self.target_overrides.push((mode, Arc::new(f)));
        self
    }

    /// Attach subscriptions registered whenever an instance is created.
    #[must_use]
    pub fn with_script(mut self, script: impl Fn(&mut BuffSetup<'_>) + Send + Sync + 'static) -> Self {
        self.script = Some(Arc::new(script));
        self
    }

    /// Total change to `stat` at the given intensity.
    #[must_use]
    pub fn contribution(&self, stat: CardStat, intensity: u32) -> i32 {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.per_intensity * intensity as i32)
            .sum()
    }
}

impl std::fmt::Debug for BuffDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuffDefinition")
            .field("class", &self.class)
            .field("stack_type", &self.stack_type)
            .field("alignment", &self.alignment)
            .field("modifiers", &self.modifiers)
            .field("features", &self.features)
            .field("tribes", &self.tribes)
            .field("default_duration", &self.default_duration)
            .field("target_merges", &self.target_merges.len())
            .field("target_overrides", &self.target_overrides.len())
            .field("scripted", &self.script.is_some())
            .finish()
    }
}
