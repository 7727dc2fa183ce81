//! Card instances - runtime card state.
//!
//! A `Card` is one instance of a library class inside one match. Its static
//! data is shared through an `Arc<CardDefinition>`; power and armor are the
//! only stored stats. Maxima and costs are derived from the definition plus
//! the buff container every time they are read, so they can never go stale.
//!
//! Cards do not know where they are. Ask the match's
//! [`ZoneManager`](crate::zones::ZoneManager) instead.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::buffs::{BuffContainer, CardStat};
use crate::core::{CardId, PlayerId};
use crate::targeting::{TargetDefinition, TargetMode};

use super::definition::{CardColor, CardDefinition, CardFeature, CardTribe, CardType};

/// Stored stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardStats {
    pub power: i32,
    pub armor: i32,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub(crate) id: CardId,
    pub(crate) definition: Arc<CardDefinition>,
    pub(crate) owner: Option<PlayerId>,
    pub(crate) stats: CardStats,
    pub(crate) buffs: BuffContainer,
    pub(crate) targets: Vec<TargetDefinition>,
    pub(crate) is_dead: bool,
    pub(crate) is_revealed: bool,
}

impl Card {
    pub(crate) fn new(id: CardId, definition: Arc<CardDefinition>, owner: Option<PlayerId>) -> Self {
        let stats = CardStats {
            power: definition.stats.power,
            armor: definition.stats.armor,
        };
        Self {
            id,
            definition,
            owner,
            stats,
            buffs: BuffContainer::new(),
            targets: Vec::new(),
            is_dead: false,
            is_revealed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.definition.class
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn definition(&self) -> &CardDefinition {
        &self.definition
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.definition.card_type == CardType::Unit
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.definition.card_type == CardType::Spell
    }

    #[must_use]
    pub fn color(&self) -> CardColor {
        self.definition.color
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub fn stats(&self) -> CardStats {
        self.stats
    }

    #[must_use]
    pub fn power(&self) -> i32 {
        self.stats.power
    }

    #[must_use]
    pub fn armor(&self) -> i32 {
        self.stats.armor
    }

    /// Base power plus buff contributions, never below zero.
    #[must_use]
    pub fn max_power(&self) -> i32 {
        (self.definition.stats.power + self.buffs.contribution(CardStat::MaxPower)).max(0)
    }

    #[must_use]
    pub fn max_armor(&self) -> i32 {
        (self.definition.stats.armor + self.buffs.contribution(CardStat::MaxArmor)).max(0)
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        (self.definition.stats.attack + self.buffs.contribution(CardStat::Attack)).max(0)
    }

    #[must_use]
    pub fn unit_cost(&self) -> i32 {
        (self.definition.stats.unit_cost + self.buffs.contribution(CardStat::UnitCost)).max(0)
    }

    #[must_use]
    pub fn spell_cost(&self) -> i32 {
        (self.definition.stats.spell_cost + self.buffs.contribution(CardStat::SpellCost)).max(0)
    }

    /// Static features plus those granted by buffs.
    #[must_use]
    pub fn features(&self) -> SmallVec<[CardFeature; 2]> {
        let mut features = self.definition.features.clone();
        for feature in self.buffs.granted_features() {
            if !features.contains(&feature) {
                features.push(feature);
            }
        }
        features
    }

    #[must_use]
    pub fn has_feature(&self, feature: CardFeature) -> bool {
        self.definition.has_feature(feature) || self.buffs.granted_features().contains(&feature)
    }

    #[must_use]
    pub fn tribes(&self) -> SmallVec<[CardTribe; 2]> {
        let mut tribes = self.definition.tribes.clone();
        for tribe in self.buffs.granted_tribes() {
            if !tribes.contains(&tribe) {
                tribes.push(tribe);
            }
        }
        tribes
    }

    #[must_use]
    pub fn has_tribe(&self, tribe: CardTribe) -> bool {
        self.definition.has_tribe(tribe) || self.buffs.granted_tribes().contains(&tribe)
    }

    #[must_use]
    pub fn buffs(&self) -> &BuffContainer {
        &self.buffs
    }

    /// Target definitions this card registered for `mode`, in registration
    /// order. Buff merges and overrides are not applied here.
    pub fn target_definitions(&self, mode: TargetMode) -> impl Iterator<Item = &TargetDefinition> {
        self.targets.iter().filter(move |d| d.mode() == mode)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Whether the opponent may see this card while it is in a hidden zone.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }
}
