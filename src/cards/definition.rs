//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties shared by every copy of a
//! card class: type, rarity tier, faction, tribes, features and base stats.
//! Runtime data (current power, buffs, zone) lives on [`Card`](super::Card).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Unit or spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardType {
    Unit,
    Spell,
}

/// Rarity tier. Declaration order is the canonical presentation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardColor {
    Leader,
    Golden,
    Silver,
    Bronze,
    Token,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardFaction {
    #[default]
    Neutral,
    Human,
    Arcane,
    Wild,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardTribe {
    Human,
    Beast,
    Elemental,
    Crystal,
    Peasant,
}

/// Static rule flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardFeature {
    /// Never offered as a target.
    Untargetable,
    /// Leader ability rather than a deck card.
    HeroPower,
    /// Shields adjacent allies from damage.
    Protector,
    /// Created by another card's effect.
    Summoned,
}

/// Base stats before any buff is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStats {
    pub power: i32,
    pub armor: i32,
    pub attack: i32,
    pub unit_cost: i32,
    pub spell_cost: i32,
}

/// Tuning for bot target preference.
///
/// The score of a candidate target is
/// `max(evaluation * threat_multiplier, base_threat)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotEvaluation {
    pub base_threat: i32,
    pub threat_multiplier: f32,
}

impl Default for BotEvaluation {
    fn default() -> Self {
        Self {
            base_threat: 0,
            threat_multiplier: 1.0,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardColor, CardDefinition, CardFeature, CardType};
///
/// let bearer = CardDefinition::unit("lostShieldbearer", "Lost Shieldbearer")
///     .with_color(CardColor::Bronze)
///     .with_power(7)
///     .with_armor(3)
///     .with_feature(CardFeature::Protector);
///
/// assert_eq!(bearer.card_type, CardType::Unit);
/// assert_eq!(bearer.stats.power, 7);
/// assert_eq!(bearer.stats.unit_cost, 1);
/// assert!(bearer.has_feature(CardFeature::Protector));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Library lookup key.
    pub class: String,

    /// Display name.
    pub name: String,

    pub card_type: CardType,
    pub color: CardColor,
    pub faction: CardFaction,
    pub tribes: SmallVec<[CardTribe; 2]>,
    pub features: SmallVec<[CardFeature; 2]>,
    pub stats: BaseStats,
    pub bot_evaluation: BotEvaluation,

    /// Whether the card can be offered by library-exploration effects.
    pub collectible: bool,
}

impl CardDefinition {
    fn new(class: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            card_type,
            color: CardColor::Bronze,
            faction: CardFaction::Neutral,
            tribes: SmallVec::new(),
            features: SmallVec::new(),
            stats: BaseStats::default(),
            bot_evaluation: BotEvaluation::default(),
            collectible: true,
        }
    }

    /// A unit card costing one unit mana.
    #[must_use]
    pub fn unit(class: impl Into<String>, name: impl Into<String>) -> Self {
        let mut definition = Self::new(class, name, CardType::Unit);
        definition.stats.unit_cost = 1;
        definition
    }

    /// A spell card. Set its cost with [`with_spell_cost`](Self::with_spell_cost).
    #[must_use]
    pub fn spell(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(class, name, CardType::Spell)
    }

    #[must_use]
    pub fn with_color(mut self, color: CardColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_faction(mut self, faction: CardFaction) -> Self {
        self.faction = faction;
        self
    }

    #[must_use]
    pub fn with_tribe(mut self, tribe: CardTribe) -> Self {
        if !self.tribes.contains(&tribe) {
            self.tribes.push(tribe);
        }
        self
    }

    #[must_use]
    pub fn with_feature(mut self, feature: CardFeature) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    #[must_use]
    pub fn with_power(mut self, power: i32) -> Self {
        self.stats.power = power;
        self
    }

    #[must_use]
    pub fn with_armor(mut self, armor: i32) -> Self {
        self.stats.armor = armor;
        self
    }

    #[must_use]
    pub fn with_attack(mut self, attack: i32) -> Self {
        self.stats.attack = attack;
        self
    }

    #[must_use]
    pub fn with_unit_cost(mut self, cost: i32) -> Self {
        self.stats.unit_cost = cost;
        self
    }

    #[must_use]
    pub fn with_spell_cost(mut self, cost: i32) -> Self {
        self.stats.spell_cost = cost;
        self
    }

    #[must_use]
    pub fn with_bot_evaluation(mut self, base_threat: i32, threat_multiplier: f32) -> Self {
        self.bot_evaluation = BotEvaluation {
            base_threat,
            threat_multiplier,
        };
        self
    }

    /// Mark as a summoned token: token tier, not collectible.
    #[must_use]
    pub fn token(mut self) -> Self {
        self.color = CardColor::Token;
        self.collectible = false;
        self.with_feature(CardFeature::Summoned)
    }

    #[must_use]
    pub fn has_feature(&self, feature: CardFeature) -> bool {
        self.features.contains(&feature)
    }

    #[must_use]
    pub fn has_tribe(&self, tribe: CardTribe) -> bool {
        self.tribes.contains(&tribe)
    }

    /// Canonical ordering used wherever cards are listed to a player:
    /// rarity tier, then units before spells, then cost, then higher power
    /// first, then class name.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.color
            .cmp(&other.color)
            .then_with(|| self.card_type.cmp(&other.card_type))
            .then_with(|| self.stats.spell_cost.cmp(&other.stats.spell_cost))
            .then_with(|| other.stats.power.cmp(&self.stats.power))
            .then_with(|| self.class.cmp(&other.class))
    }
}
