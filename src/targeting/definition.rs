//! Declarative target definitions.
//!
//! Card scripts describe what they may target rather than computing it: a
//! definition names the mode, the allowed candidate types, how many targets
//! may be confirmed, and per-type requirement and evaluator chains. The
//! engine in `engine.rs` turns a definition into concrete [`CardTarget`]s.
//!
//! Two builder forms exist. [`TargetDefinition`] itself is a value builder,
//! used for definitions that live in static data such as buff merges.
//! [`TargetBuilder`] edits a definition already registered on a card and is
//! what [`CardSetup`](crate::cards::CardSetup) hands out.
//!
//! [`CardTarget`]: super::CardTarget

use std::sync::Arc;

use crate::core::{Game, Result};

use super::target::{TargetArgs, TargetMode, TargetType};

pub type TargetRequirement = Arc<dyn Fn(&Game, &TargetArgs<'_>) -> Result<bool> + Send + Sync>;
pub type TargetEvaluator = Arc<dyn Fn(&Game, &TargetArgs<'_>) -> i32 + Send + Sync>;

/// Rules for one allowed candidate type.
#[derive(Clone)]
pub(crate) struct TypeRules {
    pub(crate) target_type: TargetType,
    pub(crate) max_targets: Option<usize>,
    pub(crate) requirements: Vec<TargetRequirement>,
    pub(crate) evaluators: Vec<TargetEvaluator>,
    pub(crate) label: Option<String>,
}

impl TypeRules {
    fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            max_targets: None,
            requirements: Vec::new(),
            evaluators: Vec::new(),
            label: None,
        }
    }

    fn merge(&mut self, other: &TypeRules) {
        self.requirements.extend(other.requirements.iter().cloned());
        self.evaluators.extend(other.evaluators.iter().cloned());
        if other.label.is_some() {
            self.label.clone_from(&other.label);
        }
        self.max_targets = match (self.max_targets, other.max_targets) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Which candidates a card may pick for one mode.
///
/// ```
/// use ccg_rules::targeting::{TargetDefinition, TargetMode, TargetType};
///
/// let volley = TargetDefinition::new(TargetMode::DeployEffect, TargetType::Unit)
///     .require_enemy()
///     .total_targets(2);
///
/// assert_eq!(volley.mode(), TargetMode::DeployEffect);
/// assert_eq!(volley.get_total_targets(), 2);
/// assert!(volley.allows(TargetType::Unit));
/// assert!(!volley.allows(TargetType::BoardRow));
/// ```
#[derive(Clone)]
pub struct TargetDefinition {
    pub(crate) mode: TargetMode,
    pub(crate) total_targets: usize,
    pub(crate) rules: Vec<TypeRules>,
    pub(crate) prevent_sorting: bool,
}

impl TargetDefinition {
    /// A single-target definition allowing `target_type`.
    #[must_use]
    pub fn new(mode: TargetMode, target_type: TargetType) -> Self {
        Self {
            mode,
            total_targets: 1,
            rules: vec![TypeRules::new(target_type)],
            prevent_sorting: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    #[must_use]
    pub fn get_total_targets(&self) -> usize {
        self.total_targets
    }

    #[must_use]
    pub fn allows(&self, target_type: TargetType) -> bool {
        self.rules.iter().any(|r| r.target_type == target_type)
    }

    /// Allowed types in declaration order.
    pub fn allowed_types(&self) -> impl Iterator<Item = TargetType> + '_ {
        self.rules.iter().map(|r| r.target_type)
    }

    #[must_use]
    pub fn is_sorting_prevented(&self) -> bool {
        self.prevent_sorting
    }

    /// Fold `other`'s rules into this definition.
    ///
    /// Requirements and evaluators are appended to the existing chains, so
    /// nothing already required is lost. Types only `other` allows are added.
    pub fn merge(&mut self, other: &TargetDefinition) {
        for rules in &other.rules {
            match self.rules.iter_mut().find(|r| r.target_type == rules.target_type) {
                Some(existing) => existing.merge(rules),
                None => self.rules.push(rules.clone()),
            }
        }
        self.prevent_sorting |= other.prevent_sorting;
    }

    pub(crate) fn rules_for(&self, target_type: TargetType) -> Option<&TypeRules> {
        self.rules.iter().find(|r| r.target_type == target_type)
    }

    fn current(&mut self) -> &mut TypeRules {
        // `new` always creates one entry and nothing removes entries.
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    fn add_type(&mut self, target_type: TargetType) {
        if let Some(index) = self.rules.iter().position(|r| r.target_type == target_type) {
            // Move to the end so later calls edit this type.
            let rules = self.rules.remove(index);
            self.rules.push(rules);
        } else {
            self.rules.push(TypeRules::new(target_type));
        }
    }

    fn add_requirement(&mut self, requirement: TargetRequirement) {
        self.current().requirements.push(requirement);
    }

    fn add_evaluator(&mut self, evaluator: TargetEvaluator) {
        self.current().evaluators.push(evaluator);
    }

    /// Also allow `target_type`. Following calls configure that type.
    #[must_use]
    pub fn allow(mut self, target_type: TargetType) -> Self {
        self.add_type(target_type);
        self
    }

    #[must_use]
    pub fn require(mut self, predicate: impl Fn(&Game, &TargetArgs<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.add_requirement(infallible(predicate));
        self
    }

    #[must_use]
    pub fn require_checked(
        mut self,
        predicate: impl Fn(&Game, &TargetArgs<'_>) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.add_requirement(Arc::new(predicate));
        self
    }

    #[must_use]
    pub fn require_allied(mut self) -> Self {
        self.add_requirement(allied());
        self
    }

    #[must_use]
    pub fn require_enemy(mut self) -> Self {
        self.add_requirement(enemy());
        self
    }

    #[must_use]
    pub fn require_not_self(mut self) -> Self {
        self.add_requirement(not_self());
        self
    }

    #[must_use]
    pub fn require_free_slot(mut self) -> Self {
        self.add_requirement(free_slot());
        self
    }

    #[must_use]
    pub fn evaluate(mut self, evaluator: impl Fn(&Game, &TargetArgs<'_>) -> i32 + Send + Sync + 'static) -> Self {
        self.add_evaluator(Arc::new(evaluator));
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.current().label = Some(label.into());
        self
    }

    /// Targets that may be confirmed across all types.
    #[must_use]
    pub fn total_targets(mut self, count: usize) -> Self {
        self.total_targets = count;
        self
    }

    /// Targets of the current type that may be confirmed.
    #[must_use]
    pub fn max_of_type(mut self, count: usize) -> Self {
        self.current().max_targets = Some(count);
        self
    }

    /// Keep candidates in zone order instead of canonical card order.
    #[must_use]
    pub fn prevent_sorting(mut self) -> Self {
        self.prevent_sorting = true;
        self
    }
}

impl std::fmt::Debug for TargetDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<_> = self
            .rules
            .iter()
            .map(|r| (r.target_type, r.requirements.len(), r.max_targets))
            .collect();
        f.debug_struct("TargetDefinition")
            .field("mode", &self.mode)
            .field("total_targets", &self.total_targets)
            .field("types", &types)
            .field("prevent_sorting", &self.prevent_sorting)
            .finish()
    }
}

/// Edits a definition registered on a card.
///
/// Returned by the `create_*_targets` methods of
/// [`CardSetup`](crate::cards::CardSetup); the definition is already
/// registered, so dropping the builder early is fine.
pub struct TargetBuilder<'a> {
    definition: &'a mut TargetDefinition,
}

impl<'a> TargetBuilder<'a> {
    pub(crate) fn new(definition: &'a mut TargetDefinition) -> Self {
        Self { definition }
    }

    pub fn allow(self, target_type: TargetType) -> Self {
        self.definition.add_type(target_type);
        self
    }

    pub fn require(self, predicate: impl Fn(&Game, &TargetArgs<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.definition.add_requirement(infallible(predicate));
        self
    }

    pub fn require_checked(
        self,
        predicate: impl Fn(&Game, &TargetArgs<'_>) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        self.definition.add_requirement(Arc::new(predicate));
        self
    }

    pub fn require_allied(self) -> Self {
        self.definition.add_requirement(allied());
        self
    }

    pub fn require_enemy(self) -> Self {
        self.definition.add_requirement(enemy());
        self
    }

    pub fn require_not_self(self) -> Self {
        self.definition.add_requirement(not_self());
        self
    }

    pub fn require_free_slot(self) -> Self {
        self.definition.add_requirement(free_slot());
        self
    }

    pub fn evaluate(self, evaluator: impl Fn(&Game, &TargetArgs<'_>) -> i32 + Send + Sync + 'static) -> Self {
        self.definition.add_evaluator(Arc::new(evaluator));
        self
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.definition.current().label = Some(label.into());
        self
    }

    pub fn total_targets(self, count: usize) -> Self {
        self.definition.total_targets = count;
        self
    }

    pub fn max_of_type(self, count: usize) -> Self {
        self.definition.current().max_targets = Some(count);
        self
    }

    pub fn prevent_sorting(self) -> Self {
        self.definition.prevent_sorting = true;
        self
    }
}

fn infallible(predicate: impl Fn(&Game, &TargetArgs<'_>) -> bool + Send + Sync + 'static) -> TargetRequirement {
    Arc::new(move |game: &Game, args: &TargetArgs<'_>| Ok(predicate(game, args)))
}

fn allied() -> TargetRequirement {
    Arc::new(|game: &Game, args: &TargetArgs<'_>| Ok(game.subject_owner(args.subject) == Some(args.player)))
}

fn enemy() -> TargetRequirement {
    Arc::new(|game: &Game, args: &TargetArgs<'_>| {
        Ok(game.subject_owner(args.subject) == Some(args.player.opponent()))
    })
}

fn not_self() -> TargetRequirement {
    Arc::new(|_: &Game, args: &TargetArgs<'_>| Ok(args.source.is_none() || args.card() != args.source))
}

fn free_slot() -> TargetRequirement {
    Arc::new(|game: &Game, args: &TargetArgs<'_>| {
        Ok(args
            .row()
            .and_then(|row| game.board().row(row))
            .is_some_and(|row| !row.is_full()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_moves_cursor() {
        let definition = TargetDefinition::new(TargetMode::DeployEffect, TargetType::Unit)
            .require_enemy()
            .allow(TargetType::BoardRow)
            .max_of_type(1)
            .label("row");

        let unit = definition.rules_for(TargetType::Unit).unwrap();
        let row = definition.rules_for(TargetType::BoardRow).unwrap();
        assert_eq!(unit.requirements.len(), 1);
        assert_eq!(unit.max_targets, None);
        assert_eq!(row.max_targets, Some(1));
        assert_eq!(row.label.as_deref(), Some("row"));
    }

    #[test]
    fn test_merge_appends() {
        let mut base = TargetDefinition::new(TargetMode::DeployEffect, TargetType::Unit)
            .require_allied()
            .max_of_type(3);
        let extra = TargetDefinition::new(TargetMode::DeployEffect, TargetType::Unit)
            .require_not_self()
            .max_of_type(2)
            .allow(TargetType::CardInUnitHand)
            .prevent_sorting();

        base.merge(&extra);

        let unit = base.rules_for(TargetType::Unit).unwrap();
        assert_eq!(unit.requirements.len(), 2);
        assert_eq!(unit.max_targets, Some(2));
        assert!(base.allows(TargetType::CardInUnitHand));
        assert!(base.is_sorting_prevented());
        assert_eq!(base.get_total_targets(), 1);
    }

    #[test]
    fn test_builder_edits_in_place() {
        let mut definition = TargetDefinition::new(TargetMode::UnitOrder, TargetType::Unit);
        TargetBuilder::new(&mut definition)
            .require_enemy()
            .total_targets(2)
            .evaluate(|_, _| 5);
        assert_eq!(definition.get_total_targets(), 2);
        assert_eq!(definition.rules_for(TargetType::Unit).unwrap().evaluators.len(), 1);
    }
}
