//! Valid-target computation.
//!
//! Every query recomputes from the live match state. Nothing is cached
//! between a target request and the player's answer, so a selection is
//! checked against the board as it is when the answer arrives.

use std::cmp::Ordering;

use tracing::trace;

use crate::cards::{BotEvaluation, Card, CardFeature, CardType};
use crate::core::{CardId, Game, PlayerId};
use crate::zones::CardLocation;

use super::definition::{TargetDefinition, TypeRules};
use super::target::{CardTarget, TargetArgs, TargetMode, TargetSubject, TargetType};

impl Game {
    /// The player a target subject belongs to: the card owner for cards and
    /// units, the row owner for rows and positions.
    #[must_use]
    pub fn subject_owner(&self, subject: &TargetSubject) -> Option<PlayerId> {
        match subject {
            TargetSubject::Unit { card } | TargetSubject::Card { card } => self.card_owner(*card),
            TargetSubject::Row { row } | TargetSubject::Position { row, .. } => {
                self.board.row(*row).and_then(|r| r.owner())
            }
            TargetSubject::LibraryCard { .. } => None,
        }
    }

    /// Definitions in effect for `source` in `mode`: the card's own (or the
    /// built-in default), then buff merges in buff order, then buff
    /// overrides in buff order.
    #[must_use]
    pub fn target_definitions(&self, mode: TargetMode, source: Option<CardId>) -> Vec<TargetDefinition> {
        let card = source.and_then(|id| self.card(id));
        let mut definitions: Vec<TargetDefinition> = card
            .map(|c| c.target_definitions(mode).cloned().collect())
            .unwrap_or_default();
        if definitions.is_empty() {
            definitions = self.default_definitions(mode, card);
        }

        let Some(card) = card else {
            return definitions;
        };
        for buff in card.buffs().iter() {
            for merge in buff.definition().target_merges.iter().filter(|d| d.mode == mode) {
                for definition in &mut definitions {
                    definition.merge(merge);
                }
            }
        }
        for buff in card.buffs().iter() {
            for (_, replace) in buff.definition().target_overrides.iter().filter(|(m, _)| *m == mode) {
                definitions = definitions.into_iter().map(|d| replace(d)).collect();
            }
        }
        definitions
    }

    fn default_definitions(&self, mode: TargetMode, card: Option<&Card>) -> Vec<TargetDefinition> {
        let is_unit = card.is_some_and(|c| c.card_type() == CardType::Unit);
        match mode {
            TargetMode::CardPlay if is_unit => vec![TargetDefinition::new(mode, TargetType::BoardRow)
                .require_allied()
                .require_free_slot()
                .label("Deploy")],
            TargetMode::UnitOrder if is_unit => vec![TargetDefinition::new(mode, TargetType::Unit)
                .require_enemy()
                .require(|game, args| {
                    args.source
                        .and_then(|source| game.card(source))
                        .is_some_and(|unit| unit.attack() > 0)
                })
                .evaluate(|game, args| {
                    let attack = args.source.and_then(|s| game.card(s)).map_or(0, Card::attack);
                    let durability = args.card().and_then(|c| game.card(c)).map_or(0, |c| c.power() + c.armor());
                    attack.min(durability)
                })
                .label("Attack")],
            TargetMode::Mulligan => vec![TargetDefinition::new(mode, TargetType::CardInUnitHand)
                .require_allied()
                .total_targets(self.config.mulligan_count)
                .label("Replace")],
            _ => Vec::new(),
        }
    }

    /// Every target `player` may currently pick for `source` in `mode`.
    ///
    /// `previous` holds the targets already confirmed in this resolution;
    /// their subjects are excluded and they count toward the definition's
    /// limits.
    #[must_use]
    pub fn valid_targets(
        &self,
        mode: TargetMode,
        source: Option<CardId>,
        player: PlayerId,
        previous: &[CardTarget],
    ) -> Vec<CardTarget> {
        let confirmed = previous.iter().filter(|t| t.mode == mode).count();
        let mut targets: Vec<CardTarget> = Vec::new();

        for definition in self.target_definitions(mode, source) {
            if confirmed >= definition.total_targets {
                continue;
            }
            for rules in &definition.rules {
                let of_type = previous
                    .iter()
                    .filter(|t| t.mode == mode && t.target_type == rules.target_type)
                    .count();
                if rules.max_targets.is_some_and(|max| of_type >= max) {
                    continue;
                }

                let mut found = self.collect_targets(mode, source, player, previous, rules);
                if rules.target_type.is_card_zone() && !definition.prevent_sorting {
                    found.sort_by(|a, b| self.canonical_subject_cmp(&a.subject, &b.subject));
                }
                for target in found {
                    if !targets.contains(&target) {
                        targets.push(target);
                    }
                }
            }
        }
        trace!(?mode, ?source, %player, count = targets.len(), "valid targets computed");
        targets
    }

    /// Whether `target` is in a freshly computed valid list.
    #[must_use]
    pub fn is_valid_target(&self, target: &CardTarget, player: PlayerId, previous: &[CardTarget]) -> bool {
        self.valid_targets(target.mode, target.source, player, previous)
            .contains(target)
    }

    fn collect_targets(
        &self,
        mode: TargetMode,
        source: Option<CardId>,
        player: PlayerId,
        previous: &[CardTarget],
        rules: &TypeRules,
    ) -> Vec<CardTarget> {
        let mut found = Vec::new();
        for subject in self.raw_candidates(rules.target_type) {
            if previous.iter().any(|t| t.subject == subject) {
                continue;
            }
            if let Some(card) = subject.card().and_then(|id| self.card(id)) {
                if card.is_dead() || (mode != TargetMode::Mulligan && card.has_feature(CardFeature::Untargetable)) {
                    continue;
                }
            }

            let args = TargetArgs {
                mode,
                target_type: rules.target_type,
                source,
                player,
                subject: &subject,
                previous,
            };
            let accepted = rules.requirements.iter().all(|requirement| match requirement(self, &args) {
                Ok(result) => result,
                Err(error) => {
                    trace!(?mode, ?subject, %error, "target requirement failed");
                    false
                }
            });
            if !accepted {
                continue;
            }

            let evaluation: i32 = rules.evaluators.iter().map(|evaluate| evaluate(self, &args)).sum();
            let expected_value = self.score(&subject, evaluation);
            let label = rules.label.clone().unwrap_or_default();
            found.push(
                CardTarget::new(mode, rules.target_type, source, subject)
                    .with_label(label)
                    .with_expected_value(expected_value),
            );
        }
        found
    }

    fn raw_candidates(&self, target_type: TargetType) -> Vec<TargetSubject> {
        let zone_cards = |zone: fn(PlayerId) -> CardLocation, card_type: CardType| -> Vec<TargetSubject> {
            PlayerId::all()
                .flat_map(|player| self.zones.cards_in(zone(player)).iter().copied())
                .filter(|&id| self.card(id).is_some_and(|c| c.card_type() == card_type))
                .map(|card| TargetSubject::Card { card })
                .collect()
        };

        match target_type {
            TargetType::Unit => self.board.all_units().map(|card| TargetSubject::Unit { card }).collect(),
            TargetType::BoardRow => (0..self.board.row_count()).map(|row| TargetSubject::Row { row }).collect(),
            TargetType::Position => self
                .board
                .rows()
                .iter()
                .filter(|row| !row.is_full())
                .flat_map(|row| {
                    (0..=row.len()).map(move |index| TargetSubject::Position {
                        row: row.index(),
                        index,
                    })
                })
                .collect(),
            TargetType::CardInLibrary => self
                .library
                .collectible()
                .map(|definition| TargetSubject::LibraryCard {
                    class: definition.class.clone(),
                })
                .collect(),
            TargetType::CardInUnitHand => zone_cards(CardLocation::Hand, CardType::Unit),
            TargetType::CardInSpellHand => zone_cards(CardLocation::Hand, CardType::Spell),
            TargetType::CardInUnitDeck => zone_cards(CardLocation::Deck, CardType::Unit),
            TargetType::CardInSpellDeck => zone_cards(CardLocation::Deck, CardType::Spell),
        }
    }

    fn score(&self, subject: &TargetSubject, evaluation: i32) -> i32 {
        let tuning = match subject {
            TargetSubject::Unit { card } | TargetSubject::Card { card } => {
                self.card(*card).map(|c| c.definition().bot_evaluation)
            }
            TargetSubject::LibraryCard { class } => self.library.definition(class).map(|d| d.bot_evaluation),
            _ => None,
        }
        .unwrap_or_default();
        score_with(tuning, evaluation)
    }

    fn canonical_subject_cmp(&self, a: &TargetSubject, b: &TargetSubject) -> Ordering {
        let definition = |subject: &TargetSubject| match subject {
            TargetSubject::Card { card } | TargetSubject::Unit { card } => self.card(*card).map(Card::definition),
            TargetSubject::LibraryCard { class } => self.library.definition(class),
            _ => None,
        };
        match (definition(a), definition(b)) {
            (Some(x), Some(y)) => x.canonical_cmp(y).then_with(|| a.card().cmp(&b.card())),
            _ => Ordering::Equal,
        }
    }
}

/// `max(evaluation * threat_multiplier, base_threat)`.
fn score_with(tuning: BotEvaluation, evaluation: i32) -> i32 {
    let scaled = (evaluation as f32 * tuning.threat_multiplier).round() as i32;
    scaled.max(tuning.base_threat)
}
