//! Valid-target computation and unit orders.

use std::sync::Arc;

use ccg_rules::cards::{CardColor, CardDefinition};
use ccg_rules::core::{CardId, Game, GameConfig, PlayerId};
use ccg_rules::games::basic::{self, classes};
use ccg_rules::net::{IntentOutcome, RejectReason};
use ccg_rules::targeting::{CardTarget, TargetMode, TargetSubject, TargetType};
use ccg_rules::zones::CardLocation;

const FIRST: PlayerId = PlayerId::FIRST;
const SECOND: PlayerId = PlayerId::SECOND;

fn started_game(config: GameConfig) -> Game {
    let config = config.with_mulligan_count(0).with_starting_hand(0, 0);
    let mut game = Game::new(config, Arc::new(basic::library()));
    for player in PlayerId::all() {
        game.load_deck(player, &[classes::TESTING_UNIT; 10]).unwrap();
    }
    game.start().unwrap();
    game.drain_messages();
    game
}

fn unit(game: &mut Game, class: &str, owner: PlayerId, row: usize, index: usize) -> CardId {
    game.spawn_unit(class, owner, row, index).unwrap().unwrap()
}

fn subjects(targets: &[CardTarget]) -> Vec<TargetSubject> {
    targets.iter().map(|t| t.subject.clone()).collect()
}

fn attack_targets(game: &Game, attacker: CardId, player: PlayerId) -> Vec<CardTarget> {
    let previous: Vec<CardTarget> = game
        .turn_orders()
        .iter()
        .filter(|order| order.source == Some(attacker))
        .cloned()
        .collect();
    game.valid_targets(TargetMode::UnitOrder, Some(attacker), player, &previous)
}

// =============================================================================
// Card placement
// =============================================================================

/// Units may be placed on their owner's rows only.
#[test]
fn test_default_placement_is_allied_rows() {
    let mut game = started_game(GameConfig::default());
    let card = game
        .spawn_card(classes::TESTING_UNIT, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let rows = subjects(&game.valid_targets(TargetMode::CardPlay, Some(card), FIRST, &[]));
    assert_eq!(
        rows,
        vec![
            TargetSubject::Row { row: 3 },
            TargetSubject::Row { row: 4 },
            TargetSubject::Row { row: 5 },
        ]
    );
}

/// Full rows are not offered for placement.
#[test]
fn test_full_row_not_offered() {
    let mut game = started_game(GameConfig::default().with_max_units_per_row(2));
    unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 1);
    let card = game
        .spawn_card(classes::TESTING_UNIT, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let rows = subjects(&game.valid_targets(TargetMode::CardPlay, Some(card), FIRST, &[]));
    assert!(!rows.contains(&TargetSubject::Row { row: 3 }));
    assert_eq!(rows.len(), 2);
    assert_eq!(
        game.play_card(FIRST, card, 3, 0).unwrap(),
        IntentOutcome::Rejected(RejectReason::InvalidRow)
    );
}

/// Captured rows count as the captor's.
#[test]
fn test_row_ownership_follows_captures() {
    let mut game = started_game(GameConfig::default());
    game.set_row_owner(2, Some(FIRST)).unwrap();
    let card = game
        .spawn_card(classes::TESTING_UNIT, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let rows = subjects(&game.valid_targets(TargetMode::CardPlay, Some(card), FIRST, &[]));
    assert!(rows.contains(&TargetSubject::Row { row: 2 }));
    assert!(game.play_card(FIRST, card, 2, 0).unwrap().is_applied());
    assert_eq!(game.board().row(2).unwrap().units(), &[card]);
}

// =============================================================================
// Card effect targets
// =============================================================================

/// Veiled units cannot be picked by effects.
#[test]
fn test_veiled_unit_is_untargetable() {
    let mut game = started_game(GameConfig::default());
    let veiled = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);
    let open = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 1);
    game.add_buff(veiled, classes::VEIL, None).unwrap();
    let strike = game
        .spawn_card(classes::QUICK_STRIKE, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let targets = subjects(&game.valid_targets(TargetMode::DeployEffect, Some(strike), FIRST, &[]));
    assert_eq!(targets, vec![TargetSubject::Unit { card: open }]);

    game.tick_buff_durations(SECOND).unwrap();
    let targets = game.valid_targets(TargetMode::DeployEffect, Some(strike), FIRST, &[]);
    assert_eq!(targets.len(), 2);
}

/// Only bronze units with three power or less can be conjured.
#[test]
fn test_conjure_offers_filtered_library() {
    let mut game = started_game(GameConfig::default());
    let conjure = game
        .spawn_card(classes::CONJURE_ALLY, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let mut classes_offered: Vec<String> = game
        .valid_targets(TargetMode::DeployEffect, Some(conjure), FIRST, &[])
        .into_iter()
        .filter_map(|t| match t.subject {
            TargetSubject::LibraryCard { class } => Some(class),
            _ => None,
        })
        .collect();
    classes_offered.sort();
    assert_eq!(classes_offered, vec![classes::ARCANE_SCHOLAR, classes::ELDER_HOUNDMASTER]);
}

/// Confirmed subjects are never offered again.
#[test]
fn test_previous_targets_excluded() {
    let mut game = started_game(GameConfig::default());
    let a = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);
    let b = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 1);
    let volley = game
        .spawn_card(classes::ARCANE_VOLLEY, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let all = game.valid_targets(TargetMode::DeployEffect, Some(volley), FIRST, &[]);
    assert_eq!(all.len(), 2);
    let first_pick: Vec<CardTarget> = all
        .iter()
        .filter(|t| t.subject == TargetSubject::Unit { card: a })
        .cloned()
        .collect();

    let rest = subjects(&game.valid_targets(TargetMode::DeployEffect, Some(volley), FIRST, &first_pick));
    assert_eq!(rest, vec![TargetSubject::Unit { card: b }]);
}

/// Targets carry the label of the rule that produced them.
#[test]
fn test_targets_are_labelled() {
    let mut game = started_game(GameConfig::default());
    unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);
    let strike = game
        .spawn_card(classes::QUICK_STRIKE, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    let targets = game.valid_targets(TargetMode::DeployEffect, Some(strike), FIRST, &[]);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].label, "Strike");
    assert_eq!(targets[0].source, Some(strike));
}

// =============================================================================
// Unit orders
// =============================================================================

/// The built-in order attacks an enemy unit for the attacker's attack value.
#[test]
fn test_default_attack_order() {
    let mut game = started_game(GameConfig::default());
    let attacker = unit(&mut game, classes::FAMINE_RIDER, FIRST, 3, 0);
    let enemy = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);

    let targets = attack_targets(&game, attacker, FIRST);
    assert_eq!(subjects(&targets), vec![TargetSubject::Unit { card: enemy }]);

    let outcome = game.order_unit(FIRST, targets[0].clone()).unwrap();
    assert!(outcome.is_applied());
    assert_eq!(game.card(enemy).unwrap().power(), 1);
    assert_eq!(game.turn_orders().len(), 1);
}

/// A unit gets one attack per turn.
#[test]
fn test_one_order_per_turn() {
    let mut game = started_game(GameConfig::default());
    let attacker = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let enemy = unit(&mut game, classes::FAMINE_RIDER, SECOND, 2, 0);

    let target = attack_targets(&game, attacker, FIRST).remove(0);
    assert!(game.order_unit(FIRST, target.clone()).unwrap().is_applied());
    assert_eq!(game.card(enemy).unwrap().power(), 9);

    assert!(attack_targets(&game, attacker, FIRST).is_empty());
    assert_eq!(
        game.order_unit(FIRST, target).unwrap(),
        IntentOutcome::Rejected(RejectReason::InvalidTarget)
    );
    assert_eq!(game.card(enemy).unwrap().power(), 9);
}

/// Units without attack have nothing to order.
#[test]
fn test_zero_attack_has_no_orders() {
    let mut game = started_game(GameConfig::default());
    let scholar = unit(&mut game, classes::ARCANE_SCHOLAR, FIRST, 3, 0);
    unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);

    assert!(attack_targets(&game, scholar, FIRST).is_empty());
}

/// Orders are only accepted for the active player's own units.
#[test]
fn test_order_rejections() {
    let mut game = started_game(GameConfig::default());
    let mine = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let theirs = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);

    let their_attack = attack_targets(&game, theirs, SECOND).remove(0);
    assert_eq!(
        game.order_unit(SECOND, their_attack.clone()).unwrap(),
        IntentOutcome::Rejected(RejectReason::NotYourTurn)
    );
    assert_eq!(
        game.order_unit(FIRST, their_attack).unwrap(),
        IntentOutcome::Rejected(RejectReason::NotYourUnit)
    );

    let misdirected = CardTarget::new(
        TargetMode::UnitOrder,
        TargetType::Unit,
        Some(mine),
        TargetSubject::Unit { card: mine },
    );
    assert_eq!(
        game.order_unit(FIRST, misdirected).unwrap(),
        IntentOutcome::Rejected(RejectReason::InvalidTarget)
    );
    assert_eq!(game.card(mine).unwrap().power(), 5);
}

// =============================================================================
// Limits and ordering
// =============================================================================

const RECRUITER: &str = "recruiter";
const SORTED_DRAFT: &str = "sortedDraft";
const HAND_DRAFT: &str = "handDraft";
const PAWN: &str = "pawn";
const KNIGHT: &str = "knight";
const HERO: &str = "hero";

fn limits_game() -> Game {
    let mut library = basic::library();
    library
        .register(CardDefinition::unit(PAWN, "Pawn").with_color(CardColor::Bronze).with_power(1))
        .register(CardDefinition::unit(KNIGHT, "Knight").with_color(CardColor::Silver).with_power(3))
        .register(CardDefinition::unit(HERO, "Hero").with_color(CardColor::Golden).with_power(5))
        .register_scripted(CardDefinition::spell(RECRUITER, "Recruiter"), |setup| {
            setup
                .create_deploy_targets(TargetType::Unit)
                .max_of_type(1)
                .allow(TargetType::CardInUnitHand)
                .total_targets(3);
        })
        .register_scripted(CardDefinition::spell(SORTED_DRAFT, "Sorted Draft"), |setup| {
            setup.create_deploy_targets(TargetType::CardInUnitHand);
        })
        .register_scripted(CardDefinition::spell(HAND_DRAFT, "Hand Draft"), |setup| {
            setup.create_deploy_targets(TargetType::CardInUnitHand).prevent_sorting();
        });
    Game::new(GameConfig::default(), Arc::new(library))
}

fn hand_cards(game: &mut Game, classes: &[&str]) -> Vec<CardId> {
    classes
        .iter()
        .map(|class| game.spawn_card(class, FIRST, CardLocation::Hand(FIRST)).unwrap())
        .collect()
}

/// "Up to three, at most one unit": once a unit is picked only hand cards remain.
#[test]
fn test_per_type_limit_drops_exhausted_type() {
    let mut game = limits_game();
    let enemy = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);
    unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let hand = hand_cards(&mut game, &[PAWN, KNIGHT]);
    let spell = game.spawn_card(RECRUITER, FIRST, CardLocation::Hand(FIRST)).unwrap();

    let fresh = game.valid_targets(TargetMode::DeployEffect, Some(spell), FIRST, &[]);
    assert_eq!(fresh.iter().filter(|t| t.target_type == TargetType::Unit).count(), 2);
    assert_eq!(fresh.iter().filter(|t| t.target_type == TargetType::CardInUnitHand).count(), 2);

    let picked = vec![CardTarget::new(
        TargetMode::DeployEffect,
        TargetType::Unit,
        Some(spell),
        TargetSubject::Unit { card: enemy },
    )];
    let after = game.valid_targets(TargetMode::DeployEffect, Some(spell), FIRST, &picked);
    assert_eq!(after.len(), 2);
    assert!(after
        .iter()
        .all(|t| t.target_type == TargetType::CardInUnitHand && hand.contains(&t.subject.card().unwrap())));
}

/// Hand targets come back in canonical order: rarity tier first.
#[test]
fn test_card_targets_are_sorted_canonically() {
    let mut game = limits_game();
    let hand = hand_cards(&mut game, &[PAWN, KNIGHT, HERO]);
    let spell = game.spawn_card(SORTED_DRAFT, FIRST, CardLocation::Hand(FIRST)).unwrap();

    let targets = subjects(&game.valid_targets(TargetMode::DeployEffect, Some(spell), FIRST, &[]));
    assert_eq!(
        targets,
        vec![
            TargetSubject::Card { card: hand[2] },
            TargetSubject::Card { card: hand[1] },
            TargetSubject::Card { card: hand[0] },
        ]
    );
}

/// Equal definitions fall back to card id.
#[test]
fn test_card_targets_tie_break_on_id() {
    let mut game = limits_game();
    let hand = hand_cards(&mut game, &[PAWN, PAWN]);
    let spell = game.spawn_card(SORTED_DRAFT, FIRST, CardLocation::Hand(FIRST)).unwrap();

    let targets = subjects(&game.valid_targets(TargetMode::DeployEffect, Some(spell), FIRST, &[]));
    let mut expected = hand.clone();
    expected.sort();
    assert_eq!(
        targets,
        expected.into_iter().map(|card| TargetSubject::Card { card }).collect::<Vec<_>>()
    );
}

/// With sorting prevented, hand targets keep zone order.
#[test]
fn test_prevent_sorting_keeps_zone_order() {
    let mut game = limits_game();
    let hand = hand_cards(&mut game, &[PAWN, KNIGHT, HERO]);
    let spell = game.spawn_card(HAND_DRAFT, FIRST, CardLocation::Hand(FIRST)).unwrap();

    let zone_order: Vec<TargetSubject> = game
        .zones()
        .cards_in(CardLocation::Hand(FIRST))
        .iter()
        .filter(|&&id| hand.contains(&id))
        .map(|&card| TargetSubject::Card { card })
        .collect();
    let targets = subjects(&game.valid_targets(TargetMode::DeployEffect, Some(spell), FIRST, &[]));
    assert_eq!(targets, zone_order);
    assert_eq!(
        targets,
        hand.iter().map(|&card| TargetSubject::Card { card }).collect::<Vec<_>>()
    );
}
