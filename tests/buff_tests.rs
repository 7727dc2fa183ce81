//! Buff stacking, stat syncing, cleansing and target-definition changes,
//! plus the remaining board and visibility operations buffs interact with.

use std::sync::{Arc, Mutex};

use ccg_rules::buffs::{BuffAlignment, BuffDefinition, BuffStackType, CardStat};
use ccg_rules::cards::CardLibrary;
use ccg_rules::combat::DamageInstance;
use ccg_rules::core::{CardId, Game, GameConfig, PlayerId};
use ccg_rules::events::{Subscriber, UnitMovedArgs};
use ccg_rules::games::basic::{self, classes};
use ccg_rules::net::OutgoingMessage;
use ccg_rules::targeting::{TargetDefinition, TargetMode, TargetSubject, TargetType};
use ccg_rules::zones::CardLocation;

const FIRST: PlayerId = PlayerId::FIRST;
const SECOND: PlayerId = PlayerId::SECOND;

const WARD: &str = "ward";
const WEAKNESS: &str = "weakness";
const PICKY: &str = "picky";
const TURNCOAT: &str = "turncoat";

fn library() -> Arc<CardLibrary> {
    let mut library = basic::library();
    library
        .register_buff(
            BuffDefinition::new(WARD, BuffStackType::StackIndependently, BuffAlignment::Positive)
                .with_modifier(CardStat::MaxArmor, 1),
        )
        .register_buff(
            BuffDefinition::new(WEAKNESS, BuffStackType::AddIntensity, BuffAlignment::Negative)
                .with_modifier(CardStat::MaxPower, -1),
        )
        .register_buff(
            BuffDefinition::new(PICKY, BuffStackType::Replace, BuffAlignment::Neutral).merges_targets(
                TargetDefinition::new(TargetMode::DeployEffect, TargetType::Unit)
                    .require(|game, args| args.card().and_then(|c| game.card(c)).is_some_and(|c| c.power() >= 5)),
            ),
        )
        .register_buff(
            BuffDefinition::new(TURNCOAT, BuffStackType::Replace, BuffAlignment::Negative).overrides_targets(
                TargetMode::DeployEffect,
                |_| TargetDefinition::new(TargetMode::DeployEffect, TargetType::Unit).require_allied(),
            ),
        );
    Arc::new(library)
}

fn new_game() -> Game {
    Game::new(GameConfig::default(), library())
}

fn unit(game: &mut Game, class: &str, owner: PlayerId, row: usize, index: usize) -> CardId {
    game.spawn_unit(class, owner, row, index).unwrap().unwrap()
}

fn buff_count(game: &Game, card: CardId) -> usize {
    game.card(card).unwrap().buffs().len()
}

// =============================================================================
// Stacking
// =============================================================================

#[test]
fn test_add_intensity_stacks_into_one_buff() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);

    let first = game.add_buff(card, classes::STRENGTH, None).unwrap();
    let second = game.add_buff(card, classes::STRENGTH, None).unwrap();

    assert_eq!(first, second);
    assert_eq!(buff_count(&game, card), 1);
    let card = game.card(card).unwrap();
    assert_eq!(card.buffs().intensity_of(classes::STRENGTH), 2);
    assert_eq!(card.max_power(), 7);
    assert_eq!(card.power(), 7);
}

#[test]
fn test_replace_swaps_the_buff() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);

    let first = game.add_buff(card, classes::UNDYING, None).unwrap();
    let second = game.add_buff(card, classes::UNDYING, None).unwrap();

    assert_ne!(first, second);
    assert_eq!(buff_count(&game, card), 1);
    assert!(game.card(card).unwrap().buffs().get(first).is_none());
    // The replaced buff's hook went with it; only one prevention hook remains.
    assert_eq!(game.events().subscriptions_of(Subscriber::Buff(first)).len(), 0);
    assert_eq!(game.events().subscriptions_of(Subscriber::Buff(second)).len(), 1);
}

#[test]
fn test_add_duration_extends_the_buff() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);

    let veil = game.add_buff(card, classes::VEIL, None).unwrap();
    game.add_buff(card, classes::VEIL, None).unwrap();
    assert_eq!(game.card(card).unwrap().buffs().get(veil).unwrap().duration(), Some(2));

    game.tick_buff_durations(SECOND).unwrap();
    assert_eq!(game.card(card).unwrap().buffs().get(veil).unwrap().duration(), Some(1));
    game.tick_buff_durations(SECOND).unwrap();
    assert!(game.card(card).unwrap().buffs().get(veil).is_none());
}

#[test]
fn test_independent_stacks_are_separate_buffs() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);

    game.add_buff(card, WARD, None).unwrap();
    game.add_buff(card, WARD, None).unwrap();

    assert_eq!(buff_count(&game, card), 2);
    let card = game.card(card).unwrap();
    assert_eq!(card.max_armor(), 2);
    assert_eq!(card.armor(), 2);
}

// =============================================================================
// Stat syncing and cleansing
// =============================================================================

/// Losing maximum power clamps current power instead of subtracting.
#[test]
fn test_lowering_max_power_clamps() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let strength = game.add_buff_with(card, classes::STRENGTH, None, 3, None).unwrap();
    game.deal_damage(card, DamageInstance::from_universe(1)).unwrap();
    assert_eq!(game.card(card).unwrap().power(), 7);

    game.remove_buff(card, strength).unwrap();
    assert_eq!(game.card(card).unwrap().power(), 5);

    game.add_buff_with(card, WEAKNESS, None, 2, None).unwrap();
    assert_eq!(game.card(card).unwrap().power(), 3);
}

#[test]
fn test_cleanse_by_alignment() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    game.add_buff(card, classes::STRENGTH, None).unwrap();
    game.add_buff(card, WEAKNESS, None).unwrap();
    assert_eq!(game.card(card).unwrap().max_power(), 5);

    assert_eq!(game.cleanse(card, Some(BuffAlignment::Negative)).unwrap(), 1);
    let cleansed = game.card(card).unwrap();
    assert!(cleansed.buffs().has(classes::STRENGTH));
    assert_eq!(cleansed.max_power(), 6);

    assert_eq!(game.cleanse(card, None).unwrap(), 1);
    assert!(game.card(card).unwrap().buffs().is_empty());
}

/// Removing a buff removes the hooks its script registered.
#[test]
fn test_buff_subscriptions_leave_with_the_buff() {
    let mut game = new_game();
    let ally = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let guard = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 1);
    let protector = game.add_buff(guard, classes::PROTECTOR, None).unwrap();

    game.deal_damage(ally, DamageInstance::from_universe(1)).unwrap();
    assert_eq!(game.card(guard).unwrap().power(), 4);

    game.remove_buff(guard, protector).unwrap();
    game.deal_damage(ally, DamageInstance::from_universe(1)).unwrap();
    assert_eq!(game.card(ally).unwrap().power(), 4);
    assert_eq!(game.card(guard).unwrap().power(), 4);
}

// =============================================================================
// Target definition changes
// =============================================================================

fn strike_candidates(game: &Game, strike: CardId) -> Vec<TargetSubject> {
    game.valid_targets(TargetMode::DeployEffect, Some(strike), FIRST, &[])
        .into_iter()
        .map(|t| t.subject)
        .collect()
}

/// A merged definition adds requirements on top of the card's own.
#[test]
fn test_buff_merges_target_requirements() {
    let mut game = new_game();
    let strong = unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);
    let weak = unit(&mut game, classes::TRAINED_HOUND, SECOND, 2, 1);
    unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let strike = game
        .spawn_card(classes::QUICK_STRIKE, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    assert_eq!(
        strike_candidates(&game, strike),
        vec![TargetSubject::Unit { card: strong }, TargetSubject::Unit { card: weak }]
    );

    game.add_buff(strike, PICKY, None).unwrap();
    // Still enemy-only: the merge narrows, it does not replace.
    assert_eq!(strike_candidates(&game, strike), vec![TargetSubject::Unit { card: strong }]);
}

/// An override replaces the card's definition outright.
#[test]
fn test_buff_overrides_target_definition() {
    let mut game = new_game();
    unit(&mut game, classes::TESTING_UNIT, SECOND, 2, 0);
    let ally = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let strike = game
        .spawn_card(classes::QUICK_STRIKE, FIRST, CardLocation::Hand(FIRST))
        .unwrap();

    game.add_buff(strike, TURNCOAT, None).unwrap();
    assert_eq!(strike_candidates(&game, strike), vec![TargetSubject::Unit { card: ally }]);
}

// =============================================================================
// Board moves and visibility
// =============================================================================

#[test]
fn test_move_unit_posts_event_and_message() {
    let mut game = new_game();
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    let moves = Arc::new(Mutex::new(Vec::new()));
    {
        let moves = Arc::clone(&moves);
        game.events_mut()
            .callback::<UnitMovedArgs>(Subscriber::Card(CardId(70_000)))
            .perform(move |_, args| {
                moves.lock().unwrap().push((args.from_row, args.to_row));
                Ok(())
            });
    }
    game.drain_messages();

    let position = game.move_unit(card, 4, 0).unwrap().unwrap();
    assert_eq!((position.row, position.index), (4, 0));
    assert!(game.board().row(3).unwrap().is_empty());
    assert_eq!(*moves.lock().unwrap(), vec![(3, 4)]);
    assert!(game
        .drain_messages()
        .iter()
        .any(|d| d.to == SECOND && d.message == OutgoingMessage::UnitMoved { card, row: 4, index: 0 }));
}

#[test]
fn test_move_into_full_row_is_refused() {
    let mut game = Game::new(GameConfig::default().with_max_units_per_row(1), library());
    let card = unit(&mut game, classes::TESTING_UNIT, FIRST, 3, 0);
    unit(&mut game, classes::TESTING_UNIT, FIRST, 4, 0);

    assert!(game.move_unit(card, 4, 0).unwrap().is_none());
    assert_eq!(game.board().row(3).unwrap().units(), &[card]);
}

/// Revealing a hand card shows it to the opponent.
#[test]
fn test_reveal_card() {
    let mut game = new_game();
    let card = game
        .spawn_card(classes::TESTING_UNIT, FIRST, CardLocation::Hand(FIRST))
        .unwrap();
    assert!(game.snapshot_for(SECOND).unwrap().opponent_hand[0].is_hidden());
    game.drain_messages();

    game.reveal_card(card).unwrap();

    assert!(!game.snapshot_for(SECOND).unwrap().opponent_hand[0].is_hidden());
    let to_second: Vec<OutgoingMessage> = game
        .drain_messages()
        .into_iter()
        .filter(|d| d.to == SECOND)
        .map(|d| d.message)
        .collect();
    assert!(matches!(to_second.as_slice(), [OutgoingMessage::CardRevealed(message)] if message.id == card));
}
