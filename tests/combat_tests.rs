//! Damage, healing and destruction integration tests.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use ccg_rules::buffs::BuffSource;
use ccg_rules::cards::{CardDefinition, CardLibrary};
use ccg_rules::combat::{split_damage, DamageInstance, HealingInstance};
use ccg_rules::core::{CardId, Game, GameConfig, PlayerId};
use ccg_rules::events::{CardDestroyedArgs, CardTakesDamageArgs, CardTakesDamageHook, Subscriber};
use ccg_rules::games::basic::{self, classes};
use ccg_rules::zones::CardLocation;

const FOOTMAN: &str = "footman";
const KNIGHT: &str = "knight";

fn library() -> Arc<CardLibrary> {
    let mut library = basic::library();
    library
        .register(CardDefinition::unit(FOOTMAN, "Footman").with_power(3))
        .register(CardDefinition::unit(KNIGHT, "Knight").with_power(5).with_armor(2));
    Arc::new(library)
}

fn new_game() -> Game {
    Game::new(GameConfig::default(), library())
}

fn unit(game: &mut Game, class: &str, owner: PlayerId, row: usize, index: usize) -> CardId {
    game.spawn_unit(class, owner, row, index).unwrap().unwrap()
}

fn count_destroyed(game: &mut Game) -> Arc<Mutex<Vec<CardId>>> {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&destroyed);
    game.events_mut()
        .callback::<CardDestroyedArgs>(Subscriber::Card(CardId(50_000)))
        .perform(move |_, args| {
            sink.lock().unwrap().push(args.card);
            Ok(())
        });
    destroyed
}

// =============================================================================
// Damage split
// =============================================================================

/// Overkill on an unarmored unit destroys it exactly once.
#[test]
fn test_lethal_damage_destroys() {
    let mut game = new_game();
    let footman = unit(&mut game, FOOTMAN, PlayerId::FIRST, 3, 0);
    let destroyed = count_destroyed(&mut game);

    game.deal_damage(footman, DamageInstance::from_universe(5)).unwrap();

    let card = game.card(footman).unwrap();
    assert_eq!(card.power(), 0);
    assert!(card.is_dead());
    assert_eq!(*destroyed.lock().unwrap(), vec![footman]);
    assert_eq!(game.card_location(footman), Some(CardLocation::Graveyard(PlayerId::FIRST)));
    assert!(game.board().find_unit(footman).is_none());
}

/// Armor soaks a hit no larger than itself.
#[test]
fn test_armor_absorbs_small_hit() {
    let mut game = new_game();
    let knight = unit(&mut game, KNIGHT, PlayerId::FIRST, 3, 0);
    let destroyed = count_destroyed(&mut game);

    game.deal_damage(knight, DamageInstance::from_universe(2)).unwrap();

    let card = game.card(knight).unwrap();
    assert_eq!(card.armor(), 0);
    assert_eq!(card.power(), 5);
    assert!(destroyed.lock().unwrap().is_empty());
}

/// Damage past the armor reaches power.
#[test]
fn test_armor_then_power() {
    let mut game = new_game();
    let knight = unit(&mut game, KNIGHT, PlayerId::FIRST, 3, 0);
    let parts = Arc::new(Mutex::new(None));
    {
        let parts = Arc::clone(&parts);
        game.events_mut()
            .callback::<CardTakesDamageArgs>(Subscriber::Card(CardId(50_001)))
            .perform(move |_, args| {
                let armor = args.armor_damage.as_ref().map(|d| d.value);
                let power = args.power_damage.as_ref().map(|d| d.value);
                *parts.lock().unwrap() = Some((args.damage.value, armor, power));
                Ok(())
            });
    }

    game.deal_damage(knight, DamageInstance::from_universe(3)).unwrap();

    let card = game.card(knight).unwrap();
    assert_eq!(card.armor(), 0);
    assert_eq!(card.power(), 4);
    assert!(!card.is_dead());
    assert_eq!(*parts.lock().unwrap(), Some((3, Some(2), Some(1))));
}

/// Armor-only damage does not post a power part.
#[test]
fn test_armor_only_hit_has_no_power_part() {
    let mut game = new_game();
    let knight = unit(&mut game, KNIGHT, PlayerId::SECOND, 1, 0);
    let power_part = Arc::new(Mutex::new(Some(-1)));
    {
        let power_part = Arc::clone(&power_part);
        game.events_mut()
            .callback::<CardTakesDamageArgs>(Subscriber::Card(CardId(50_002)))
            .perform(move |_, args| {
                *power_part.lock().unwrap() = args.power_damage.as_ref().map(|d| d.value);
                Ok(())
            });
    }

    game.deal_damage(knight, DamageInstance::from_universe(1)).unwrap();
    assert_eq!(*power_part.lock().unwrap(), None);
    assert_eq!(game.card(knight).unwrap().armor(), 1);
}

proptest! {
    /// Armor absorbs first; power never drops below zero.
    #[test]
    fn prop_split_damage(damage in 0i32..40, armor in 0i32..10, power in 0i32..20) {
        let (armor_part, power_part) = split_damage(damage, armor, power);
        prop_assert_eq!(armor - armor_part, (armor - damage).max(0));
        prop_assert_eq!(power - power_part, (power - (damage - armor).max(0)).max(0));
        prop_assert!(armor_part + power_part <= damage);
    }

    /// The live pipeline follows the same split.
    #[test]
    fn prop_pipeline_matches_split(damage in 1i32..30, armor in 0i32..8, power in 1i32..15) {
        let mut library = basic::library();
        library.register(
            CardDefinition::unit("dummy", "Dummy").with_power(power).with_armor(armor),
        );
        let mut game = Game::new(GameConfig::default(), Arc::new(library));
        let dummy = game.spawn_unit("dummy", PlayerId::FIRST, 3, 0).unwrap().unwrap();

        game.deal_damage(dummy, DamageInstance::from_universe(damage)).unwrap();

        let card = game.card(dummy).unwrap();
        let expected_power = (power - (damage - armor).max(0)).max(0);
        prop_assert_eq!(card.armor(), (armor - damage).max(0));
        prop_assert_eq!(card.power(), expected_power);
        prop_assert_eq!(card.is_dead(), expected_power == 0);
    }
}

// =============================================================================
// Destruction prevention
// =============================================================================

/// A prevented destruction leaves the unit on the board at zero power until
/// the preventing buff goes away.
#[test]
fn test_prevented_destruction_keeps_unit_at_zero() {
    let mut game = new_game();
    let footman = unit(&mut game, FOOTMAN, PlayerId::FIRST, 3, 0);
    let undying = game.add_buff(footman, classes::UNDYING, None).unwrap();

    game.deal_damage(footman, DamageInstance::from_universe(10)).unwrap();
    let card = game.card(footman).unwrap();
    assert_eq!(card.power(), 0);
    assert!(!card.is_dead());
    assert!(game.board().find_unit(footman).is_some());

    game.deal_damage(footman, DamageInstance::from_universe(1)).unwrap();
    assert!(!game.card(footman).unwrap().is_dead());

    game.remove_buff(footman, undying).unwrap();
    game.deal_damage(footman, DamageInstance::from_universe(1)).unwrap();
    assert!(game.card(footman).unwrap().is_dead());
}

/// Undying runs out at the end of its owner's turn.
#[test]
fn test_undying_expires_with_owner_turn() {
    let mut game = new_game();
    let footman = unit(&mut game, FOOTMAN, PlayerId::FIRST, 3, 0);
    game.add_buff(footman, classes::UNDYING, Some(BuffSource::Card(footman)))
        .unwrap();

    game.tick_buff_durations(PlayerId::SECOND).unwrap();
    assert!(game.card(footman).unwrap().buffs().find(classes::UNDYING).is_some());

    game.tick_buff_durations(PlayerId::FIRST).unwrap();
    assert!(game.card(footman).unwrap().buffs().find(classes::UNDYING).is_none());
}

// =============================================================================
// Healing
// =============================================================================

/// Healing restores power up to the maximum.
#[test]
fn test_heal_caps_at_max_power() {
    let mut game = new_game();
    let knight = unit(&mut game, KNIGHT, PlayerId::FIRST, 3, 0);
    game.deal_damage(knight, DamageInstance::from_universe(5)).unwrap();
    assert_eq!(game.card(knight).unwrap().power(), 2);

    game.heal(knight, HealingInstance::from_universe(10)).unwrap();
    let card = game.card(knight).unwrap();
    assert_eq!(card.power(), 5);
    // Armor is not restored by healing.
    assert_eq!(card.armor(), 0);
}

/// Healing has no hook stage: a hook that cancels all damage leaves healing
/// untouched.
#[test]
fn test_heal_bypasses_hooks() {
    let mut game = new_game();
    let footman = unit(&mut game, FOOTMAN, PlayerId::FIRST, 3, 0);
    game.set_power(footman, 1).unwrap();

    game.events_mut()
        .hook::<CardTakesDamageHook>(Subscriber::Card(CardId(50_003)))
        .replace(|_, value, _| CardTakesDamageHook {
            damage: value.damage.with_value(0),
            ..value
        });

    game.heal(footman, HealingInstance::from_universe(1)).unwrap();
    assert_eq!(game.card(footman).unwrap().power(), 2);
}

// =============================================================================
// Card content
// =============================================================================

/// Damage aimed at a shieldbearer's neighbour hits the shieldbearer.
#[test]
fn test_protector_takes_adjacent_damage() {
    let mut game = new_game();
    let ally = unit(&mut game, FOOTMAN, PlayerId::FIRST, 3, 0);
    let bearer = unit(&mut game, classes::LOST_SHIELDBEARER, PlayerId::FIRST, 3, 1);
    let distant = unit(&mut game, FOOTMAN, PlayerId::FIRST, 4, 0);

    game.deal_damage(ally, DamageInstance::from_universe(2)).unwrap();
    assert_eq!(game.card(ally).unwrap().power(), 3);
    assert_eq!(game.card(bearer).unwrap().armor(), 1);

    game.deal_damage(distant, DamageInstance::from_universe(2)).unwrap();
    assert_eq!(game.card(distant).unwrap().power(), 1);
}

/// Volatile crystals chain into each other.
#[test]
fn test_volatile_crystals_chain() {
    let mut game = new_game();
    let crystals: Vec<CardId> = (0..3)
        .map(|i| unit(&mut game, classes::VOLATILE_CRYSTAL, PlayerId::SECOND, 2, i))
        .collect();
    let footman = unit(&mut game, FOOTMAN, PlayerId::SECOND, 2, 3);

    game.destroy(crystals[1]).unwrap();

    for crystal in &crystals {
        assert!(game.card(*crystal).unwrap().is_dead(), "{crystal} survived");
    }
    assert_eq!(game.card(footman).unwrap().power(), 2);
    assert_eq!(game.board().row(2).unwrap().units(), &[footman]);
}
