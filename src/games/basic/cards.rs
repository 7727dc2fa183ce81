//! Basic cards.

use crate::buffs::BuffSource;
use crate::cards::{CardColor, CardDefinition, CardFaction, CardLibrary, CardSetup, CardTribe, CardType};
use crate::combat::{DamageInstance, HealingInstance};
use crate::core::{CardId, Game, Result};
use crate::events::{
    CardDestroyedArgs, CardTargetSelectedCardArgs, CardTargetSelectedLibraryCardArgs, CardTargetSelectedRowArgs,
    CardTargetSelectedUnitArgs, SpellDeployedArgs, UnitDeployedArgs,
};
use crate::targeting::{TargetSubject, TargetType};
use crate::zones::CardLocation;

use super::classes;

pub(super) fn register(library: &mut CardLibrary) {
    library
        .register(
            CardDefinition::unit(classes::TESTING_UNIT, "Testing Unit")
                .with_power(5)
                .with_attack(1),
        )
        .register_scripted(
            CardDefinition::unit(classes::LOST_SHIELDBEARER, "Lost Shieldbearer")
                .with_faction(CardFaction::Human)
                .with_power(7)
                .with_armor(3),
            |setup| setup.add_buff(classes::PROTECTOR),
        )
        .register_scripted(
            CardDefinition::unit(classes::TRAVELING_ENCHANTRESS, "Traveling Enchantress")
                .with_color(CardColor::Silver)
                .with_power(4),
            traveling_enchantress,
        )
        .register_scripted(
            CardDefinition::unit(classes::ELDER_HOUNDMASTER, "Elder Houndmaster")
                .with_faction(CardFaction::Human)
                .with_tribe(CardTribe::Peasant)
                .with_power(3),
            elder_houndmaster,
        )
        .register(
            CardDefinition::unit(classes::TRAINED_HOUND, "Trained Hound")
                .with_tribe(CardTribe::Beast)
                .with_power(2)
                .with_attack(1)
                .token(),
        )
        .register_scripted(
            CardDefinition::unit(classes::FAMINE_RIDER, "Famine Rider")
                .with_power(10)
                .with_attack(4),
            famine_rider,
        )
        .register_scripted(
            CardDefinition::unit(classes::CONQUEST_RIDER, "Conquest Rider")
                .with_power(15)
                .with_attack(4),
            conquest_rider,
        )
        .register_scripted(
            CardDefinition::unit(classes::STUBBORN_KNIGHT, "Stubborn Knight")
                .with_faction(CardFaction::Human)
                .with_power(4)
                .with_attack(2),
            stubborn_knight,
        )
        .register_scripted(
            CardDefinition::unit(classes::ARCANE_SCHOLAR, "Arcane Scholar")
                .with_faction(CardFaction::Arcane)
                .with_power(3),
            arcane_scholar,
        )
        .register_scripted(
            CardDefinition::unit(classes::VOLATILE_CRYSTAL, "Volatile Crystal")
                .with_faction(CardFaction::Arcane)
                .with_tribe(CardTribe::Crystal)
                .with_power(1)
                .token(),
            volatile_crystal,
        )
        .register_scripted(
            CardDefinition::spell(classes::QUICK_STRIKE, "Quick Strike")
                .with_color(CardColor::Golden)
                .with_faction(CardFaction::Human)
                .with_spell_cost(1),
            quick_strike,
        )
        .register_scripted(
            CardDefinition::spell(classes::ARCANE_VOLLEY, "Arcane Volley")
                .with_faction(CardFaction::Arcane)
                .with_spell_cost(3),
            arcane_volley,
        )
        .register_scripted(
            CardDefinition::spell(classes::CRYSTAL_BARRAGE, "Crystal Barrage")
                .with_color(CardColor::Golden)
                .with_faction(CardFaction::Arcane)
                .with_spell_cost(4),
            crystal_barrage,
        )
        .register_scripted(
            CardDefinition::spell(classes::MENDING_TOUCH, "Mending Touch").with_spell_cost(2),
            mending_touch,
        )
        .register_scripted(
            CardDefinition::spell(classes::VEIL_OF_MIST, "Veil of Mist").with_spell_cost(1),
            veil_of_mist,
        )
        .register_scripted(
            CardDefinition::spell(classes::CONJURE_ALLY, "Conjure Ally")
                .with_faction(CardFaction::Arcane)
                .with_spell_cost(2),
            conjure_ally,
        )
        .register_scripted(
            CardDefinition::spell(classes::WILD_SPARK, "Wild Spark")
                .with_faction(CardFaction::Arcane)
                .with_spell_cost(1),
            wild_spark,
        );
}

/// Units still standing on the board.
fn on_board(game: &Game, card: CardId) -> bool {
    game.card(card).is_some_and(|c| !c.is_dead()) && game.board().find_unit(card).is_some()
}

// =============================================================================
// Units
// =============================================================================

/// Deploy: give an ally 1 strength, then 7 more if that doubled its power.
fn traveling_enchantress(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::Unit)
        .require_allied()
        .require_not_self()
        .label("Enchant");

    setup
        .create_effect::<CardTargetSelectedUnitArgs>()
        .perform(|game, args| {
            let source = Some(BuffSource::Card(args.source));
            game.add_buff_with(args.target, classes::STRENGTH, source, 1, None)?;
            let target = game.card_checked(args.target)?;
            if target.power() >= target.definition().stats.power * 2 {
                game.add_buff_with(args.target, classes::STRENGTH, source, 7, None)?;
            }
            Ok(())
        });
}

/// Deploy: a hound on each side.
fn elder_houndmaster(setup: &mut CardSetup<'_>) {
    setup.create_effect::<UnitDeployedArgs>().perform(|game, args| {
        game.spawn_unit(classes::TRAINED_HOUND, args.owner, args.row, args.index)?;
        game.spawn_unit(classes::TRAINED_HOUND, args.owner, args.row, args.index + 2)?;
        Ok(())
    });
}

/// Deploy: 2 damage to every enemy unit.
fn famine_rider(setup: &mut CardSetup<'_>) {
    setup.create_effect::<UnitDeployedArgs>().perform(|game, args| {
        for unit in game.units_owned_by(args.owner.opponent()) {
            if on_board(game, unit) {
                game.deal_damage(unit, DamageInstance::from_card(2, args.card))?;
            }
        }
        Ok(())
    });
}

/// Deploy: play a Famine Rider from the deck next to this unit, then charge
/// an enemy row. An emptied row changes sides.
fn conquest_rider(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::BoardRow)
        .require_enemy()
        .evaluate(|game, args| {
            args.row()
                .and_then(|row| game.board().row(row))
                .map_or(0, |row| row.len() as i32)
        })
        .label("Charge");

    setup.create_effect::<UnitDeployedArgs>().perform(|game, args| {
        let rider = game
            .zones()
            .cards_in(CardLocation::Deck(args.owner))
            .iter()
            .rev()
            .copied()
            .find(|&card| game.card(card).is_some_and(|c| c.class() == classes::FAMINE_RIDER));
        match rider {
            Some(rider) => game.force_play_card(rider, args.row, args.index + 1),
            None => Ok(()),
        }
    });

    setup
        .create_effect::<CardTargetSelectedRowArgs>()
        .perform(|game, args| charge_row(game, args.source, args.row));
}

fn charge_row(game: &mut Game, rider: CardId, row: usize) -> Result<()> {
    let attack = game.card_checked(rider)?.attack();
    let units = game.board().row_checked(row)?.units().to_vec();
    for unit in units {
        if on_board(game, unit) {
            game.deal_damage(unit, DamageInstance::from_card(attack, rider))?;
        }
    }
    let owner = game.card_owner(rider);
    let target_row = game.board().row_checked(row)?;
    if target_row.is_empty() && owner.is_some() && target_row.owner() == owner.map(|o| o.opponent()) {
        game.set_row_owner(row, owner)?;
    }
    Ok(())
}

/// Deploy: cannot be destroyed until the end of its owner's turn.
fn stubborn_knight(setup: &mut CardSetup<'_>) {
    setup.create_effect::<UnitDeployedArgs>().perform(|game, args| {
        game.add_buff(args.card, classes::UNDYING, Some(BuffSource::Card(args.card)))?;
        Ok(())
    });
}

/// Deploy: an allied spell in hand costs 1 less.
fn arcane_scholar(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::CardInSpellHand)
        .require_allied()
        .label("Discount");

    setup
        .create_effect::<CardTargetSelectedCardArgs>()
        .perform(|game, args| {
            game.add_buff(args.target, classes::SPELL_DISCOUNT, Some(BuffSource::Card(args.source)))?;
            Ok(())
        });
}

/// On destruction: 1 damage to each neighbour.
fn volatile_crystal(setup: &mut CardSetup<'_>) {
    setup.create_effect::<CardDestroyedArgs>().perform(|game, args| {
        for neighbour in game.board().adjacent_units(args.card) {
            if on_board(game, neighbour) {
                game.deal_damage(neighbour, DamageInstance::from_card(1, args.card))?;
            }
        }
        Ok(())
    });
}

// =============================================================================
// Spells
// =============================================================================

fn quick_strike(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::Unit)
        .require_enemy()
        .evaluate(|game, args| args.card().and_then(|c| game.card(c)).map_or(0, |c| c.power().min(2)))
        .label("Strike");

    setup
        .create_effect::<CardTargetSelectedUnitArgs>()
        .perform(|game, args| game.deal_damage_from(args.target, 2, args.source));
}

/// Up to three enemy units take 1 damage each.
fn arcane_volley(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::Unit)
        .require_enemy()
        .total_targets(3)
        .evaluate(|game, args| args.card().and_then(|c| game.card(c)).map_or(0, |c| c.power().min(1)))
        .label("Bolt");

    setup
        .create_effect::<CardTargetSelectedUnitArgs>()
        .perform(|game, args| game.deal_damage_from(args.target, 1, args.source));
}

/// Fill an enemy row with volatile crystals, every other slot.
fn crystal_barrage(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::BoardRow)
        .require_enemy()
        .require_free_slot()
        .label("Barrage");

    setup
        .create_effect::<CardTargetSelectedRowArgs>()
        .perform(|game, args| {
            let opponent = args.owner.opponent();
            let mut index = 0;
            while let Some(row) = game.board().row(args.row) {
                if row.is_full() || index > row.len() {
                    break;
                }
                game.spawn_unit(classes::VOLATILE_CRYSTAL, opponent, args.row, index)?;
                index += 2;
            }
            Ok(())
        });
}

/// Two allied units recover 3 power.
fn mending_touch(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::Unit)
        .require_allied()
        .total_targets(2)
        .label("Mend");

    setup
        .create_effect::<CardTargetSelectedUnitArgs>()
        .perform(|game, args| game.heal(args.target, HealingInstance::from_card(3, args.source)));
}

/// An allied unit cannot be targeted until its owner's turn ends.
fn veil_of_mist(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::Unit)
        .require_allied()
        .label("Veil");

    setup
        .create_effect::<CardTargetSelectedUnitArgs>()
        .perform(|game, args| {
            game.add_buff(args.target, classes::VEIL, Some(BuffSource::Card(args.source)))?;
            Ok(())
        });
}

/// Add a copy of any collectible bronze unit with 3 power or less to hand.
fn conjure_ally(setup: &mut CardSetup<'_>) {
    setup
        .create_deploy_targets(TargetType::CardInLibrary)
        .require(|game, args| match args.subject {
            TargetSubject::LibraryCard { class } => game
                .library()
                .definition(class)
                .is_some_and(|d| d.card_type == CardType::Unit && d.color == CardColor::Bronze && d.stats.power <= 3),
            _ => false,
        })
        .label("Conjure");

    setup
        .create_effect::<CardTargetSelectedLibraryCardArgs>()
        .perform(|game, args| {
            game.spawn_card(&args.class, args.owner, CardLocation::Hand(args.owner))?;
            Ok(())
        });
}

/// 2 damage to a random enemy unit.
fn wild_spark(setup: &mut CardSetup<'_>) {
    setup.create_effect::<SpellDeployedArgs>().perform(|game, args| {
        let enemies: Vec<CardId> = game
            .units_owned_by(args.owner.opponent())
            .into_iter()
            .filter(|&unit| on_board(game, unit))
            .collect();
        match game.rng_mut().gen_index(enemies.len()) {
            Some(index) => game.deal_damage_from(enemies[index], 2, args.card),
            None => Ok(()),
        }
    });
}
