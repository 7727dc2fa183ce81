//! Basic buffs.

use crate::buffs::{BuffAlignment, BuffDefinition, BuffStackType, CardStat};
use crate::cards::{CardFeature, CardLibrary};
use crate::events::{CardDestroyedHook, CardTakesDamageHook};
use crate::zones::LocationSet;

use super::classes;

pub(super) fn register(library: &mut CardLibrary) {
    library
        .register_buff(strength())
        .register_buff(protector())
        .register_buff(spell_discount())
        .register_buff(undying())
        .register_buff(veil());
}

/// +1 max power per intensity.
fn strength() -> BuffDefinition {
    BuffDefinition::new(classes::STRENGTH, BuffStackType::AddIntensity, BuffAlignment::Positive)
        .with_modifier(CardStat::MaxPower, 1)
}

/// Damage aimed at an adjacent ally hits the carrier instead.
fn protector() -> BuffDefinition {
    BuffDefinition::new(classes::PROTECTOR, BuffStackType::Replace, BuffAlignment::Positive)
        .grants_feature(CardFeature::Protector)
        .with_script(|setup| {
            let protector = setup.card_id();
            setup
                .create_hook::<CardTakesDamageHook>()
                .require_location(LocationSet::BOARD)
                .require(move |game, value, _| {
                    value.target != protector
                        && game.card_owner(value.target) == game.card_owner(protector)
                        && game.board().adjacent_units(protector).contains(&value.target)
                })
                .replace(move |_, value, _| CardTakesDamageHook {
                    target: protector,
                    ..value
                });
        })
}

/// -1 spell cost per intensity.
fn spell_discount() -> BuffDefinition {
    BuffDefinition::new(classes::SPELL_DISCOUNT, BuffStackType::AddIntensity, BuffAlignment::Positive)
        .with_modifier(CardStat::SpellCost, -1)
}

/// The carrier cannot be destroyed until its owner's turn ends.
fn undying() -> BuffDefinition {
    BuffDefinition::new(classes::UNDYING, BuffStackType::Replace, BuffAlignment::Positive)
        .with_duration(1)
        .with_script(|setup| {
            let card = setup.card_id();
            setup
                .create_hook::<CardDestroyedHook>()
                .require(move |_, _, args| args.target == card)
                .replace(|_, _, _| CardDestroyedHook {
                    destruction_prevented: true,
                });
        })
}

fn veil() -> BuffDefinition {
    BuffDefinition::new(classes::VEIL, BuffStackType::AddDuration, BuffAlignment::Positive)
        .grants_feature(CardFeature::Untargetable)
        .with_duration(1)
}
