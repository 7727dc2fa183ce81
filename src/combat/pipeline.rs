//! Damage, healing and destruction.

use tracing::{debug, info, trace};

use crate::core::{CardId, Game, Result};
use crate::events::{
    CardDestroyedArgs, CardDestroyedHook, CardDestroyedHookArgs, CardTakesDamageArgs, CardTakesDamageHook,
    CardTakesDamageHookArgs, UnitDestroyedArgs,
};
use crate::net::OutgoingMessage;
use crate::zones::{CardLocation, ZonePosition};

use super::damage::{split_damage, DamageInstance, HealingInstance};

impl Game {
    /// Hit `card` with `damage`.
    ///
    /// Damage hooks run first and may redirect or change the hit. A hit
    /// worth nothing afterwards has no effect at all. Otherwise armor absorbs
    /// before power and `CardTakesDamage` is posted with both parts.
    pub fn deal_damage(&mut self, card: CardId, damage: DamageInstance) -> Result<()> {
        self.card_checked(card)?;
        let hooked = self.apply_hooks(
            CardTakesDamageHook {
                target: card,
                damage: damage.clone(),
            },
            CardTakesDamageHookArgs { target: card, damage },
        );
        let CardTakesDamageHook { target, damage } = hooked;
        if damage.value <= 0 {
            trace!(%target, "damage fully prevented");
            return Ok(());
        }

        let stats = self.card_checked(target)?.stats();
        self.broadcast_card_update(
            target,
            OutgoingMessage::CardHit {
                card: target,
                source: damage.source,
                value: damage.value,
            },
        )?;

        let (armor_part, power_part) = split_damage(damage.value, stats.armor, stats.power);
        self.set_armor(target, stats.armor - armor_part)?;
        self.set_power(target, stats.power - power_part)?;
        debug!(%target, value = damage.value, armor_part, power_part, "damage dealt");

        self.post_event(CardTakesDamageArgs {
            card: target,
            armor_damage: (armor_part > 0).then(|| damage.with_value(armor_part)),
            power_damage: (power_part > 0).then(|| damage.with_value(power_part)),
            damage,
        });
        Ok(())
    }

    /// Shorthand for card scripts: `value` damage from `source`.
    pub fn deal_damage_from(&mut self, card: CardId, value: i32, source: CardId) -> Result<()> {
        self.deal_damage(card, DamageInstance::from_card(value, source))
    }

    /// Restore power up to maximum power. Healing has no hook stage.
    pub fn heal(&mut self, card: CardId, healing: HealingInstance) -> Result<()> {
        let target = self.card_checked(card)?;
        if healing.value <= 0 {
            return Ok(());
        }
        let power = target.power();
        let healed = (power + healing.value).min(target.max_power()).max(power);
        if healed == power {
            return Ok(());
        }
        self.set_power(card, healed)?;
        debug!(%card, amount = healed - power, "card healed");
        self.broadcast_card_update(
            card,
            OutgoingMessage::CardHealed {
                card,
                value: healed - power,
            },
        )
    }

    /// Destroy a card. Calling it on a dead card does nothing.
    ///
    /// If a destruction hook prevents it, the card stays alive with its
    /// power set to zero.
    pub fn destroy(&mut self, card: CardId) -> Result<()> {
        let target = self.card_checked(card)?;
        if target.is_dead() {
            return Ok(());
        }
        let owner = target.owner();

        let verdict = self.apply_hooks(CardDestroyedHook::default(), CardDestroyedHookArgs { target: card });
        if verdict.destruction_prevented {
            debug!(%card, "destruction prevented");
            return self.set_power(card, 0);
        }

        self.card_mut(card)?.is_dead = true;
        info!(%card, ?owner, "card destroyed");
        self.post_event(CardDestroyedArgs {
            card,
            former_owner: owner,
        });
        self.broadcast(OutgoingMessage::CardDestroyed { card });

        if self.board.find_unit(card).is_some() {
            self.remove_unit(card)?;
            self.post_event(UnitDestroyedArgs { card, owner });
        }
        match owner {
            Some(owner) => {
                self.move_card(card, CardLocation::Graveyard(owner), ZonePosition::Top)?;
            }
            None => {
                self.zones.remove(card);
            }
        }
        Ok(())
    }
}
