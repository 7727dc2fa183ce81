//! Card lifecycle and stat operations on the match.

use tracing::{debug, trace};

use crate::buffs::BuffSource;
use crate::combat::DamageInstance;
use crate::core::{CardId, Game, GameError, PlayerId, Result};
use crate::events::{CardTakesDamageArgs, EventBus, Subscriber, UnitOrderedUnitArgs};
use crate::net::OutgoingMessage;
use crate::targeting::TargetMode;
use crate::zones::{CardLocation, ZonePosition};

use super::card::Card;
use super::setup::CardSetup;

impl Game {
    /// Create an instance of `class`, run its ability script and apply any
    /// buffs the script asked for. The card is not placed in a zone.
    pub fn instantiate_card(&mut self, class: &str, owner: Option<PlayerId>) -> Result<CardId> {
        let prototype = self
            .library
            .get(class)
            .cloned()
            .ok_or_else(|| GameError::UnknownCardClass(class.to_string()))?;

        let id = self.ids.card();
        let mut card = Card::new(id, prototype.definition, owner);
        register_builtin_subscriptions(&mut self.events, id);

        let mut pending_buffs = Vec::new();
        if let Some(script) = &prototype.script {
            let mut setup = CardSetup::new(&mut card, &mut self.events, &mut pending_buffs);
            script(&mut setup);
        }
        self.cards.insert(id, card);

        for buff in pending_buffs {
            self.add_buff(id, &buff, Some(BuffSource::Card(id)))?;
        }
        debug!(card = %id, class, ?owner, "card instantiated");
        Ok(id)
    }

    /// Instantiate a card straight into a zone. Use
    /// [`spawn_unit`](Self::spawn_unit) for the board.
    pub fn spawn_card(&mut self, class: &str, owner: PlayerId, location: CardLocation) -> Result<CardId> {
        let id = self.instantiate_card(class, Some(owner))?;
        self.move_card(id, location, ZonePosition::Top)?;
        Ok(id)
    }

    /// Instantiate a unit onto the board. Returns `None` when the row has no
    /// room; the instance is then discarded.
    pub fn spawn_unit(&mut self, class: &str, owner: PlayerId, row: usize, index: usize) -> Result<Option<CardId>> {
        let id = self.instantiate_card(class, Some(owner))?;
        match self.create_unit(id, row, index)? {
            Some(_) => Ok(Some(id)),
            None => {
                self.discard_instance(id);
                Ok(None)
            }
        }
    }

    /// Instantiate `classes` into `player`'s deck, in order.
    pub fn load_deck(&mut self, player: PlayerId, classes: &[&str]) -> Result<Vec<CardId>> {
        classes
            .iter()
            .map(|class| self.spawn_card(class, player, CardLocation::Deck(player)))
            .collect()
    }

    /// Put a leader card into `player`'s leader slot.
    pub fn set_leader(&mut self, player: PlayerId, class: &str) -> Result<CardId> {
        self.spawn_card(class, player, CardLocation::Leader(player))
    }

    pub fn set_power(&mut self, card: CardId, power: i32) -> Result<()> {
        let target = self.card_mut(card)?;
        if target.stats.power == power {
            return Ok(());
        }
        trace!(%card, from = target.stats.power, to = power, "power changed");
        target.stats.power = power;
        self.send_stats(card)
    }

    pub fn set_armor(&mut self, card: CardId, armor: i32) -> Result<()> {
        let target = self.card_mut(card)?;
        if target.stats.armor == armor {
            return Ok(());
        }
        trace!(%card, from = target.stats.armor, to = armor, "armor changed");
        target.stats.armor = armor;
        self.send_stats(card)
    }

    /// Let the opponent see a card held in a hidden zone.
    pub fn reveal_card(&mut self, card: CardId) -> Result<()> {
        let target = self.card_mut(card)?;
        if target.is_revealed {
            return Ok(());
        }
        target.is_revealed = true;
        if let Some(owner) = target.owner {
            let message = self.card_message(card)?;
            self.send(owner.opponent(), OutgoingMessage::CardRevealed(message));
        }
        Ok(())
    }

    /// Drop an instance that never made it into a zone.
    fn discard_instance(&mut self, card: CardId) {
        self.events.remove_for_subscriber(Subscriber::Card(card));
        if let Some(removed) = self.cards.remove(&card) {
            for buff in removed.buffs.iter() {
                self.events.remove_for_subscriber(Subscriber::Buff(buff.id()));
                self.buff_owners.remove(&buff.id());
            }
        }
        self.zones.remove(card);
        debug!(%card, "instance discarded");
    }
}

/// Subscriptions every card carries: destruction at zero power after damage,
/// and the default attack order.
fn register_builtin_subscriptions(events: &mut EventBus, id: CardId) {
    events
        .effect::<CardTakesDamageArgs>(Subscriber::Card(id))
        .perform(|game, args| {
            let card = game.card_checked(args.card)?;
            if card.power() <= 0 && (args.power_damage.is_some() || card.max_armor() == 0) {
                game.destroy(args.card)?;
            }
            Ok(())
        });

    events
        .effect::<UnitOrderedUnitArgs>(Subscriber::Card(id))
        .require(move |game, _| {
            game.card(id)
                .is_some_and(|card| card.target_definitions(TargetMode::UnitOrder).next().is_none())
        })
        .perform(|game, args| {
            let attack = game.card_checked(args.unit)?.attack();
            game.deal_damage(args.target, DamageInstance::from_card(attack, args.unit))
        });
}
