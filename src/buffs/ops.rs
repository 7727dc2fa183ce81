//! Buff application, removal and duration ticking.

use std::sync::Arc;

use tracing::debug;

use crate::cards::Card;
use crate::core::{BuffId, CardId, Game, GameError, PlayerId, Result};
use crate::events::{BuffCreatedArgs, BuffRemovedArgs, Subscriber};
use crate::net::{BuffView, OutgoingMessage};

use super::container::{Buff, BuffSource};
use super::definition::{BuffAlignment, BuffDefinition, BuffStackType};
use super::setup::BuffSetup;

impl Game {
    /// Apply one intensity of `class` with its default duration.
    pub fn add_buff(&mut self, card: CardId, class: &str, source: Option<BuffSource>) -> Result<BuffId> {
        let definition = self.buff_definition(class)?;
        let duration = definition.default_duration;
        self.add_buff_with(card, class, source, 1, duration)
    }

    /// Apply a buff, combining with an existing one of the same class
    /// according to its stack type.
    ///
    /// Returns the id of the buff that now carries the effect.
    pub fn add_buff_with(
        &mut self,
        card: CardId,
        class: &str,
        source: Option<BuffSource>,
        intensity: u32,
        duration: Option<u32>,
    ) -> Result<BuffId> {
        let definition = self.buff_definition(class)?;
        let before = self.max_stats(card)?;
        let existing = self.card_checked(card)?.buffs.find(class).map(Buff::id);

        let id = match (definition.stack_type, existing) {
            (BuffStackType::Replace, Some(old)) => {
                self.remove_buff(card, old)?;
                self.create_buff(card, definition, source, intensity, duration)?
            }
            (BuffStackType::AddIntensity, Some(old)) => {
                let buff = self.buff_mut(card, old)?;
                buff.intensity += intensity;
                self.send_buff_update(card, old)?;
                old
            }
            (BuffStackType::AddDuration, Some(old)) => {
                let buff = self.buff_mut(card, old)?;
                buff.duration = match (buff.duration, duration) {
                    (Some(a), Some(b)) => Some(a + b),
                    _ => None,
                };
                self.send_buff_update(card, old)?;
                old
            }
            _ => self.create_buff(card, definition, source, intensity, duration)?,
        };

        self.sync_max_stats(card, before)?;
        Ok(id)
    }

    /// Remove one buff, its subscriptions and its stat contributions.
    pub fn remove_buff(&mut self, card: CardId, buff: BuffId) -> Result<()> {
        let before = self.max_stats(card)?;
        let removed = self
            .card_mut(card)?
            .buffs
            .remove(buff)
            .ok_or(GameError::BuffNotFound(buff))?;
        self.buff_owners.remove(&buff);
        self.events.remove_for_subscriber(Subscriber::Buff(buff));
        debug!(%card, %buff, class = removed.class(), "buff removed");

        self.sync_max_stats(card, before)?;
        self.post_event(BuffRemovedArgs {
            buff,
            card,
            class: removed.class().to_string(),
        });
        self.broadcast_card_update(card, OutgoingMessage::BuffRemoved { card, buff })
    }

    /// Remove every buff matching `alignment` (all buffs for `None`).
    /// Returns how many were removed.
    pub fn cleanse(&mut self, card: CardId, alignment: Option<BuffAlignment>) -> Result<usize> {
        let matching: Vec<BuffId> = self
            .card_checked(card)?
            .buffs
            .iter()
            .filter(|b| alignment.map_or(true, |a| b.alignment() == a))
            .map(Buff::id)
            .collect();
        for &buff in &matching {
            self.remove_buff(card, buff)?;
        }
        Ok(matching.len())
    }

    /// Count down timed buffs on every card `player` owns; buffs reaching
    /// zero are removed.
    pub fn tick_buff_durations(&mut self, player: PlayerId) -> Result<()> {
        let mut cards: Vec<CardId> = self
            .cards
            .values()
            .filter(|c| c.owner == Some(player) && !c.buffs.is_empty())
            .map(Card::id)
            .collect();
        cards.sort_unstable();

        for card in cards {
            let mut expired = Vec::new();
            let mut ticked = Vec::new();
            for buff in self.card_mut(card)?.buffs.iter_mut() {
                if let Some(duration) = buff.duration.as_mut() {
                    *duration = duration.saturating_sub(1);
                    if *duration == 0 {
                        expired.push(buff.id);
                    } else {
                        ticked.push(buff.id);
                    }
                }
            }
            for buff in ticked {
                self.send_buff_update(card, buff)?;
            }
            for buff in expired {
                self.remove_buff(card, buff)?;
            }
        }
        Ok(())
    }

    fn buff_definition(&self, class: &str) -> Result<Arc<BuffDefinition>> {
        self.library
            .buff(class)
            .cloned()
            .ok_or_else(|| GameError::UnknownBuffClass(class.to_string()))
    }

    fn buff_mut(&mut self, card: CardId, buff: BuffId) -> Result<&mut Buff> {
        self.card_mut(card)?
            .buffs
            .get_mut(buff)
            .ok_or(GameError::BuffNotFound(buff))
    }

    fn create_buff(
        &mut self,
        card: CardId,
        definition: Arc<BuffDefinition>,
        source: Option<BuffSource>,
        intensity: u32,
        duration: Option<u32>,
    ) -> Result<BuffId> {
        let id = self.ids.buff();
        let class = definition.class.clone();
        let script = definition.script.clone();
        self.card_mut(card)?.buffs.push(Buff {
            id,
            card,
            definition,
            source,
            intensity,
            duration,
        });
        self.buff_owners.insert(id, card);

        if let Some(script) = script {
            script(&mut BuffSetup::new(id, card, &mut self.events));
        }
        debug!(%card, buff = %id, %class, intensity, ?duration, "buff created");

        self.post_event(BuffCreatedArgs { buff: id, card, class });
        let message = self.buff_message(card, id)?;
        self.broadcast_card_update(card, OutgoingMessage::BuffAdded(BuffView::Visible(message)))?;
        Ok(id)
    }

    fn send_buff_update(&mut self, card: CardId, buff: BuffId) -> Result<()> {
        let message = self.buff_message(card, buff)?;
        self.broadcast_card_update(card, OutgoingMessage::BuffUpdated(BuffView::Visible(message)))
    }

    fn max_stats(&self, card: CardId) -> Result<(i32, i32)> {
        let card = self.card_checked(card)?;
        Ok((card.max_power(), card.max_armor()))
    }

    /// Carry a change of maximum power or armor over to the current value:
    /// raising the maximum raises the current value by the same amount,
    /// lowering it clamps.
    fn sync_max_stats(&mut self, card: CardId, before: (i32, i32)) -> Result<()> {
        let after = self.max_stats(card)?;
        if after == before {
            return Ok(());
        }
        let target = self.card_mut(card)?;
        target.stats.power = adjust(target.stats.power, before.0, after.0);
        target.stats.armor = adjust(target.stats.armor, before.1, after.1);
        self.send_stats(card)
    }
}

fn adjust(current: i32, old_max: i32, new_max: i32) -> i32 {
    if new_max > old_max {
        current + (new_max - old_max)
    } else {
        current.min(new_max)
    }
}
