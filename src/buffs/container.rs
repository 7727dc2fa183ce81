//! Buff instances and the per-card buff container.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::cards::{CardFeature, CardTribe};
use crate::core::{BuffId, CardId, PlayerId};

use super::definition::{BuffAlignment, BuffDefinition, BuffStackType, CardStat};

/// Who applied a buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuffSource {
    Card(CardId),
    Player(PlayerId),
}

/// One buff attached to one card.
#[derive(Clone, Debug)]
pub struct Buff {
    pub(crate) id: BuffId,
    pub(crate) card: CardId,
    pub(crate) definition: Arc<BuffDefinition>,
    pub(crate) source: Option<BuffSource>,
    pub(crate) intensity: u32,
    pub(crate) duration: Option<u32>,
}

impl Buff {
    #[must_use]
    pub fn id(&self) -> BuffId {
        self.id
    }

    /// The card carrying this buff.
    #[must_use]
    pub fn card(&self) -> CardId {
        self.card
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.definition.class
    }

    #[must_use]
    pub fn definition(&self) -> &BuffDefinition {
        &self.definition
    }

    #[must_use]
    pub fn source(&self) -> Option<BuffSource> {
        self.source
    }

    #[must_use]
    pub fn stack_type(&self) -> BuffStackType {
        self.definition.stack_type
    }

    #[must_use]
    pub fn alignment(&self) -> BuffAlignment {
        self.definition.alignment
    }

    #[must_use]
    pub fn intensity(&self) -> u32 {
        self.intensity
    }

    /// Remaining turns, `None` when infinite.
    #[must_use]
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    #[must_use]
    pub fn contribution(&self, stat: CardStat) -> i32 {
        self.definition.contribution(stat, self.intensity)
    }
}

/// Ordered collection of the buffs on one card.
///
/// Order is application order; target-definition merges and overrides are
/// applied in this order.
#[derive(Clone, Debug, Default)]
pub struct BuffContainer {
    buffs: Vec<Buff>,
}

impl BuffContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: BuffId) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.id == id)
    }

    /// First buff of the given class.
    #[must_use]
    pub fn find(&self, class: &str) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.class() == class)
    }

    #[must_use]
    pub fn has(&self, class: &str) -> bool {
        self.find(class).is_some()
    }

    /// Combined intensity of every buff of the given class.
    #[must_use]
    pub fn intensity_of(&self, class: &str) -> u32 {
        self.buffs
            .iter()
            .filter(|b| b.class() == class)
            .map(|b| b.intensity)
            .sum()
    }

    /// Sum of every buff's contribution to `stat`.
    #[must_use]
    pub fn contribution(&self, stat: CardStat) -> i32 {
        self.buffs.iter().map(|b| b.contribution(stat)).sum()
    }

    #[must_use]
    pub fn granted_features(&self) -> SmallVec<[CardFeature; 2]> {
        let mut features = SmallVec::new();
        for feature in self.buffs.iter().flat_map(|b| b.definition.features.iter()) {
            if !features.contains(feature) {
                features.push(*feature);
            }
        }
        features
    }

    #[must_use]
    pub fn granted_tribes(&self) -> SmallVec<[CardTribe; 2]> {
        let mut tribes = SmallVec::new();
        for tribe in self.buffs.iter().flat_map(|b| b.definition.tribes.iter()) {
            if !tribes.contains(tribe) {
                tribes.push(*tribe);
            }
        }
        tribes
    }

    pub(crate) fn get_mut(&mut self, id: BuffId) -> Option<&mut Buff> {
        self.buffs.iter_mut().find(|b| b.id == id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Buff> {
        self.buffs.iter_mut()
    }

    pub(crate) fn push(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    pub(crate) fn remove(&mut self, id: BuffId) -> Option<Buff> {
        let index = self.buffs.iter().position(|b| b.id == id)?;
        Some(self.buffs.remove(index))
    }
}
