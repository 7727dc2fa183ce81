//! Card library: the registry of card classes and buff classes.
//!
//! A library is built once at startup and shared by every match through an
//! `Arc<CardLibrary>`. Each card class pairs a static [`CardDefinition`] with
//! an optional ability script that registers the card's subscriptions and
//! target definitions when an instance is created.
//!
//! ```
//! use ccg_rules::cards::{CardDefinition, CardLibrary};
//!
//! let mut library = CardLibrary::new();
//! library.register(CardDefinition::unit("peasant", "Peasant").with_power(2));
//! library.register_scripted(CardDefinition::unit("token", "Token").token(), |_setup| {});
//!
//! assert_eq!(library.len(), 2);
//! assert_eq!(library.definition("peasant").unwrap().stats.power, 2);
//! assert_eq!(library.collectible().count(), 1);
//! ```

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::warn;

use crate::buffs::BuffDefinition;

use super::definition::CardDefinition;
use super::setup::CardSetup;

pub type CardScript = Arc<dyn Fn(&mut CardSetup<'_>) + Send + Sync>;

/// A registered card class.
#[derive(Clone)]
pub struct CardPrototype {
    pub(crate) definition: Arc<CardDefinition>,
    pub(crate) script: Option<CardScript>,
}

impl CardPrototype {
    #[must_use]
    pub fn definition(&self) -> &CardDefinition {
        &self.definition
    }

    #[must_use]
    pub fn is_scripted(&self) -> bool {
        self.script.is_some()
    }
}

impl std::fmt::Debug for CardPrototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardPrototype")
            .field("class", &self.definition.class)
            .field("scripted", &self.script.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CardLibrary {
    prototypes: Vec<CardPrototype>,
    by_class: FxHashMap<String, usize>,
    buffs: FxHashMap<String, Arc<BuffDefinition>>,
}

impl CardLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card class with no ability script.
    pub fn register(&mut self, definition: CardDefinition) -> &mut Self {
        self.insert(CardPrototype {
            definition: Arc::new(definition),
            script: None,
        });
        self
    }

    /// Register a card class whose instances run `script` on creation.
    pub fn register_scripted(
        &mut self,
        definition: CardDefinition,
        script: impl Fn(&mut CardSetup<'_>) + Send + Sync + 'static,
    ) -> &mut Self {
        self.insert(CardPrototype {
            definition: Arc::new(definition),
            script: Some(Arc::new(script)),
        });
        self
    }

    /// Register a buff class.
    pub fn register_buff(&mut self, definition: BuffDefinition) -> &mut Self {
        if self.buffs.contains_key(&definition.class) {
            warn!(class = %definition.class, "buff class registered twice, replacing");
        }
        self.buffs.insert(definition.class.clone(), Arc::new(definition));
        self
    }

    fn insert(&mut self, prototype: CardPrototype) {
        let class = prototype.definition.class.clone();
        if let Some(&index) = self.by_class.get(&class) {
            warn!(%class, "card class registered twice, replacing");
            self.prototypes[index] = prototype;
        } else {
            self.by_class.insert(class, self.prototypes.len());
            self.prototypes.push(prototype);
        }
    }

    #[must_use]
    pub fn get(&self, class: &str) -> Option<&CardPrototype> {
        self.by_class.get(class).map(|&index| &self.prototypes[index])
    }

    #[must_use]
    pub fn definition(&self, class: &str) -> Option<&CardDefinition> {
        self.get(class).map(CardPrototype::definition)
    }

    #[must_use]
    pub fn buff(&self, class: &str) -> Option<&Arc<BuffDefinition>> {
        self.buffs.get(class)
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.by_class.contains_key(class)
    }

    /// Number of card classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Card definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.prototypes.iter().map(CardPrototype::definition)
    }

    /// Definitions that library-exploration effects may offer.
    pub fn collectible(&self) -> impl Iterator<Item = &CardDefinition> {
        self.iter().filter(|d| d.collectible)
    }
}
