//! Identifiers for runtime game objects.
//!
//! Every card instance in a match has a unique `CardId`, every buff attached to
//! a card has a unique `BuffId`. Both are allocated by the owning [`Game`] and
//! never reused within a match, so a stale id simply fails to resolve instead
//! of aliasing a newer object.
//!
//! ```
//! use ccg_rules::core::{BuffId, CardId};
//!
//! let card = CardId::new(7);
//! assert_eq!(card.raw(), 7);
//! assert_eq!(card.to_string(), "Card(7)");
//! assert_eq!(BuffId::new(3).to_string(), "Buff(3)");
//! ```
//!
//! [`Game`]: crate::core::Game

use serde::{Deserialize, Serialize};

/// Unique identifier of a card instance within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Unique identifier of a buff instance within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuffId(pub u32);

impl BuffId {
    /// Create a buff ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BuffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Buff({})", self.0)
    }
}

/// Monotonic allocator for match-scoped ids.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdAllocator {
    next_card: u32,
    next_buff: u32,
}

impl IdAllocator {
    pub(crate) fn card(&mut self) -> CardId {
        let id = CardId(self.next_card);
        self.next_card += 1;
        id
    }

    pub(crate) fn buff(&mut self) -> BuffId {
        let id = BuffId(self.next_buff);
        self.next_buff += 1;
        id
    }
}
