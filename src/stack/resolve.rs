//! The resolution stack.
//!
//! Each entry is one played card between "announced" and "resolved". Entries
//! unwind strictly last-in first-out: a card played while another resolves
//! must finish before the one beneath it continues.
//!
//! ```
//! use ccg_rules::core::{CardId, PlayerId};
//! use ccg_rules::stack::{ResolveStack, ResolveState};
//!
//! let mut stack = ResolveStack::new();
//! stack.push(CardId(1), PlayerId::FIRST);
//! stack.push(CardId(2), PlayerId::FIRST);
//!
//! assert_eq!(stack.current().unwrap().card, CardId(2));
//! assert_eq!(stack.current().unwrap().state(), ResolveState::Announced);
//! assert_eq!(stack.pop().unwrap().card, CardId(2));
//! assert_eq!(stack.depth(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};
use crate::targeting::CardTarget;

/// Where a resolution is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolveState {
    /// Needs a targeting check once control returns to it.
    Announced,
    /// Waiting for the owner to pick a target.
    AwaitingTargets,
    /// No targets remain; pops once control returns to it.
    Finishing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveStackEntry {
    pub card: CardId,
    pub owner: PlayerId,
    /// Targets confirmed so far, in selection order.
    pub targets: Vec<CardTarget>,
    pub(crate) state: ResolveState,
}

impl ResolveStackEntry {
    #[must_use]
    pub fn state(&self) -> ResolveState {
        self.state
    }

    #[must_use]
    pub fn is_awaiting_targets(&self) -> bool {
        self.state == ResolveState::AwaitingTargets
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveStack {
    entries: Vec<ResolveStackEntry>,
}

impl ResolveStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: CardId, owner: PlayerId) {
        self.entries.push(ResolveStackEntry {
            card,
            owner,
            targets: Vec::new(),
            state: ResolveState::Announced,
        });
    }

    pub fn pop(&mut self) -> Option<ResolveStackEntry> {
        self.entries.pop()
    }

    /// The entry being resolved right now.
    #[must_use]
    pub fn current(&self) -> Option<&ResolveStackEntry> {
        self.entries.last()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut ResolveStackEntry> {
        self.entries.last_mut()
    }

    /// Whether the current entry is for `card`.
    #[must_use]
    pub fn is_current(&self, card: CardId) -> bool {
        self.current().is_some_and(|entry| entry.card == card)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.entries.iter().any(|entry| entry.card == card)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &ResolveStackEntry> {
        self.entries.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
