//! Buffs: timed, stacking modifiers attached to cards.
//!
//! A buff class is a [`BuffDefinition`] registered in the
//! [`CardLibrary`](crate::cards::CardLibrary). Instances live in the carrying
//! card's [`BuffContainer`] and are created, combined and removed through
//! the match (`Game::add_buff`, `Game::remove_buff`, `Game::cleanse`).

pub mod container;
pub mod definition;
mod ops;
pub mod setup;

pub use container::{Buff, BuffContainer, BuffSource};
pub use definition::{BuffAlignment, BuffDefinition, BuffScript, BuffStackType, CardStat, StatModifier, TargetOverride};
pub use setup::BuffSetup;
