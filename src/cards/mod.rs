//! Card system: static definitions, runtime instances and the library.
//!
//! ## Key Types
//!
//! - `CardDefinition`: static card data shared by every instance of a class
//! - `Card`: runtime instance (stored stats, buffs, target definitions)
//! - `CardLibrary`: injected registry of card and buff classes
//! - `CardSetup`: what an ability script uses to register behavior
//!
//! Card classes are data plus a script, not types: a script is a closure
//! that subscribes to events and declares targets when an instance is made.

pub mod card;
pub mod definition;
pub mod library;
mod ops;
pub mod setup;

pub use card::{Card, CardStats};
pub use definition::{
    BaseStats, BotEvaluation, CardColor, CardDefinition, CardFaction, CardFeature, CardTribe, CardType,
};
pub use library::{CardLibrary, CardPrototype, CardScript};
pub use setup::CardSetup;
