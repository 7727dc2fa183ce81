//! Zones: where cards are.
//!
//! ## Key Types
//!
//! - `CardLocation`: hand, deck, graveyard, leader slot, board or stack
//! - `LocationSet`: bit set of location kinds for subscription filters
//! - `ZoneManager`: the single record of every card's location
//! - `Board` / `BoardRow`: the row grid units stand on

pub mod board;
pub mod location;
pub mod manager;
mod units;

pub use board::{Board, BoardRow, UnitPosition};
pub use location::{CardLocation, LocationSet};
pub use manager::{ZoneManager, ZonePosition};
