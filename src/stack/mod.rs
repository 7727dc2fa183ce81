//! Card resolution.
//!
//! This module owns the path from "a player plays a card" to "the card is
//! fully resolved":
//! - [`ResolveStack`]: the LIFO of in-flight resolutions
//! - card play, target selection and unit orders (`card_play.rs`)
//! - the opening-hand mulligan (`mulligan.rs`)
//!
//! Resolution is re-entrant rather than blocking. A card that needs a target
//! leaves its entry on the stack in the `AwaitingTargets` state and the
//! current intent returns; the player's answer re-enters through
//! [`Game::select_card_target`](crate::core::Game::select_card_target).

mod card_play;
mod mulligan;
pub mod resolve;

pub use resolve::{ResolveStack, ResolveStackEntry, ResolveState};
