//! Match flow: turns, rounds, morale and the end of the match, plus a simple
//! bot that plays through the same intents as a human.

mod bot;
mod outcome;
mod turns;

pub use bot::BotPlayer;
pub use outcome::{FinishReason, GameOutcome};
