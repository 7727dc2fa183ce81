//! # ccg-rules
//!
//! The authoritative rules engine for a two-player, multi-row card battler.
//! One [`Game`] value is one match: it owns every card, the board, the
//! resolution stack and the event bus, and it is the only thing allowed to
//! change any of them.
//!
//! ## Design Principles
//!
//! 1. **Cards Are Data Plus Scripts**: A card class is a [`CardDefinition`]
//!    and an optional script. Scripts subscribe to typed events and declare
//!    targets; there is no per-card type.
//!
//! 2. **Re-entrant Resolution**: Playing a card pushes a stack entry. An
//!    entry that needs a choice waits on the stack and the intent returns;
//!    the answer resumes it.
//!
//! 3. **Server Authority**: Every intent is validated against live state.
//!    Bad requests are rejected with a reason and the sender gets a fresh
//!    snapshot.
//!
//! ## Modules
//!
//! - `core`: ids, players, configuration, RNG, errors and the match state
//! - `cards`: definitions, instances and the card library
//! - `buffs`: stacking modifiers and their scripts
//! - `events`: typed events, callbacks and hooks
//! - `targeting`: target definitions and the valid-target engine
//! - `combat`: damage, healing and destruction
//! - `zones`: card locations and the row board
//! - `stack`: card play, target selection, orders and the mulligan
//! - `rules`: turns, rounds, morale and the bot
//! - `net`: outgoing messages, snapshots and incoming intents
//! - `games`: built-in card content
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ccg_rules::games::basic::{self, classes};
//! use ccg_rules::{Game, GameConfig, GamePhase, PlayerId};
//!
//! let config = GameConfig::default().with_mulligan_count(0);
//! let mut game = Game::new(config, Arc::new(basic::library()));
//! for player in PlayerId::all() {
//!     game.load_deck(player, &[classes::TESTING_UNIT; 12]).unwrap();
//! }
//! game.start().unwrap();
//! assert_eq!(game.phase(), GamePhase::Deploy);
//! assert_eq!(game.active_player(), PlayerId::FIRST);
//! ```

pub mod buffs;
pub mod cards;
pub mod combat;
pub mod core;
pub mod events;
pub mod games;
pub mod net;
pub mod rules;
pub mod stack;
pub mod targeting;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{BuffId, CardId, Game, GameConfig, GameError, GamePhase, GameRng, PlayerId, Result};

pub use crate::cards::{Card, CardDefinition, CardLibrary, CardSetup, CardType};

pub use crate::buffs::{BuffDefinition, BuffSetup, BuffSource};

pub use crate::events::{EventBus, EventType, GameEvent, Subscriber};

pub use crate::targeting::{CardTarget, TargetMode, TargetSubject, TargetType};

pub use crate::combat::{DamageInstance, HealingInstance};

pub use crate::zones::{Board, CardLocation};

pub use crate::stack::{ResolveStack, ResolveState};

pub use crate::rules::{BotPlayer, FinishReason, GameOutcome};

pub use crate::net::{IncomingIntent, IntentOutcome, OutgoingMessage, RejectReason};
