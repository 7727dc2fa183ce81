//! Client-facing messages.
//!
//! The match talks to clients only through these types:
//! - [`OutgoingMessage`] deltas queued in the [`Outbox`]
//! - redacted card and buff models ([`CardView`], [`BuffView`]) and the
//!   [`GameSnapshot`] resync
//! - [`IncomingIntent`] requests, answered with an [`IntentOutcome`]
//!
//! Transport and sessions belong to the host.

mod incoming;
mod messages;
mod outgoing;

pub use incoming::{IncomingIntent, IntentOutcome, RejectReason};
pub use messages::{
    BuffMessage, BuffView, CardMessage, CardView, GameSnapshot, HiddenBuffMessage, HiddenCardMessage, PlayerMessage,
    RowMessage, StatsMessage, TargetRequest, UnitMessage,
};
pub use outgoing::{Delivery, OutgoingMessage, Outbox};
