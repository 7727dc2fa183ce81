//! Targeting: descriptors, declarative definitions and the valid-target
//! engine.

pub mod definition;
mod engine;
pub mod target;

pub use definition::{TargetBuilder, TargetDefinition, TargetEvaluator, TargetRequirement};
pub use target::{CardTarget, TargetArgs, TargetMode, TargetSubject, TargetType};
