//! Combat: damage and healing values and the pipeline that applies them.

pub mod damage;
mod pipeline;

pub use damage::{split_damage, DamageInstance, DamageSource, HealingInstance};
