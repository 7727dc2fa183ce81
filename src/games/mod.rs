//! Built-in card content.
//!
//! - `basic`: a small set of units, spells, tokens and buffs written against
//!   the public scripting surface. Tests use it as a fixture library.

pub mod basic;
