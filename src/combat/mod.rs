//! Combat - single attacks and the post-round loot redistribution

pub mod loot;
pub mod resolution;

pub use loot::{redistribute_loot, LootOutcome, LootReport, LootShare};
pub use resolution::{attack, AttackOutcome};
