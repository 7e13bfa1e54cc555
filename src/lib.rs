//! Robot Service - robots, inventories, combat and loot for a space-strategy game

pub mod combat;
pub mod command;
pub mod core;
pub mod events;
pub mod planet;
pub mod robot;
pub mod store;
