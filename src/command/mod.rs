//! Command execution pipeline
//!
//! CommandEnvelope -> CommandExecutor -> domain (robot, combat) -> store -> GameEvent

pub mod executor;
pub mod request;

pub use executor::CommandExecutor;
pub use request::{Command, CommandEnvelope};
