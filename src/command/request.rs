//! Typed player commands, as produced by the command parsing layer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{PlanetId, PlayerId, RobotId, TransactionId};
use crate::events::Topic;
use crate::robot::item::ItemType;

/// What a player asks one robot to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Move { target: PlanetId },
    Block,
    Regenerate,
    Attack { target: RobotId },
    Mine,
    /// `target` is a robot id or a planet id depending on the item
    UseItem { item: ItemType, target: Uuid },
}

impl Command {
    /// Topic the resulting event is published on
    pub fn topic(&self) -> Topic {
        match self {
            Command::Move { .. } => Topic::Movement,
            Command::Block => Topic::PlanetBlocked,
            Command::Regenerate => Topic::Regeneration,
            Command::Attack { .. } => Topic::Fighting,
            Command::Mine => Topic::Mining,
            Command::UseItem { item, .. } => Topic::for_item(item.family()),
        }
    }
}

/// A command together with who issued it and its correlation id
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    pub transaction_id: TransactionId,
    pub player: PlayerId,
    pub robot: RobotId,
    pub command: Command,
}

impl CommandEnvelope {
    pub fn new(player: PlayerId, robot: RobotId, command: Command) -> Self {
        Self {
            transaction_id: TransactionId::new(),
            player,
            robot,
            command,
        }
    }
}
