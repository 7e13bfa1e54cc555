use thiserror::Error;

use crate::core::types::{PlanetId, PlayerId, RobotId};
use crate::robot::item::ItemType;
use crate::robot::resource::ResourceType;
use crate::robot::upgrades::UpgradeType;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Not enough energy: required {required}, available {available}")]
    NotEnoughEnergy { required: u32, available: u32 },

    #[error("Planet {0} is blocked")]
    PlanetBlocked(PlanetId),

    #[error("Inventory full: {stored} of {capacity} storage used")]
    InventoryFull { stored: u32, capacity: u32 },

    #[error("Not enough {resource:?}: requested {requested}, available {available}")]
    NotEnoughResources {
        resource: ResourceType,
        requested: u32,
        available: u32,
    },

    #[error("Upgrade of {upgrade:?} from level {current} to {requested} rejected")]
    UpgradeRejected {
        upgrade: UpgradeType,
        current: u8,
        requested: u8,
    },

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("No {0:?} left in inventory")]
    ItemCountUnderflow(ItemType),

    #[error("Robot not found: {0}")]
    RobotNotFound(RobotId),

    #[error("Robot {robot} does not belong to player {player}")]
    PlayerMismatch { robot: RobotId, player: PlayerId },

    #[error("Planet {to} is not reachable from {from}")]
    TargetOutOfReach { from: PlanetId, to: PlanetId },

    #[error("Unknown planet: {0}")]
    UnknownPlanet(PlanetId),

    #[error("Invalid target: {0}")]
    TargetInvalid(String),

    #[error("Robot {0} is destroyed")]
    RobotDead(RobotId),

    #[error("Mining level {mining_level} is too low for {resource:?}")]
    CannotMine {
        resource: ResourceType,
        mining_level: u8,
    },

    #[error("Planet {0} has no resource deposit")]
    NoResourceOnPlanet(PlanetId),

    #[error("Map service unavailable: {0}")]
    MapUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl GameError {
    /// Stable machine-readable name, carried by failure events
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::NotEnoughEnergy { .. } => "NotEnoughEnergy",
            GameError::PlanetBlocked(_) => "PlanetBlocked",
            GameError::InventoryFull { .. } => "InventoryFull",
            GameError::NotEnoughResources { .. } => "NotEnoughResources",
            GameError::UpgradeRejected { .. } => "UpgradeRejected",
            GameError::UnknownItem(_) => "UnknownItem",
            GameError::ItemCountUnderflow(_) => "ItemCountUnderflow",
            GameError::RobotNotFound(_) => "RobotNotFound",
            GameError::PlayerMismatch { .. } => "PlayerMismatch",
            GameError::TargetOutOfReach { .. } => "TargetOutOfReach",
            GameError::UnknownPlanet(_) => "UnknownPlanet",
            GameError::TargetInvalid(_) => "TargetInvalid",
            GameError::RobotDead(_) => "RobotDead",
            GameError::CannotMine { .. } => "CannotMine",
            GameError::NoResourceOnPlanet(_) => "NoResourceOnPlanet",
            GameError::MapUnavailable(_) => "MapUnavailable",
            GameError::Config(_) => "Config",
            GameError::IoError(_) => "IoError",
            GameError::SerdeError(_) => "SerdeError",
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
