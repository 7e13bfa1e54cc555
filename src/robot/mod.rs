//! Robot domain - the aggregate, its inventory, items and upgrade tables

pub mod inventory;
pub mod item;
pub mod resource;
pub mod state;
pub mod upgrades;

pub use inventory::Inventory;
pub use item::{Impact, ItemFamily, ItemType, RobotLookup};
pub use resource::ResourceType;
pub use state::Robot;
pub use upgrades::UpgradeType;
