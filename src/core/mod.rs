pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, ServiceConfig, TopicConfig};
pub use error::{GameError, Result};
pub use types::{PlanetId, PlayerId, RobotId, TransactionId};
