//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for robots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotId(pub Uuid);

impl RobotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RobotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of the player owning a robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a planet, assigned by the map service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanetId(pub Uuid);

impl PlanetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlanetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Correlation id tying a command to the events it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! display_uuid {
    ($($name:ident),*) => {
        $(impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_uuid!(RobotId, PlayerId, PlanetId, TransactionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_ids_are_unique() {
        let a = RobotId::new();
        let b = RobotId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_planet_id_hash() {
        use std::collections::HashMap;
        let id = PlanetId::new();
        let mut map: HashMap<PlanetId, &str> = HashMap::new();
        map.insert(id, "home");
        assert_eq!(map.get(&id), Some(&"home"));
    }

    #[test]
    fn test_display_is_plain_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(PlayerId(uuid).to_string(), uuid.to_string());
    }
}
