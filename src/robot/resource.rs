//! Mineable resource types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of resource a planet can hold, ordered from least to most valuable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Coal,
    Iron,
    Gem,
    Gold,
    Platin,
}

impl ResourceType {
    /// All resource types, least valuable first
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Coal,
        ResourceType::Iron,
        ResourceType::Gem,
        ResourceType::Gold,
        ResourceType::Platin,
    ];

    /// Mining level a robot needs before it can mine this resource
    pub fn required_mining_level(self) -> u8 {
        match self {
            ResourceType::Coal => 0,
            ResourceType::Iron => 1,
            ResourceType::Gem => 2,
            ResourceType::Gold => 3,
            ResourceType::Platin => 4,
        }
    }

    /// All resource types, most valuable first
    pub fn by_value_desc() -> impl Iterator<Item = ResourceType> {
        Self::ALL.into_iter().rev()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Coal => "COAL",
            ResourceType::Iron => "IRON",
            ResourceType::Gem => "GEM",
            ResourceType::Gold => "GOLD",
            ResourceType::Platin => "PLATIN",
        };
        f.write_str(name)
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resource type: {}", s))
    }
}
