//! Planets as seen by the robot service
//!
//! The map service owns planets. This service keeps only what robots need:
//! the id, the deposit that can be mined and whether the planet is blocked.

pub mod client;
pub mod map;

use serde::{Deserialize, Serialize};

use crate::core::types::PlanetId;
use crate::robot::resource::ResourceType;

pub use client::MapClient;
pub use map::{PlanetMap, Route, StaticMap};

/// Kind of planet reported by the map service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanetType {
    #[default]
    Default,
    SpaceStation,
}

/// Local record of a planet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub id: PlanetId,
    pub planet_type: PlanetType,
    pub resource: Option<ResourceType>,
    /// Robots cannot leave a blocked planet until the round ends
    pub blocked: bool,
}

impl Planet {
    pub fn new(id: PlanetId) -> Self {
        Self {
            id,
            planet_type: PlanetType::Default,
            resource: None,
            blocked: false,
        }
    }

    pub fn with_resource(mut self, resource: ResourceType) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_type(mut self, planet_type: PlanetType) -> Self {
        self.planet_type = planet_type;
        self
    }
}
