//! Special items and their effects
//!
//! Using an item never mutates robots directly. Each effect resolves its
//! target and returns the list of [`Impact`]s to apply, so the caller can load,
//! change and persist the affected robots as one unit of work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::error::{GameError, Result};
use crate::core::types::{PlanetId, PlayerId, RobotId};
use crate::robot::state::Robot;

pub const ROCKET_DAMAGE: u32 = 5;
pub const LONG_RANGE_BOMBARDMENT_DAMAGE: u32 = 10;
pub const SELF_DESTRUCTION_SELF_DAMAGE: u32 = 1000;
pub const SELF_DESTRUCTION_AREA_DAMAGE: u32 = 20;
pub const NUKE_DAMAGE: u32 = 100;
pub const REPAIR_SWARM_HEAL: u32 = 20;

/// Which kind of command an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemFamily {
    Attack,
    Movement,
    Repair,
}

/// Every concrete item a robot can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Rocket,
    LongRangeBombardment,
    SelfDestruction,
    Nuke,
    Wormhole,
    RepairSwarm,
}

/// A single change an item effect wants applied to a robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Impact {
    Damage { robot: RobotId, amount: u32 },
    Repair { robot: RobotId, amount: u32 },
    Teleport { robot: RobotId, planet: PlanetId },
}

impl Impact {
    pub fn robot(&self) -> RobotId {
        match *self {
            Impact::Damage { robot, .. }
            | Impact::Repair { robot, .. }
            | Impact::Teleport { robot, .. } => robot,
        }
    }

    /// Apply this impact to the robot it names
    pub fn apply(&self, robot: &mut Robot) {
        debug_assert_eq!(robot.id(), self.robot());
        match *self {
            Impact::Damage { amount, .. } => robot.receive_damage(amount),
            Impact::Repair { amount, .. } => robot.repair_by(amount),
            Impact::Teleport { planet, .. } => robot.teleport(planet),
        }
    }
}

/// Read access to robots and planets that item effects need
pub trait RobotLookup {
    fn robot(&self, id: RobotId) -> Option<Robot>;
    fn robots_on_planet(&self, planet: PlanetId) -> Vec<Robot>;
    fn robots_of_player_on_planet(&self, player: PlayerId, planet: PlanetId) -> Vec<Robot>;
    fn planet_exists(&self, planet: PlanetId) -> bool;
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Rocket,
        ItemType::LongRangeBombardment,
        ItemType::SelfDestruction,
        ItemType::Nuke,
        ItemType::Wormhole,
        ItemType::RepairSwarm,
    ];

    pub fn family(self) -> ItemFamily {
        match self {
            ItemType::Rocket
            | ItemType::LongRangeBombardment
            | ItemType::SelfDestruction
            | ItemType::Nuke => ItemFamily::Attack,
            ItemType::Wormhole => ItemFamily::Movement,
            ItemType::RepairSwarm => ItemFamily::Repair,
        }
    }

    /// Resolve the effect of `user` using this item on `target`
    ///
    /// `target` is a robot id for rockets and a planet id for everything
    /// aimed at a planet. Repair swarms ignore it.
    pub fn effect(
        self,
        user: &Robot,
        target: Uuid,
        lookup: &impl RobotLookup,
    ) -> Result<Vec<Impact>> {
        match self {
            ItemType::Rocket => rocket(target, lookup),
            ItemType::LongRangeBombardment => {
                area_damage(PlanetId(target), LONG_RANGE_BOMBARDMENT_DAMAGE, lookup)
            }
            ItemType::SelfDestruction => self_destruction(user, target, lookup),
            ItemType::Nuke => area_damage(PlanetId(target), NUKE_DAMAGE, lookup),
            ItemType::Wormhole => wormhole(user, target, lookup),
            ItemType::RepairSwarm => Ok(repair_swarm(user, lookup)),
        }
    }
}

fn rocket(target: Uuid, lookup: &impl RobotLookup) -> Result<Vec<Impact>> {
    let target = lookup
        .robot(RobotId(target))
        .ok_or(GameError::RobotNotFound(RobotId(target)))?;
    Ok(vec![Impact::Damage {
        robot: target.id(),
        amount: ROCKET_DAMAGE,
    }])
}

fn area_damage(planet: PlanetId, amount: u32, lookup: &impl RobotLookup) -> Result<Vec<Impact>> {
    Ok(lookup
        .robots_on_planet(planet)
        .iter()
        .filter(|r| r.is_alive())
        .map(|r| Impact::Damage { robot: r.id(), amount })
        .collect())
}

fn self_destruction(user: &Robot, target: Uuid, lookup: &impl RobotLookup) -> Result<Vec<Impact>> {
    if PlanetId(target) != user.planet() {
        return Err(GameError::TargetInvalid(
            "self destruction can only target the robot's own planet".into(),
        ));
    }
    let mut impacts = vec![Impact::Damage {
        robot: user.id(),
        amount: SELF_DESTRUCTION_SELF_DAMAGE,
    }];
    impacts.extend(
        lookup
            .robots_on_planet(user.planet())
            .iter()
            .filter(|r| r.id() != user.id() && r.is_alive())
            .map(|r| Impact::Damage {
                robot: r.id(),
                amount: SELF_DESTRUCTION_AREA_DAMAGE,
            }),
    );
    Ok(impacts)
}

fn wormhole(user: &Robot, target: Uuid, lookup: &impl RobotLookup) -> Result<Vec<Impact>> {
    let planet = PlanetId(target);
    if !lookup.planet_exists(planet) {
        return Err(GameError::UnknownPlanet(planet));
    }
    Ok(vec![Impact::Teleport {
        robot: user.id(),
        planet,
    }])
}

fn repair_swarm(user: &Robot, lookup: &impl RobotLookup) -> Vec<Impact> {
    lookup
        .robots_of_player_on_planet(user.player(), user.planet())
        .iter()
        .filter(|r| r.is_alive())
        .map(|r| Impact::Repair {
            robot: r.id(),
            amount: REPAIR_SWARM_HEAL,
        })
        .collect()
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemType::Rocket => "ROCKET",
            ItemType::LongRangeBombardment => "LONG_RANGE_BOMBARDMENT",
            ItemType::SelfDestruction => "SELF_DESTRUCTION",
            ItemType::Nuke => "NUKE",
            ItemType::Wormhole => "WORMHOLE",
            ItemType::RepairSwarm => "REPAIR_SWARM",
        };
        f.write_str(name)
    }
}

impl FromStr for ItemType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|item| item.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownItem(s.to_string()))
    }
}
