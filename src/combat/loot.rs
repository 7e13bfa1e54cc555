//! Loot redistribution after a round of fighting on one planet
//!
//! Dead robots are emptied into a planet pool and removed. The pool is then
//! shared among the survivors that still have storage room, one resource at
//! a time from the most valuable (PLATIN) down to COAL:
//!
//! 1. `share = pool / eligible` (floor division)
//! 2. If `share >= 1`, every eligible robot takes `min(share, free storage)`.
//!    A robot that could not take the full share drops out of the pass and
//!    only what it actually took leaves the pool.
//! 3. If `share < 1`, eligible robots are visited in shuffled order and take
//!    one unit each until the pool for that resource is empty.
//!
//! Whatever cannot be placed because every survivor is full is discarded.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::RobotId;
use crate::robot::resource::ResourceType;
use crate::robot::state::Robot;

/// Resources one survivor received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootShare {
    pub robot: RobotId,
    pub resource: ResourceType,
    pub amount: u32,
}

/// What happened to the pool of one planet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootReport {
    /// Robots removed from the game
    pub destroyed: Vec<RobotId>,
    /// Everything drained from the destroyed robots
    pub looted: AHashMap<ResourceType, u32>,
    /// Amounts handed to survivors, merged per robot and resource
    pub shares: Vec<LootShare>,
    /// Left in the pool because no survivor had room
    pub discarded: AHashMap<ResourceType, u32>,
}

impl LootReport {
    pub fn total_looted(&self) -> u32 {
        self.looted.values().sum()
    }

    pub fn total_distributed(&self) -> u32 {
        self.shares.iter().map(|s| s.amount).sum()
    }

    pub fn total_discarded(&self) -> u32 {
        self.discarded.values().sum()
    }

    pub fn received_by(&self, robot: RobotId, resource: ResourceType) -> u32 {
        self.shares
            .iter()
            .filter(|s| s.robot == robot && s.resource == resource)
            .map(|s| s.amount)
            .sum()
    }
}

/// Survivors to persist, robots to delete and the report
#[derive(Debug)]
pub struct LootOutcome {
    pub survivors: Vec<Robot>,
    pub report: LootReport,
}

/// Run the redistribution over every robot on one planet
pub fn redistribute_loot<R: Rng + ?Sized>(robots: Vec<Robot>, rng: &mut R) -> Result<LootOutcome> {
    let (dead, mut alive): (Vec<Robot>, Vec<Robot>) =
        robots.into_iter().partition(|r| !r.is_alive());

    let mut report = LootReport::default();
    for mut robot in dead {
        for (resource, amount) in robot.inventory_mut().take_all_resources() {
            *report.looted.entry(resource).or_insert(0) += amount;
        }
        report.destroyed.push(robot.id());
    }

    let mut eligible: Vec<bool> = alive.iter().map(|r| !r.inventory().is_full()).collect();
    let mut eligible_count = eligible.iter().filter(|e| **e).count() as u32;
    let mut given: AHashMap<(RobotId, ResourceType), u32> = AHashMap::new();

    for resource in ResourceType::by_value_desc() {
        let mut remaining = report.looted.get(&resource).copied().unwrap_or(0);

        while remaining > 0 && eligible_count > 0 {
            let share = remaining / eligible_count;
            if share >= 1 {
                for (idx, robot) in alive.iter_mut().enumerate() {
                    if !eligible[idx] {
                        continue;
                    }
                    let amount = share.min(robot.inventory().free_storage());
                    if amount > 0 {
                        robot.inventory_mut().add_resource(resource, amount)?;
                        *given.entry((robot.id(), resource)).or_insert(0) += amount;
                        remaining -= amount;
                    }
                    if amount < share {
                        eligible[idx] = false;
                        eligible_count -= 1;
                    }
                }
            } else {
                let mut order: Vec<usize> = (0..alive.len()).collect();
                order.shuffle(rng);
                for idx in order {
                    if remaining == 0 {
                        break;
                    }
                    if !eligible[idx] {
                        continue;
                    }
                    let robot = &mut alive[idx];
                    if robot.inventory().free_storage() == 0 {
                        eligible[idx] = false;
                        eligible_count -= 1;
                        continue;
                    }
                    robot.inventory_mut().add_resource(resource, 1)?;
                    *given.entry((robot.id(), resource)).or_insert(0) += 1;
                    remaining -= 1;
                }
            }
        }

        if remaining > 0 {
            report.discarded.insert(resource, remaining);
        }
    }

    report.shares = given
        .into_iter()
        .map(|((robot, resource), amount)| LootShare {
            robot,
            resource,
            amount,
        })
        .collect();
    report
        .shares
        .sort_by(|a, b| (b.resource, a.robot.0).cmp(&(a.resource, b.robot.0)));

    tracing::debug!(
        destroyed = report.destroyed.len(),
        looted = report.total_looted(),
        distributed = report.total_distributed(),
        discarded = report.total_discarded(),
        "loot redistributed"
    );

    Ok(LootOutcome {
        survivors: alive,
        report,
    })
}
