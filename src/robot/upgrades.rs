//! Upgrade tables - derived robot stats per upgrade level
//!
//! Every stat a robot exposes is looked up here from its level. Nothing
//! mutates these tables at runtime.

use serde::{Deserialize, Serialize};

/// Highest level for every upgrade except mining
pub const MAX_LEVEL: u8 = 5;

/// Highest mining level (one per resource tier)
pub const MAX_MINING_LEVEL: u8 = 4;

pub const STORAGE_BY_LEVEL: [u32; 6] = [20, 50, 100, 200, 400, 1000];
pub const MAX_HEALTH_BY_LEVEL: [i32; 6] = [10, 25, 50, 100, 200, 500];
pub const ATTACK_DAMAGE_BY_LEVEL: [u32; 6] = [1, 2, 5, 10, 20, 50];
pub const MINING_SPEED_BY_LEVEL: [u32; 6] = [2, 5, 10, 15, 20, 40];
pub const MAX_ENERGY_BY_LEVEL: [u32; 6] = [20, 30, 40, 60, 100, 200];
pub const ENERGY_REGEN_BY_LEVEL: [u32; 6] = [4, 6, 8, 10, 15, 20];

/// The seven independently upgradable robot attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpgradeType {
    Storage,
    Health,
    Damage,
    MiningSpeed,
    Mining,
    MaxEnergy,
    EnergyRegen,
}

impl UpgradeType {
    pub const ALL: [UpgradeType; 7] = [
        UpgradeType::Storage,
        UpgradeType::Health,
        UpgradeType::Damage,
        UpgradeType::MiningSpeed,
        UpgradeType::Mining,
        UpgradeType::MaxEnergy,
        UpgradeType::EnergyRegen,
    ];

    /// Highest level this attribute can reach
    pub fn max_level(self) -> u8 {
        match self {
            UpgradeType::Mining => MAX_MINING_LEVEL,
            _ => MAX_LEVEL,
        }
    }

    /// Ratchet rule: only `current + 1`, never beyond the maximum
    pub fn accepts(self, current: u8, requested: u8) -> bool {
        requested <= self.max_level() && current.checked_add(1) == Some(requested)
    }
}

pub fn storage(level: u8) -> u32 {
    STORAGE_BY_LEVEL[level as usize]
}

pub fn max_health(level: u8) -> i32 {
    MAX_HEALTH_BY_LEVEL[level as usize]
}

pub fn attack_damage(level: u8) -> u32 {
    ATTACK_DAMAGE_BY_LEVEL[level as usize]
}

pub fn mining_speed(level: u8) -> u32 {
    MINING_SPEED_BY_LEVEL[level as usize]
}

pub fn max_energy(level: u8) -> u32 {
    MAX_ENERGY_BY_LEVEL[level as usize]
}

pub fn energy_regen(level: u8) -> u32 {
    ENERGY_REGEN_BY_LEVEL[level as usize]
}
