//! Robot aggregate - health, energy, upgrade levels and position
//!
//! All stats are derived from the level counters through `robot::upgrades`.
//! Every rule violation is returned as a `GameError`; nothing is silently
//! clamped except where a method documents it.

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{PlanetId, PlayerId, RobotId};
use crate::planet::Planet;
use crate::robot::inventory::Inventory;
use crate::robot::resource::ResourceType;
use crate::robot::upgrades::{self, UpgradeType};

/// A player's robot together with the inventory it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
    id: RobotId,
    player: PlayerId,
    planet: PlanetId,
    alive: bool,
    health: i32,
    energy: u32,
    health_level: u8,
    damage_level: u8,
    mining_level: u8,
    mining_speed_level: u8,
    energy_level: u8,
    energy_regen_level: u8,
    inventory: Inventory,
}

impl Robot {
    /// Spawn a level 0 robot with full health and energy
    pub fn new(player: PlayerId, planet: PlanetId) -> Self {
        Self {
            id: RobotId::new(),
            player,
            planet,
            alive: true,
            health: upgrades::max_health(0),
            energy: upgrades::max_energy(0),
            health_level: 0,
            damage_level: 0,
            mining_level: 0,
            mining_speed_level: 0,
            energy_level: 0,
            energy_regen_level: 0,
            inventory: Inventory::new(),
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn planet(&self) -> PlanetId {
        self.planet
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn level(&self, upgrade: UpgradeType) -> u8 {
        match upgrade {
            UpgradeType::Storage => self.inventory.storage_level(),
            UpgradeType::Health => self.health_level,
            UpgradeType::Damage => self.damage_level,
            UpgradeType::MiningSpeed => self.mining_speed_level,
            UpgradeType::Mining => self.mining_level,
            UpgradeType::MaxEnergy => self.energy_level,
            UpgradeType::EnergyRegen => self.energy_regen_level,
        }
    }

    pub fn max_health(&self) -> i32 {
        upgrades::max_health(self.health_level)
    }

    pub fn max_energy(&self) -> u32 {
        upgrades::max_energy(self.energy_level)
    }

    pub fn energy_regen(&self) -> u32 {
        upgrades::energy_regen(self.energy_regen_level)
    }

    pub fn attack_damage(&self) -> u32 {
        upgrades::attack_damage(self.damage_level)
    }

    pub fn mining_speed(&self) -> u32 {
        upgrades::mining_speed(self.mining_speed_level)
    }

    /// Sum of all seven upgrade levels
    pub fn total_upgrades(&self) -> u32 {
        UpgradeType::ALL
            .iter()
            .map(|u| u32::from(self.level(*u)))
            .sum()
    }

    /// Energy an attack costs at the current damage level
    pub fn attack_cost(&self) -> u32 {
        u32::from(self.damage_level) + 1
    }

    /// Energy a mining action costs at the current mining level
    pub fn mining_cost(&self) -> u32 {
        u32::from(self.mining_level) + 1
    }

    /// Energy blocking a planet costs: `round(2 + 0.1 * max_energy)`
    pub fn block_cost(&self) -> u32 {
        (2.0 + 0.1 * f64::from(self.max_energy())).round() as u32
    }

    /// Advance one level counter to `level`
    ///
    /// Only `current + 1` is accepted. Staying, going down, skipping or
    /// passing the maximum is rejected and leaves the robot unchanged.
    pub fn upgrade(&mut self, upgrade: UpgradeType, level: u8) -> Result<()> {
        let counter = match upgrade {
            UpgradeType::Storage => return self.inventory.upgrade_storage(level),
            UpgradeType::Health => &mut self.health_level,
            UpgradeType::Damage => &mut self.damage_level,
            UpgradeType::MiningSpeed => &mut self.mining_speed_level,
            UpgradeType::Mining => &mut self.mining_level,
            UpgradeType::MaxEnergy => &mut self.energy_level,
            UpgradeType::EnergyRegen => &mut self.energy_regen_level,
        };
        let current = *counter;
        if !upgrade.accepts(current, level) {
            return Err(GameError::UpgradeRejected {
                upgrade,
                current,
                requested: level,
            });
        }
        *counter = level;
        tracing::trace!(robot = %self.id, ?upgrade, level, "robot upgraded");
        Ok(())
    }

    fn reduce_energy(&mut self, amount: u32) -> Result<()> {
        if amount > self.energy {
            return Err(GameError::NotEnoughEnergy {
                required: amount,
                available: self.energy,
            });
        }
        self.energy -= amount;
        Ok(())
    }

    /// Move from `current` to `target` for `cost` energy
    ///
    /// The energy is spent before the blocked check: leaving a blocked planet
    /// fails with `PlanetBlocked` and the cost is not refunded.
    pub fn move_to(&mut self, current: &Planet, target: PlanetId, cost: u32) -> Result<()> {
        debug_assert_eq!(current.id, self.planet);
        self.reduce_energy(cost)?;
        if current.blocked {
            return Err(GameError::PlanetBlocked(current.id));
        }
        self.planet = target;
        Ok(())
    }

    /// Block the robot's current planet so nobody can leave it this round
    pub fn block(&mut self, current: &mut Planet) -> Result<()> {
        debug_assert_eq!(current.id, self.planet);
        self.reduce_energy(self.block_cost())?;
        current.blocked = true;
        Ok(())
    }

    /// Relocate without energy cost or blocking checks (wormhole)
    pub fn teleport(&mut self, planet: PlanetId) {
        self.planet = planet;
    }

    /// Lose health; health has no lower bound and death is permanent
    pub fn receive_damage(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.alive = false;
        }
    }

    /// Spend `damage_level + 1` energy and deal `attack_damage` to `target`
    pub fn attack(&mut self, target: &mut Robot) -> Result<()> {
        self.reduce_energy(self.attack_cost())?;
        target.receive_damage(self.attack_damage());
        Ok(())
    }

    pub fn can_mine(&self, resource: ResourceType) -> bool {
        self.mining_level >= resource.required_mining_level()
    }

    /// Check a mining action is possible and return how much to request
    ///
    /// The amount is the mining speed, capped by the free storage. A full
    /// inventory fails with `InventoryFull`.
    pub fn mining_request(&self, resource: ResourceType) -> Result<u32> {
        if !self.can_mine(resource) {
            return Err(GameError::CannotMine {
                resource,
                mining_level: self.mining_level,
            });
        }
        if self.mining_cost() > self.energy {
            return Err(GameError::NotEnoughEnergy {
                required: self.mining_cost(),
                available: self.energy,
            });
        }
        if self.inventory.is_full() {
            return Err(GameError::InventoryFull {
                stored: self.inventory.used_storage(),
                capacity: self.inventory.max_storage(),
            });
        }
        Ok(self.mining_speed().min(self.inventory.free_storage()))
    }

    /// Pay for a mining action and store what was mined
    pub fn mine(&mut self, resource: ResourceType, amount: u32) -> Result<()> {
        if !self.can_mine(resource) {
            return Err(GameError::CannotMine {
                resource,
                mining_level: self.mining_level,
            });
        }
        self.reduce_energy(self.mining_cost())?;
        self.inventory.add_resource(resource, amount)
    }

    /// Add `energy_regen` energy, capped at `max_energy`
    pub fn regenerate_energy(&mut self) {
        self.energy = (self.energy + self.energy_regen()).min(self.max_energy());
    }

    /// Refill energy to `max_energy`; destroyed robots stay drained
    pub fn restore_energy(&mut self) {
        if self.alive {
            self.energy = self.max_energy();
        }
    }

    /// Heal to full health; destroyed robots stay destroyed
    pub fn repair(&mut self) {
        if self.alive {
            self.health = self.max_health();
        }
    }

    /// Heal by `amount`, capped at `max_health`
    pub fn repair_by(&mut self, amount: u32) {
        if self.alive && self.health < self.max_health() {
            let amount = i32::try_from(amount).unwrap_or(i32::MAX);
            self.health = self.health.saturating_add(amount).min(self.max_health());
        }
    }
}
