//! Inventory - per-robot resource and item ledger
//!
//! Resources share one storage capacity derived from the storage level.
//! Items are counted per variant and take no storage.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::robot::item::ItemType;
use crate::robot::resource::ResourceType;
use crate::robot::upgrades::{self, UpgradeType};

/// Resources and items carried by one robot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    storage_level: u8,
    /// Cached sum of `resources`
    used_storage: u32,
    resources: AHashMap<ResourceType, u32>,
    items: AHashMap<ItemType, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage_level(&self) -> u8 {
        self.storage_level
    }

    pub fn max_storage(&self) -> u32 {
        upgrades::storage(self.storage_level)
    }

    pub fn used_storage(&self) -> u32 {
        self.used_storage
    }

    pub fn free_storage(&self) -> u32 {
        self.max_storage() - self.used_storage
    }

    pub fn is_full(&self) -> bool {
        self.used_storage == self.max_storage()
    }

    /// Raise the storage level; only `current + 1` is accepted
    pub fn upgrade_storage(&mut self, level: u8) -> Result<()> {
        if !UpgradeType::Storage.accepts(self.storage_level, level) {
            return Err(GameError::UpgradeRejected {
                upgrade: UpgradeType::Storage,
                current: self.storage_level,
                requested: level,
            });
        }
        self.storage_level = level;
        Ok(())
    }

    /// Get the stored amount of a resource
    pub fn storage_usage_for(&self, resource: ResourceType) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    /// Stored resources with a non-zero amount
    pub fn resources(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL
            .into_iter()
            .map(|r| (r, self.storage_usage_for(r)))
            .filter(|(_, amount)| *amount > 0)
    }

    /// Add a resource up to the remaining capacity
    ///
    /// When `amount` does not fit, the part that fits is still stored and
    /// `InventoryFull` is returned.
    pub fn add_resource(&mut self, resource: ResourceType, amount: u32) -> Result<()> {
        let added = amount.min(self.free_storage());
        if added > 0 {
            *self.resources.entry(resource).or_insert(0) += added;
            self.used_storage += added;
        }
        if added < amount {
            return Err(GameError::InventoryFull {
                stored: self.used_storage,
                capacity: self.max_storage(),
            });
        }
        Ok(())
    }

    /// Remove an exact amount of a resource, all or nothing
    pub fn take_resource(&mut self, resource: ResourceType, amount: u32) -> Result<()> {
        let available = self.storage_usage_for(resource);
        if amount > available {
            return Err(GameError::NotEnoughResources {
                resource,
                requested: amount,
                available,
            });
        }
        if amount > 0 {
            self.resources.insert(resource, available - amount);
            self.used_storage -= amount;
        }
        Ok(())
    }

    /// Remove and return everything stored of one resource
    pub fn take_all_of_type(&mut self, resource: ResourceType) -> u32 {
        let amount = self.resources.remove(&resource).unwrap_or(0);
        self.used_storage -= amount;
        amount
    }

    /// Remove and return all stored resources
    pub fn take_all_resources(&mut self) -> AHashMap<ResourceType, u32> {
        let taken: AHashMap<ResourceType, u32> = self
            .resources
            .drain()
            .filter(|(_, amount)| *amount > 0)
            .collect();
        self.used_storage = 0;
        taken
    }

    pub fn item_count(&self, item: ItemType) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn add_item(&mut self, item: ItemType) {
        *self.items.entry(item).or_insert(0) += 1;
    }

    /// Consume one item; fails when none are left
    pub fn remove_item(&mut self, item: ItemType) -> Result<()> {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(GameError::ItemCountUnderflow(item)),
        }
    }
}
