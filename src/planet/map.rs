//! Planet map collaborator - adjacency, movement cost and mining
//!
//! `PlanetMap` is the seam to the map service. `MapClient` talks to the real
//! service over HTTP; `StaticMap` holds a fixed graph in memory for local
//! runs and tests.

use ahash::AHashMap;
use serde::Serialize;
use std::future::Future;
use std::sync::Mutex;

use crate::core::error::{GameError, Result};
use crate::core::types::PlanetId;
use crate::planet::Planet;
use crate::robot::resource::ResourceType;

/// A reachable move between two neighbouring planets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub from: PlanetId,
    /// Destination as reported by the map service
    pub to: Planet,
    /// Energy the move costs
    pub cost: u32,
}

/// Access to planet adjacency and deposits
///
/// Failures are surfaced as `TargetOutOfReach`, `UnknownPlanet` or
/// `MapUnavailable`; implementations do not retry.
pub trait PlanetMap {
    /// Resolve the move from `from` to `to`
    fn route(&self, from: PlanetId, to: PlanetId) -> impl Future<Output = Result<Route>> + Send;

    /// Mine up to `amount` from the planet's deposit, returning what was mined
    fn mine(
        &self,
        planet: PlanetId,
        resource: ResourceType,
        amount: u32,
    ) -> impl Future<Output = Result<u32>> + Send;
}

#[derive(Debug, Clone)]
struct MapNode {
    planet: Planet,
    movement_difficulty: u32,
    deposit: u32,
    neighbours: Vec<PlanetId>,
}

/// In-memory planet graph
#[derive(Debug, Default)]
pub struct StaticMap {
    nodes: Mutex<AHashMap<PlanetId, MapNode>>,
}

impl StaticMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a planet with its movement difficulty and deposit size
    pub fn add_planet(&self, planet: Planet, movement_difficulty: u32, deposit: u32) {
        let mut nodes = self.lock();
        nodes.insert(
            planet.id,
            MapNode {
                planet,
                movement_difficulty,
                deposit,
                neighbours: Vec::new(),
            },
        );
    }

    /// Connect two planets in both directions
    pub fn connect(&self, a: PlanetId, b: PlanetId) {
        let mut nodes = self.lock();
        if let Some(node) = nodes.get_mut(&a) {
            if !node.neighbours.contains(&b) {
                node.neighbours.push(b);
            }
        }
        if let Some(node) = nodes.get_mut(&b) {
            if !node.neighbours.contains(&a) {
                node.neighbours.push(a);
            }
        }
    }

    pub fn planet(&self, id: PlanetId) -> Option<Planet> {
        self.lock().get(&id).map(|n| n.planet.clone())
    }

    pub fn planets(&self) -> Vec<Planet> {
        self.lock().values().map(|n| n.planet.clone()).collect()
    }

    /// Remaining deposit on a planet
    pub fn deposit(&self, id: PlanetId) -> u32 {
        self.lock().get(&id).map(|n| n.deposit).unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<PlanetId, MapNode>> {
        // A poisoned graph is still consistent: every write is a single insert or push
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn resolve_route(&self, from: PlanetId, to: PlanetId) -> Result<Route> {
        let nodes = self.lock();
        let origin = nodes.get(&from).ok_or(GameError::UnknownPlanet(from))?;
        let destination = nodes.get(&to).ok_or(GameError::UnknownPlanet(to))?;
        if !origin.neighbours.contains(&to) {
            return Err(GameError::TargetOutOfReach { from, to });
        }
        Ok(Route {
            from,
            to: destination.planet.clone(),
            cost: destination.movement_difficulty,
        })
    }

    fn take_deposit(&self, planet: PlanetId, resource: ResourceType, amount: u32) -> Result<u32> {
        let mut nodes = self.lock();
        let node = nodes.get_mut(&planet).ok_or(GameError::UnknownPlanet(planet))?;
        if node.planet.resource != Some(resource) {
            return Err(GameError::NoResourceOnPlanet(planet));
        }
        let mined = amount.min(node.deposit);
        node.deposit -= mined;
        Ok(mined)
    }
}

impl PlanetMap for StaticMap {
    fn route(&self, from: PlanetId, to: PlanetId) -> impl Future<Output = Result<Route>> + Send {
        let result = self.resolve_route(from, to);
        async move { result }
    }

    fn mine(
        &self,
        planet: PlanetId,
        resource: ResourceType,
        amount: u32,
    ) -> impl Future<Output = Result<u32>> + Send {
        let result = self.take_deposit(planet, resource, amount);
        async move { result }
    }
}
