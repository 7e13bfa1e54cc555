//! In-memory robot and planet store

use ahash::{AHashMap, AHashSet};

use crate::core::types::{PlanetId, RobotId};
use crate::planet::Planet;
use crate::robot::state::Robot;
use crate::store::{PlanetRepository, RobotRepository};

/// Robots and planets held in process memory
///
/// Queries return robots ordered by id so that seeded runs are repeatable.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    robots: AHashMap<RobotId, Robot>,
    planets: AHashMap<PlanetId, Planet>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Every stored robot, ordered by id
    pub fn all_robots(&self) -> Vec<Robot> {
        let mut robots: Vec<Robot> = self.robots.values().cloned().collect();
        robots.sort_by_key(|r| r.id().0);
        robots
    }

    pub fn all_planets(&self) -> Vec<Planet> {
        let mut planets: Vec<Planet> = self.planets.values().cloned().collect();
        planets.sort_by_key(|p| p.id.0);
        planets
    }
}

impl RobotRepository for InMemoryStore {
    fn find(&self, id: RobotId) -> Option<Robot> {
        self.robots.get(&id).cloned()
    }

    fn save(&mut self, robot: Robot) {
        self.robots.insert(robot.id(), robot);
    }

    fn on_planet(&self, planet: PlanetId) -> Vec<Robot> {
        let mut robots: Vec<Robot> = self
            .robots
            .values()
            .filter(|r| r.planet() == planet)
            .cloned()
            .collect();
        robots.sort_by_key(|r| r.id().0);
        robots
    }

    fn planets_with_dead(&self) -> Vec<PlanetId> {
        let planets: AHashSet<PlanetId> = self
            .robots
            .values()
            .filter(|r| !r.is_alive())
            .map(|r| r.planet())
            .collect();
        let mut planets: Vec<PlanetId> = planets.into_iter().collect();
        planets.sort_by_key(|p| p.0);
        planets
    }

    fn commit_planet(&mut self, survivors: Vec<Robot>, deleted: &[RobotId]) {
        for id in deleted {
            // The robot's inventory is dropped with it
            self.robots.remove(id);
        }
        self.save_all(survivors);
    }
}

impl PlanetRepository for InMemoryStore {
    fn find_planet(&self, id: PlanetId) -> Option<Planet> {
        self.planets.get(&id).cloned()
    }

    fn save_planet(&mut self, planet: Planet) {
        self.planets.insert(planet.id, planet);
    }

    fn blocked_planets(&self) -> Vec<Planet> {
        self.planets.values().filter(|p| p.blocked).cloned().collect()
    }
}
