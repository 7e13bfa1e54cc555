//! Persistence seam
//!
//! The domain model assumes every read-modify-write goes through one of these
//! repositories and that the caller serializes access per robot and per
//! planet. `InMemoryStore` is the in-process implementation; a database
//! backed store implements the same traits.

pub mod memory;

use crate::core::types::{PlanetId, PlayerId, RobotId};
use crate::planet::Planet;
use crate::robot::item::RobotLookup;
use crate::robot::state::Robot;

pub use memory::InMemoryStore;

/// Storage of robots (each together with its inventory)
pub trait RobotRepository {
    fn find(&self, id: RobotId) -> Option<Robot>;

    fn save(&mut self, robot: Robot);

    fn save_all(&mut self, robots: Vec<Robot>) {
        for robot in robots {
            self.save(robot);
        }
    }

    /// All robots on a planet, dead or alive
    fn on_planet(&self, planet: PlanetId) -> Vec<Robot>;

    fn dead_on_planet(&self, planet: PlanetId) -> Vec<Robot> {
        self.on_planet(planet)
            .into_iter()
            .filter(|r| !r.is_alive())
            .collect()
    }

    fn of_player_on_planet(&self, player: PlayerId, planet: PlanetId) -> Vec<Robot> {
        self.on_planet(planet)
            .into_iter()
            .filter(|r| r.player() == player)
            .collect()
    }

    /// Planets currently holding at least one destroyed robot
    fn planets_with_dead(&self) -> Vec<PlanetId>;

    /// Save `survivors` and delete `deleted` as one unit of work
    fn commit_planet(&mut self, survivors: Vec<Robot>, deleted: &[RobotId]);
}

/// Storage of the planet records robots refer to
pub trait PlanetRepository {
    fn find_planet(&self, id: PlanetId) -> Option<Planet>;

    fn save_planet(&mut self, planet: Planet);

    fn blocked_planets(&self) -> Vec<Planet>;
}

impl<T: RobotRepository + PlanetRepository> RobotLookup for T {
    fn robot(&self, id: RobotId) -> Option<Robot> {
        self.find(id)
    }

    fn robots_on_planet(&self, planet: PlanetId) -> Vec<Robot> {
        self.on_planet(planet)
    }

    fn robots_of_player_on_planet(&self, player: PlayerId, planet: PlanetId) -> Vec<Robot> {
        self.of_player_on_planet(player, planet)
    }

    fn planet_exists(&self, planet: PlanetId) -> bool {
        self.find_planet(planet).is_some()
    }
}
