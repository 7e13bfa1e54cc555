//! Command execution - loads robots, applies domain rules, persists, publishes
//!
//! Every player command yields exactly one event. Domain failures become
//! failure events instead of errors. The caller must not run two commands for
//! the same robot or planet concurrently; `&mut self` enforces that in process.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::combat::{self, LootReport};
use crate::core::config::{ServiceConfig, TopicConfig};
use crate::core::error::{GameError, Result};
use crate::core::types::{PlanetId, PlayerId, RobotId, TransactionId};
use crate::events::{EventPayload, EventPublisher, GameEvent, Topic};
use crate::planet::{Planet, PlanetMap};
use crate::robot::item::ItemType;
use crate::robot::resource::ResourceType;
use crate::robot::state::Robot;
use crate::robot::upgrades::UpgradeType;
use crate::store::{PlanetRepository, RobotRepository};

use super::request::{Command, CommandEnvelope};

/// Application service in front of the robot domain
pub struct CommandExecutor<S, M, P> {
    store: S,
    map: M,
    publisher: P,
    rng: ChaCha8Rng,
    topics: TopicConfig,
}

impl<S, M, P> CommandExecutor<S, M, P>
where
    S: RobotRepository + PlanetRepository,
    M: PlanetMap,
    P: EventPublisher,
{
    pub fn new(store: S, map: M, publisher: P, config: &ServiceConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            store,
            map,
            publisher,
            rng,
            topics: config.topics.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    fn publish(&self, event: &GameEvent) {
        self.publisher.publish(event.topic.name(&self.topics), event);
    }

    /// Create a level 0 robot for `player` on `planet`
    pub fn spawn(&mut self, player: PlayerId, planet: Planet) -> Robot {
        if self.store.find_planet(planet.id).is_none() {
            self.store.save_planet(planet.clone());
        }
        let robot = Robot::new(player, planet.id);
        self.store.save(robot.clone());
        tracing::info!(robot = %robot.id(), %player, planet = %planet.id, "robot spawned");

        self.publish(&GameEvent::success(
            TransactionId::new(),
            Topic::RobotSpawned,
            "robot spawned",
            EventPayload::RobotSpawned {
                robot: robot.id(),
                player,
                planet: planet.id,
            },
        ));
        robot
    }

    /// Apply an upgrade bought through trading
    pub fn upgrade(&mut self, robot: RobotId, upgrade: UpgradeType, level: u8) -> Result<()> {
        let mut robot = self.load(robot)?;
        robot.upgrade(upgrade, level)?;
        self.store.save(robot);
        Ok(())
    }

    /// Put a bought item into a robot's inventory
    pub fn grant_item(&mut self, robot: RobotId, item: ItemType) -> Result<()> {
        let mut robot = self.load(robot)?;
        robot.inventory_mut().add_item(item);
        self.store.save(robot);
        Ok(())
    }

    /// Heal a robot to full health (bought restoration)
    pub fn restore_health(&mut self, robot: RobotId) -> Result<()> {
        let mut robot = self.load_alive(robot)?;
        robot.repair();
        tracing::debug!(robot = %robot.id(), health = robot.health(), "health restored");
        self.store.save(robot);
        Ok(())
    }

    /// Refill a robot's energy (bought restoration)
    pub fn restore_energy(&mut self, robot: RobotId) -> Result<()> {
        let mut robot = self.load_alive(robot)?;
        robot.restore_energy();
        tracing::debug!(robot = %robot.id(), energy = robot.energy(), "energy restored");
        self.store.save(robot);
        Ok(())
    }

    /// Store resources in a robot's inventory
    ///
    /// The part that fits is kept even when `InventoryFull` is returned.
    pub fn grant_resource(
        &mut self,
        robot: RobotId,
        resource: ResourceType,
        amount: u32,
    ) -> Result<()> {
        let mut robot = self.load(robot)?;
        let result = robot.inventory_mut().add_resource(resource, amount);
        self.store.save(robot);
        result
    }

    /// Remove resources from a robot's inventory (selling)
    pub fn take_resource(
        &mut self,
        robot: RobotId,
        resource: ResourceType,
        amount: u32,
    ) -> Result<()> {
        let mut robot = self.load(robot)?;
        robot.inventory_mut().take_resource(resource, amount)?;
        self.store.save(robot);
        Ok(())
    }

    /// Run one player command and publish its event
    pub async fn execute(&mut self, envelope: CommandEnvelope) -> GameEvent {
        let topic = envelope.command.topic();
        let event = match self.dispatch(&envelope).await {
            Ok(event) => event,
            Err(error) => {
                tracing::warn!(
                    robot = %envelope.robot,
                    transaction = %envelope.transaction_id,
                    kind = error.kind(),
                    "command failed: {}",
                    error
                );
                GameEvent::failure(
                    envelope.transaction_id,
                    topic,
                    Some(envelope.robot),
                    &error,
                )
            }
        };
        self.publish(&event);
        event
    }

    async fn dispatch(&mut self, envelope: &CommandEnvelope) -> Result<GameEvent> {
        let tx = envelope.transaction_id;
        let robot = self.load_owned(envelope.robot, envelope.player)?;
        match envelope.command {
            Command::Move { target } => self.move_robot(tx, robot, target).await,
            Command::Block => self.block(tx, robot),
            Command::Regenerate => self.regenerate(tx, robot),
            Command::Attack { target } => self.attack(tx, robot, target),
            Command::Mine => self.mine(tx, robot).await,
            Command::UseItem { item, target } => self.use_item(tx, robot, item, target),
        }
    }

    fn load(&self, id: RobotId) -> Result<Robot> {
        self.store.find(id).ok_or(GameError::RobotNotFound(id))
    }

    fn load_alive(&self, id: RobotId) -> Result<Robot> {
        self.load(id).and_then(alive)
    }

    fn load_owned(&self, id: RobotId, player: PlayerId) -> Result<Robot> {
        let robot = self.load(id)?;
        if robot.player() != player {
            return Err(GameError::PlayerMismatch { robot: id, player });
        }
        alive(robot)
    }

    fn current_planet(&self, robot: &Robot) -> Result<Planet> {
        self.store
            .find_planet(robot.planet())
            .ok_or(GameError::UnknownPlanet(robot.planet()))
    }

    async fn move_robot(
        &mut self,
        tx: TransactionId,
        mut robot: Robot,
        target: PlanetId,
    ) -> Result<GameEvent> {
        let route = self.map.route(robot.planet(), target).await?;
        let current = self.current_planet(&robot)?;

        match robot.move_to(&current, route.to.id, route.cost) {
            Ok(()) => {}
            Err(error @ GameError::PlanetBlocked(_)) => {
                // Energy is spent even though the robot stays
                self.store.save(robot);
                return Err(error);
            }
            Err(error) => return Err(error),
        }

        if self.store.find_planet(route.to.id).is_none() {
            self.store.save_planet(route.to.clone());
        }
        let payload = EventPayload::Movement {
            robot: robot.id(),
            planet: robot.planet(),
            remaining_energy: robot.energy(),
        };
        tracing::info!(robot = %robot.id(), from = %route.from, to = %route.to.id, "robot moved");
        self.store.save(robot);
        Ok(GameEvent::success(tx, Topic::Movement, "robot moved", payload))
    }

    fn block(&mut self, tx: TransactionId, mut robot: Robot) -> Result<GameEvent> {
        let mut planet = self.current_planet(&robot)?;
        robot.block(&mut planet)?;

        let payload = EventPayload::PlanetBlocked {
            robot: robot.id(),
            planet: planet.id,
            remaining_energy: robot.energy(),
        };
        tracing::info!(robot = %robot.id(), planet = %planet.id, "planet blocked");
        self.store.save_planet(planet);
        self.store.save(robot);
        Ok(GameEvent::success(tx, Topic::PlanetBlocked, "planet blocked", payload))
    }

    fn regenerate(&mut self, tx: TransactionId, mut robot: Robot) -> Result<GameEvent> {
        robot.regenerate_energy();
        let payload = EventPayload::Regeneration {
            robot: robot.id(),
            energy: robot.energy(),
        };
        self.store.save(robot);
        Ok(GameEvent::success(tx, Topic::Regeneration, "energy regenerated", payload))
    }

    fn attack(
        &mut self,
        tx: TransactionId,
        mut attacker: Robot,
        target: RobotId,
    ) -> Result<GameEvent> {
        let mut defender = self.load(target)?;
        let outcome = combat::attack(&mut attacker, &mut defender)?;

        let payload = EventPayload::Fighting {
            attacker: outcome.attacker,
            defender: outcome.defender,
            remaining_defender_health: outcome.defender_health,
            remaining_energy: outcome.attacker_energy,
            defender_destroyed: outcome.defender_destroyed,
        };
        if outcome.defender_destroyed {
            tracing::info!(
                attacker = %outcome.attacker,
                defender = %outcome.defender,
                "robot destroyed in combat"
            );
        }
        self.store.save_all(vec![attacker, defender]);
        Ok(GameEvent::success(tx, Topic::Fighting, "attack resolved", payload))
    }

    async fn mine(&mut self, tx: TransactionId, mut robot: Robot) -> Result<GameEvent> {
        let planet = self.current_planet(&robot)?;
        let resource = planet.resource.ok_or(GameError::NoResourceOnPlanet(planet.id))?;
        let requested = robot.mining_request(resource)?;
        let mined = self
            .map
            .mine(planet.id, resource, requested)
            .await?
            .min(requested);

        robot.mine(resource, mined)?;
        let payload = EventPayload::Mining {
            robot: robot.id(),
            resource,
            amount: mined,
            used_storage: robot.inventory().used_storage(),
            remaining_energy: robot.energy(),
        };
        tracing::debug!(robot = %robot.id(), %resource, requested, mined, "resource mined");
        self.store.save(robot);
        Ok(GameEvent::success(tx, Topic::Mining, "resource mined", payload))
    }

    fn use_item(
        &mut self,
        tx: TransactionId,
        mut robot: Robot,
        item: ItemType,
        target: Uuid,
    ) -> Result<GameEvent> {
        if robot.inventory().item_count(item) == 0 {
            return Err(GameError::ItemCountUnderflow(item));
        }
        let impacts = item.effect(&robot, target, &self.store)?;
        robot.inventory_mut().remove_item(item)?;

        let mut affected: AHashMap<RobotId, Robot> = AHashMap::new();
        for impact in &impacts {
            let id = impact.robot();
            if id == robot.id() {
                impact.apply(&mut robot);
                continue;
            }
            if !affected.contains_key(&id) {
                affected.insert(id, self.load(id)?);
            }
            if let Some(other) = affected.get_mut(&id) {
                impact.apply(other);
            }
        }

        let payload = EventPayload::ItemUsed {
            robot: robot.id(),
            item,
            remaining_items: robot.inventory().item_count(item),
            impacts: impacts.clone(),
        };
        tracing::info!(robot = %robot.id(), %item, impacts = impacts.len(), "item used");

        let mut changed: Vec<Robot> = affected.into_values().collect();
        changed.push(robot);
        self.store.save_all(changed);
        Ok(GameEvent::success(
            tx,
            Topic::for_item(item.family()),
            format!("{} used", item),
            payload,
        ))
    }

    /// Close a round: redistribute loot on every planet with destroyed
    /// robots, then lift all planet blocks
    pub fn end_round(&mut self) -> Result<Vec<(PlanetId, LootReport)>> {
        let tx = TransactionId::new();
        let mut reports = Vec::new();

        for planet in self.store.planets_with_dead() {
            let robots = self.store.on_planet(planet);
            let owners: AHashMap<RobotId, PlayerId> = robots
                .iter()
                .filter(|r| !r.is_alive())
                .map(|r| (r.id(), r.player()))
                .collect();

            let outcome = combat::redistribute_loot(robots, &mut self.rng)?;
            self.store
                .commit_planet(outcome.survivors, &outcome.report.destroyed);

            for robot in &outcome.report.destroyed {
                if let Some(player) = owners.get(robot) {
                    self.publish(&GameEvent::success(
                        tx,
                        Topic::RobotDestroyed,
                        "robot destroyed",
                        EventPayload::RobotDestroyed {
                            robot: *robot,
                            player: *player,
                            planet,
                        },
                    ));
                }
            }
            tracing::info!(
                %planet,
                destroyed = outcome.report.destroyed.len(),
                distributed = outcome.report.total_distributed(),
                discarded = outcome.report.total_discarded(),
                "loot redistributed"
            );
            self.publish(&GameEvent::success(
                tx,
                Topic::ResourceDistribution,
                "resources distributed",
                EventPayload::ResourceDistribution {
                    planet,
                    report: outcome.report.clone(),
                },
            ));
            reports.push((planet, outcome.report));
        }

        for mut planet in self.store.blocked_planets() {
            planet.blocked = false;
            self.store.save_planet(planet);
        }
        Ok(reports)
    }
}

fn alive(robot: Robot) -> Result<Robot> {
    if robot.is_alive() {
        Ok(robot)
    } else {
        Err(GameError::RobotDead(robot.id()))
    }
}
