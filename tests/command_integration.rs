//! Command executor integration tests
//!
//! Drives `CommandExecutor` with the in-memory map, store and publisher and
//! checks the persisted state together with the published events.

use std::future::Future;

use uuid::Uuid;

use robot_service::command::{Command, CommandEnvelope, CommandExecutor};
use robot_service::core::config::ServiceConfig;
use robot_service::core::error::{GameError, Result};
use robot_service::core::types::{PlanetId, PlayerId, RobotId};
use robot_service::events::{EventPayload, InMemoryPublisher};
use robot_service::planet::{Planet, PlanetMap, Route, StaticMap};
use robot_service::robot::item::ItemType;
use robot_service::robot::resource::ResourceType;
use robot_service::robot::state::Robot;
use robot_service::robot::upgrades::UpgradeType;
use robot_service::store::{InMemoryStore, PlanetRepository, RobotRepository};

type Executor = CommandExecutor<InMemoryStore, StaticMap, InMemoryPublisher>;

struct Fixture {
    executor: Executor,
    home: Planet,
    mine: Planet,
}

/// `home` (coal) and `mine` (iron, difficulty 3) are neighbours; `far` is not
/// connected to anything
fn fixture() -> Fixture {
    let home = Planet::new(PlanetId::new()).with_resource(ResourceType::Coal);
    let mine = Planet::new(PlanetId::new()).with_resource(ResourceType::Iron);
    let far = Planet::new(PlanetId::new());

    let map = StaticMap::new();
    map.add_planet(home.clone(), 2, 100);
    map.add_planet(mine.clone(), 3, 100);
    map.add_planet(far, 1, 0);
    map.connect(home.id, mine.id);

    let mut config = ServiceConfig::default();
    config.rng_seed = Some(42);

    Fixture {
        executor: Executor::new(InMemoryStore::new(), map, InMemoryPublisher::new(), &config),
        home,
        mine,
    }
}

impl Fixture {
    fn spawn(&mut self, player: PlayerId) -> Robot {
        self.executor.spawn(player, self.home.clone())
    }

    fn robot(&self, id: RobotId) -> Robot {
        self.executor.store().find(id).unwrap()
    }

    async fn run(&mut self, robot: &Robot, command: Command) -> robot_service::events::GameEvent {
        let envelope = CommandEnvelope::new(robot.player(), robot.id(), command);
        self.executor.execute(envelope).await
    }
}

fn reason(event: &robot_service::events::GameEvent) -> &str {
    match &event.payload {
        EventPayload::Rejected { reason, .. } => reason,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_spawn_publishes_event() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());

    assert_eq!(robot.energy(), 20);
    assert_eq!(robot.health(), 10);
    assert_eq!(f.executor.publisher().on_topic("robot-spawned").len(), 1);
    assert!(f.executor.store().find_planet(f.home.id).is_some());
}

#[tokio::test]
async fn test_move_to_neighbour() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());

    let event = f.run(&robot, Command::Move { target: f.mine.id }).await;

    assert!(event.success);
    let moved = f.robot(robot.id());
    assert_eq!(moved.planet(), f.mine.id);
    assert_eq!(moved.energy(), 17);
    assert_eq!(f.executor.publisher().on_topic("movement").len(), 1);
}

#[tokio::test]
async fn test_move_to_unconnected_planet_fails() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());
    let far = f
        .executor
        .map()
        .planets()
        .into_iter()
        .find(|p| p.id != f.home.id && p.id != f.mine.id)
        .unwrap();

    let event = f.run(&robot, Command::Move { target: far.id }).await;

    assert!(!event.success);
    assert_eq!(reason(&event), "TargetOutOfReach");
    assert_eq!(f.robot(robot.id()).energy(), 20);
}

#[tokio::test]
async fn test_blocked_planet_keeps_robot_but_spends_energy() {
    let mut f = fixture();
    let blocker = f.spawn(PlayerId::new());
    let runner = f.spawn(PlayerId::new());

    let blocked = f.run(&blocker, Command::Block).await;
    assert!(blocked.success);
    assert_eq!(f.robot(blocker.id()).energy(), 16);
    assert!(f.executor.store().find_planet(f.home.id).unwrap().blocked);

    let event = f.run(&runner, Command::Move { target: f.mine.id }).await;
    assert!(!event.success);
    assert_eq!(reason(&event), "PlanetBlocked");
    let runner_now = f.robot(runner.id());
    assert_eq!(runner_now.planet(), f.home.id);
    assert_eq!(runner_now.energy(), 17);

    f.executor.end_round().unwrap();
    assert!(!f.executor.store().find_planet(f.home.id).unwrap().blocked);

    let event = f.run(&runner, Command::Move { target: f.mine.id }).await;
    assert!(event.success);
    assert_eq!(f.robot(runner.id()).energy(), 14);
}

#[tokio::test]
async fn test_foreign_robot_is_rejected() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());

    let envelope = CommandEnvelope::new(PlayerId::new(), robot.id(), Command::Regenerate);
    let event = f.executor.execute(envelope).await;

    assert!(!event.success);
    assert_eq!(reason(&event), "PlayerMismatch");
}

#[tokio::test]
async fn test_attack_persists_both_robots() {
    let mut f = fixture();
    let attacker = f.spawn(PlayerId::new());
    let defender = f.spawn(PlayerId::new());

    let event = f.run(&attacker, Command::Attack { target: defender.id() }).await;

    assert!(event.success);
    assert_eq!(f.robot(attacker.id()).energy(), 19);
    assert_eq!(f.robot(defender.id()).health(), 9);
    match event.payload {
        EventPayload::Fighting {
            remaining_defender_health,
            defender_destroyed,
            ..
        } => {
            assert_eq!(remaining_defender_health, 9);
            assert!(!defender_destroyed);
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[tokio::test]
async fn test_dead_robot_cannot_act() {
    let mut f = fixture();
    let attacker = f.spawn(PlayerId::new());
    let defender = f.spawn(PlayerId::new());
    f.executor.grant_item(attacker.id(), ItemType::Rocket).unwrap();
    f.executor.grant_item(attacker.id(), ItemType::Rocket).unwrap();

    for _ in 0..2 {
        let event = f
            .run(
                &attacker,
                Command::UseItem {
                    item: ItemType::Rocket,
                    target: defender.id().0,
                },
            )
            .await;
        assert!(event.success);
    }
    assert!(!f.robot(defender.id()).is_alive());

    let event = f.run(&defender, Command::Regenerate).await;
    assert!(!event.success);
    assert_eq!(reason(&event), "RobotDead");
}

#[tokio::test]
async fn test_mine_takes_from_deposit() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());

    let event = f.run(&robot, Command::Mine).await;

    assert!(event.success);
    let miner = f.robot(robot.id());
    assert_eq!(miner.inventory().storage_usage_for(ResourceType::Coal), 2);
    assert_eq!(miner.energy(), 19);
    assert_eq!(f.executor.map().deposit(f.home.id), 98);
}

#[tokio::test]
async fn test_mine_above_mining_level_fails() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());
    f.run(&robot, Command::Move { target: f.mine.id }).await;

    let event = f.run(&robot, Command::Mine).await;

    assert!(!event.success);
    assert_eq!(reason(&event), "CannotMine");

    f.executor.upgrade(robot.id(), UpgradeType::Mining, 1).unwrap();
    let event = f.run(&robot, Command::Mine).await;
    assert!(event.success);
    assert_eq!(
        f.robot(robot.id()).inventory().storage_usage_for(ResourceType::Iron),
        2
    );
}

#[tokio::test]
async fn test_use_item_without_item_fails() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());

    let event = f
        .run(
            &robot,
            Command::UseItem {
                item: ItemType::Nuke,
                target: f.home.id.0,
            },
        )
        .await;

    assert!(!event.success);
    assert_eq!(reason(&event), "ItemCountUnderflow");
}

#[tokio::test]
async fn test_repair_swarm_heals_own_robots() {
    let mut f = fixture();
    let player = PlayerId::new();
    let healer = f.spawn(player);
    let friend = f.spawn(player);
    let enemy = f.spawn(PlayerId::new());
    f.executor.upgrade(friend.id(), UpgradeType::Health, 1).unwrap();
    f.executor.grant_item(enemy.id(), ItemType::Rocket).unwrap();
    f.executor.grant_item(healer.id(), ItemType::RepairSwarm).unwrap();

    f.run(
        &enemy,
        Command::UseItem {
            item: ItemType::Rocket,
            target: friend.id().0,
        },
    )
    .await;
    assert_eq!(f.robot(friend.id()).health(), 5);

    let event = f
        .run(
            &healer,
            Command::UseItem {
                item: ItemType::RepairSwarm,
                target: Uuid::nil(),
            },
        )
        .await;

    assert!(event.success);
    assert_eq!(f.robot(friend.id()).health(), 25);
    assert_eq!(f.robot(healer.id()).inventory().item_count(ItemType::RepairSwarm), 0);
    assert_eq!(f.executor.publisher().on_topic("item-repair").len(), 1);
}

#[tokio::test]
async fn test_wormhole_ignores_blocking() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());
    let blocker = f.spawn(PlayerId::new());
    f.executor.grant_item(robot.id(), ItemType::Wormhole).unwrap();
    // the destination must be known to the store
    f.executor.spawn(PlayerId::new(), f.mine.clone());
    assert!(f.run(&blocker, Command::Block).await.success);

    let event = f
        .run(
            &robot,
            Command::UseItem {
                item: ItemType::Wormhole,
                target: f.mine.id.0,
            },
        )
        .await;

    assert!(event.success);
    let moved = f.robot(robot.id());
    assert_eq!(moved.planet(), f.mine.id);
    assert_eq!(moved.energy(), 20);
}

#[tokio::test]
async fn test_end_round_redistributes_loot() {
    let mut f = fixture();
    let winner = f.spawn(PlayerId::new());
    let loser = f.spawn(PlayerId::new());
    f.executor
        .grant_resource(loser.id(), ResourceType::Gem, 6)
        .unwrap();
    f.executor.grant_item(winner.id(), ItemType::Rocket).unwrap();
    f.executor.grant_item(winner.id(), ItemType::Rocket).unwrap();
    for _ in 0..2 {
        f.run(
            &winner,
            Command::UseItem {
                item: ItemType::Rocket,
                target: loser.id().0,
            },
        )
        .await;
    }

    let reports = f.executor.end_round().unwrap();

    assert_eq!(reports.len(), 1);
    let (planet, report) = &reports[0];
    assert_eq!(*planet, f.home.id);
    assert_eq!(report.destroyed, vec![loser.id()]);
    assert_eq!(report.received_by(winner.id(), ResourceType::Gem), 6);

    assert!(f.executor.store().find(loser.id()).is_none());
    assert_eq!(
        f.robot(winner.id()).inventory().storage_usage_for(ResourceType::Gem),
        6
    );
    let publisher = f.executor.publisher();
    assert_eq!(publisher.on_topic("robot-destroyed").len(), 1);
    assert_eq!(publisher.on_topic("resource-distribution").len(), 1);

    assert!(f.executor.end_round().unwrap().is_empty());
}

/// Map that reports more mined resources than were asked for
struct OverdeliveringMap(StaticMap);

impl PlanetMap for OverdeliveringMap {
    fn route(&self, from: PlanetId, to: PlanetId) -> impl Future<Output = Result<Route>> + Send {
        self.0.route(from, to)
    }

    fn mine(
        &self,
        planet: PlanetId,
        resource: ResourceType,
        amount: u32,
    ) -> impl Future<Output = Result<u32>> + Send {
        let mined = self.0.mine(planet, resource, amount);
        async move { mined.await.map(|m| m + 50) }
    }
}

#[tokio::test]
async fn test_mine_never_stores_more_than_requested() {
    let home = Planet::new(PlanetId::new()).with_resource(ResourceType::Coal);
    let map = StaticMap::new();
    map.add_planet(home.clone(), 1, 100);
    let mut executor = CommandExecutor::new(
        InMemoryStore::new(),
        OverdeliveringMap(map),
        InMemoryPublisher::new(),
        &ServiceConfig::default(),
    );
    let player = PlayerId::new();
    let robot = executor.spawn(player, home);
    executor
        .grant_resource(robot.id(), ResourceType::Coal, 19)
        .unwrap();

    let event = executor
        .execute(CommandEnvelope::new(player, robot.id(), Command::Mine))
        .await;

    assert!(event.success);
    let miner = executor.store().find(robot.id()).unwrap();
    assert_eq!(miner.inventory().used_storage(), 20);
    assert_eq!(miner.energy(), 19);
}

#[tokio::test]
async fn test_restore_hooks_refill_living_robots() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());
    let enemy = f.spawn(PlayerId::new());
    f.executor.grant_item(enemy.id(), ItemType::Rocket).unwrap();
    f.run(
        &enemy,
        Command::UseItem {
            item: ItemType::Rocket,
            target: robot.id().0,
        },
    )
    .await;
    f.run(&robot, Command::Move { target: f.mine.id }).await;

    f.executor.restore_health(robot.id()).unwrap();
    f.executor.restore_energy(robot.id()).unwrap();

    let restored = f.robot(robot.id());
    assert_eq!(restored.health(), restored.max_health());
    assert_eq!(restored.energy(), restored.max_energy());
}

#[tokio::test]
async fn test_restore_rejects_destroyed_robot() {
    let mut f = fixture();
    let robot = f.spawn(PlayerId::new());
    let enemy = f.spawn(PlayerId::new());
    f.executor.grant_item(enemy.id(), ItemType::Nuke).unwrap();
    f.run(
        &enemy,
        Command::UseItem {
            item: ItemType::Nuke,
            target: f.home.id.0,
        },
    )
    .await;

    let result = f.executor.restore_health(robot.id());
    assert!(matches!(result, Err(GameError::RobotDead(_))));
    assert!(!f.robot(robot.id()).is_alive());
}
