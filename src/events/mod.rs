//! Events announcing the outcome of every command
//!
//! Each command produces exactly one `GameEvent`, successful or not. The
//! topic it goes to is chosen by its `Topic`; topic names come from
//! configuration.

pub mod publisher;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::combat::LootReport;
use crate::core::config::TopicConfig;
use crate::core::types::{PlanetId, PlayerId, RobotId, TransactionId};
use crate::robot::item::{Impact, ItemFamily, ItemType};
use crate::robot::resource::ResourceType;

pub use publisher::{EventPublisher, InMemoryPublisher, TracingPublisher};

/// Event kind, each mapped to one configured topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Movement,
    PlanetBlocked,
    Regeneration,
    Fighting,
    Mining,
    ItemFighting,
    ItemRepair,
    ItemMovement,
    ResourceDistribution,
    RobotDestroyed,
    RobotSpawned,
}

impl Topic {
    /// Topic for using an item of the given family
    pub fn for_item(family: ItemFamily) -> Self {
        match family {
            ItemFamily::Attack => Topic::ItemFighting,
            ItemFamily::Movement => Topic::ItemMovement,
            ItemFamily::Repair => Topic::ItemRepair,
        }
    }

    /// Configured topic name
    pub fn name<'a>(&self, topics: &'a TopicConfig) -> &'a str {
        match self {
            Topic::Movement => &topics.movement,
            Topic::PlanetBlocked => &topics.planet_blocked,
            Topic::Regeneration => &topics.regeneration,
            Topic::Fighting => &topics.fighting,
            Topic::Mining => &topics.mining,
            Topic::ItemFighting => &topics.item_fighting,
            Topic::ItemRepair => &topics.item_repair,
            Topic::ItemMovement => &topics.item_movement,
            Topic::ResourceDistribution => &topics.resource_distribution,
            Topic::RobotDestroyed => &topics.robot_destroyed,
            Topic::RobotSpawned => &topics.robot_spawned,
        }
    }
}

/// Numeric side effects of a command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventPayload {
    #[serde(rename_all = "camelCase")]
    Movement {
        robot: RobotId,
        planet: PlanetId,
        remaining_energy: u32,
    },
    #[serde(rename_all = "camelCase")]
    PlanetBlocked {
        robot: RobotId,
        planet: PlanetId,
        remaining_energy: u32,
    },
    #[serde(rename_all = "camelCase")]
    Regeneration { robot: RobotId, energy: u32 },
    #[serde(rename_all = "camelCase")]
    Fighting {
        attacker: RobotId,
        defender: RobotId,
        remaining_defender_health: i32,
        remaining_energy: u32,
        defender_destroyed: bool,
    },
    #[serde(rename_all = "camelCase")]
    Mining {
        robot: RobotId,
        resource: ResourceType,
        amount: u32,
        used_storage: u32,
        remaining_energy: u32,
    },
    #[serde(rename_all = "camelCase")]
    ItemUsed {
        robot: RobotId,
        item: ItemType,
        remaining_items: u32,
        impacts: Vec<Impact>,
    },
    #[serde(rename_all = "camelCase")]
    ResourceDistribution { planet: PlanetId, report: LootReport },
    #[serde(rename_all = "camelCase")]
    RobotDestroyed {
        robot: RobotId,
        player: PlayerId,
        planet: PlanetId,
    },
    #[serde(rename_all = "camelCase")]
    RobotSpawned {
        robot: RobotId,
        player: PlayerId,
        planet: PlanetId,
    },
    /// A command that failed; `reason` is the error kind
    #[serde(rename_all = "camelCase")]
    Rejected {
        robot: Option<RobotId>,
        reason: String,
    },
}

/// One structured event, ready to publish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: Uuid,
    pub transaction_id: TransactionId,
    pub topic: Topic,
    pub success: bool,
    pub message: String,
    pub payload: EventPayload,
}

impl GameEvent {
    pub fn success(
        transaction_id: TransactionId,
        topic: Topic,
        message: impl Into<String>,
        payload: EventPayload,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            topic,
            success: true,
            message: message.into(),
            payload,
        }
    }

    pub fn failure(
        transaction_id: TransactionId,
        topic: Topic,
        robot: Option<RobotId>,
        error: &crate::core::error::GameError,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            topic,
            success: false,
            message: error.to_string(),
            payload: EventPayload::Rejected {
                robot,
                reason: error.kind().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GameError;

    #[test]
    fn test_topic_names_from_config() {
        let mut topics = TopicConfig::default();
        topics.fighting = "robot-fights".into();
        assert_eq!(Topic::Fighting.name(&topics), "robot-fights");
        assert_eq!(Topic::ItemRepair.name(&topics), "item-repair");
    }

    #[test]
    fn test_item_topics() {
        assert_eq!(Topic::for_item(ItemType::Nuke.family()), Topic::ItemFighting);
        assert_eq!(Topic::for_item(ItemType::Wormhole.family()), Topic::ItemMovement);
        assert_eq!(Topic::for_item(ItemType::RepairSwarm.family()), Topic::ItemRepair);
    }

    #[test]
    fn test_failure_event_carries_error_kind() {
        let error = GameError::PlanetBlocked(PlanetId::new());
        let event = GameEvent::failure(TransactionId::new(), Topic::Movement, None, &error);
        assert!(!event.success);
        match event.payload {
            EventPayload::Rejected { reason, .. } => assert_eq!(reason, "PlanetBlocked"),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_event_json_shape() {
        let robot = RobotId::new();
        let event = GameEvent::success(
            TransactionId::new(),
            Topic::Regeneration,
            "energy regenerated",
            EventPayload::Regeneration { robot, energy: 14 },
        );
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["topic"], "regeneration");
        assert_eq!(json["success"], true);
        assert_eq!(json["payload"]["type"], "regeneration");
        assert_eq!(json["payload"]["energy"], 14);
        assert!(json["transactionId"].is_string());
    }
}
