//! Single attack resolution between two robots

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::RobotId;
use crate::robot::state::Robot;

/// Result of one attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub attacker: RobotId,
    pub defender: RobotId,
    pub damage: u32,
    pub attacker_energy: u32,
    pub defender_health: i32,
    pub defender_destroyed: bool,
}

/// Resolve `attacker` hitting `defender`
///
/// Both robots must be alive, distinct and on the same planet. The
/// destroyed defender stays on the planet until loot is redistributed.
pub fn attack(attacker: &mut Robot, defender: &mut Robot) -> Result<AttackOutcome> {
    if !attacker.is_alive() {
        return Err(GameError::RobotDead(attacker.id()));
    }
    if attacker.id() == defender.id() {
        return Err(GameError::TargetInvalid("a robot cannot attack itself".into()));
    }
    if !defender.is_alive() {
        return Err(GameError::TargetInvalid(format!(
            "robot {} is already destroyed",
            defender.id()
        )));
    }
    if attacker.planet() != defender.planet() {
        return Err(GameError::TargetOutOfReach {
            from: attacker.planet(),
            to: defender.planet(),
        });
    }

    attacker.attack(defender)?;

    let outcome = AttackOutcome {
        attacker: attacker.id(),
        defender: defender.id(),
        damage: attacker.attack_damage(),
        attacker_energy: attacker.energy(),
        defender_health: defender.health(),
        defender_destroyed: !defender.is_alive(),
    };
    tracing::debug!(
        attacker = %outcome.attacker,
        defender = %outcome.defender,
        damage = outcome.damage,
        destroyed = outcome.defender_destroyed,
        "attack resolved"
    );
    Ok(outcome)
}
