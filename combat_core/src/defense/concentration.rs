//! Concentration checks for defenders holding a concentration effect

use crate::config::ConcentrationConstants;
use crate::dice::RandomSource;
use serde::{Deserialize, Serialize};

/// The defender-side state a concentration check reads and breaks.
///
/// Implemented by whatever owns the defender's status effects; this crate
/// only queries it and reports a break.
pub trait Concentration {
    fn is_concentrating(&self) -> bool;
    /// Focus AS, `None` when the defender has no Focus skill
    fn focus_as(&self) -> Option<i32>;
    /// Fatigue or vitality exhausted
    fn is_incapacitated(&self) -> bool;
    fn break_concentration(&mut self, reason: &str);
}

/// Plain in-memory concentration state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationState {
    pub concentrating: bool,
    #[serde(default)]
    pub focus_as: Option<i32>,
    #[serde(default)]
    pub incapacitated: bool,
    /// Why concentration last broke
    #[serde(default)]
    pub broken_reason: Option<String>,
}

impl ConcentrationState {
    pub fn concentrating(focus_as: Option<i32>) -> Self {
        ConcentrationState {
            concentrating: true,
            focus_as,
            ..Default::default()
        }
    }

    pub fn incapacitated(mut self) -> Self {
        self.incapacitated = true;
        self
    }
}

impl Concentration for ConcentrationState {
    fn is_concentrating(&self) -> bool {
        self.concentrating
    }

    fn focus_as(&self) -> Option<i32> {
        self.focus_as
    }

    fn is_incapacitated(&self) -> bool {
        self.incapacitated
    }

    fn break_concentration(&mut self, reason: &str) {
        self.concentrating = false;
        self.broken_reason = Some(reason.to_string());
    }
}

/// The attack a concentrating defender is about to suffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingAttack {
    /// Attacker's AV, the check's target
    pub av: i32,
    /// Damage about to be dealt
    pub damage: i32,
}

impl IncomingAttack {
    pub fn new(av: i32, damage: i32) -> Self {
        IncomingAttack { av, damage }
    }
}

/// Outcome of a Focus check against an incoming attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationCheck {
    /// `None` when the defender has no Focus skill and failed outright
    pub focus_as: Option<i32>,
    /// Damage penalty, zero or negative
    pub penalty: i32,
    pub roll: Option<i32>,
    pub total: Option<i32>,
    /// Attacker AV the total had to reach
    pub target: i32,
    pub succeeded: bool,
    pub concentration_broken: bool,
}

pub(crate) const BROKEN_NO_FOCUS: &str = "No Focus skill";
pub(crate) const BROKEN_FAILED_CHECK: &str = "Failed concentration check";
pub(crate) const BROKEN_INCAPACITATED: &str = "Incapacitated";

/// Focus AS penalty for the damage about to land: -1 per `damage_per_penalty`
pub fn damage_penalty(damage: i32, constants: &ConcentrationConstants) -> i32 {
    -(damage.max(0) / constants.damage_per_penalty.max(1))
}

pub(crate) fn check_concentration<C: Concentration + ?Sized>(
    incoming: IncomingAttack,
    defender: &mut C,
    constants: &ConcentrationConstants,
    dice: &mut impl RandomSource,
) -> ConcentrationCheck {
    let Some(focus_as) = defender.focus_as() else {
        defender.break_concentration(BROKEN_NO_FOCUS);
        tracing::debug!("concentration lost: no Focus skill");
        return ConcentrationCheck {
            focus_as: None,
            penalty: 0,
            roll: None,
            total: None,
            target: incoming.av,
            succeeded: false,
            concentration_broken: true,
        };
    };

    let penalty = damage_penalty(incoming.damage, constants);
    let roll = dice.roll_open_ended();
    let total = focus_as + penalty + roll;
    let succeeded = total >= incoming.av;

    let broken = if !succeeded {
        defender.break_concentration(BROKEN_FAILED_CHECK);
        true
    } else if defender.is_incapacitated() {
        defender.break_concentration(BROKEN_INCAPACITATED);
        true
    } else {
        false
    };

    tracing::debug!(focus_as, penalty, roll, total, target = incoming.av, succeeded, broken, "concentration check");

    ConcentrationCheck {
        focus_as: Some(focus_as),
        penalty,
        roll: Some(roll),
        total: Some(total),
        target: incoming.av,
        succeeded,
        concentration_broken: broken,
    }
}
