//! Attack resolution - melee, ranged and firearm attacks
//!
//! Every attacker rolls one open-ended check: AV = effective AS + roll, and
//! SV = AV - TV. A negative SV is a miss. On a hit the location comes from a
//! d24 draw, and melee or thrown attacks add a free Physicality check whose
//! skill-bonus band raises the final SV.

mod firearm;
mod melee;
mod ranged;

pub use firearm::{
    resolve_firearm_attack, resolve_firearm_attack_with_dice, FireMode, FirearmAttackRequest,
    FirearmAttackResolver, FirearmAttackResult, FirearmVolley, ShotResult, VolleyOutcome,
};
pub use melee::{
    resolve_melee_attack, resolve_melee_attack_with_dice, resolve_melee_attack_with_tv,
    resolve_melee_attack_with_tv_and_dice, AttackRequest, AttackResolver, AttackResult, MeleeHit,
};
pub use ranged::{
    resolve_ranged_attack, resolve_ranged_attack_with_dice, RangedAttackRequest,
    RangedAttackResolver, RangedAttackResult, RangedHit, RangedRoll,
};

use crate::config::{ActionConstants, CheckConstants};
use crate::dice::RandomSource;
use gear_core::HitLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use tables_core::{location_for_roll, skill_bonus, SkillBonus, HIT_LOCATION_SIDES};

/// The attacker's roll against a target value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    /// AS after every modifier
    pub effective_as: i32,
    pub roll: i32,
    /// Attack value: effective AS + roll
    pub av: i32,
    /// Target value
    pub tv: i32,
    /// Success value: AV - TV
    pub sv: i32,
}

impl AttackRoll {
    pub fn new(effective_as: i32, roll: i32, tv: i32) -> Self {
        let av = effective_as + roll;
        AttackRoll {
            effective_as,
            roll,
            av,
            tv,
            sv: av - tv,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.sv >= 0
    }
}

impl fmt::Display for AttackRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AV {} (AS {} + roll {}) vs TV {} = SV {}",
            self.av, self.effective_as, self.roll, self.tv, self.sv
        )
    }
}

/// The free Physicality check rolled on a melee or thrown hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalityCheck {
    pub ability_score: i32,
    pub roll: i32,
    pub total: i32,
    /// Result value: total - Physicality TV
    pub rv: i32,
    pub bonus: SkillBonus,
}

/// Where a hit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRoll {
    pub roll: i32,
    pub location: HitLocation,
}

pub(crate) fn roll_location(dice: &mut impl RandomSource) -> LocationRoll {
    let roll = dice.roll_sum(1, HIT_LOCATION_SIDES);
    LocationRoll {
        roll,
        location: location_for_roll(roll),
    }
}

pub(crate) fn roll_physicality(
    ability_score: i32,
    checks: &CheckConstants,
    dice: &mut impl RandomSource,
) -> PhysicalityCheck {
    let roll = dice.roll_open_ended();
    let total = ability_score + roll;
    let rv = total - checks.physicality_tv;
    PhysicalityCheck {
        ability_score,
        roll,
        total,
        rv,
        bonus: skill_bonus(rv),
    }
}

/// Common AS adjustments from the acting character's round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionModifiers {
    /// Actions already taken this round
    #[serde(default)]
    pub actions_this_round: u32,
    /// Action points spent boosting the roll (+1 AS each)
    #[serde(default)]
    pub ap_boost: i32,
    /// Fatigue spent boosting the roll (+1 AS each)
    #[serde(default)]
    pub fat_boost: i32,
    /// Wounds, effects and anything else the caller folds in
    #[serde(default)]
    pub other: i32,
}

impl ActionModifiers {
    pub fn total(&self, actions: &ActionConstants) -> i32 {
        let penalty = if self.actions_this_round > 0 {
            actions.multiple_action_penalty
        } else {
            0
        };
        self.ap_boost + self.fat_boost + self.other - penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multiple_action_penalty_not_cumulative() {
        let actions = ActionConstants::default();
        let first = ActionModifiers::default();
        let second = ActionModifiers {
            actions_this_round: 1,
            ..Default::default()
        };
        let fourth = ActionModifiers {
            actions_this_round: 3,
            ..Default::default()
        };
        assert_eq!(first.total(&actions), 0);
        assert_eq!(second.total(&actions), -1);
        assert_eq!(fourth.total(&actions), -1);
    }

    #[test]
    fn test_boosts_stack() {
        let mods = ActionModifiers {
            actions_this_round: 1,
            ap_boost: 2,
            fat_boost: 1,
            other: -3,
        };
        assert_eq!(mods.total(&ActionConstants::default()), -1);
    }

    proptest! {
        #[test]
        fn prop_sv_is_av_minus_tv(as_ in -10i32..30, roll in -12i32..12, tv in -5i32..30) {
            let r = AttackRoll::new(as_, roll, tv);
            prop_assert_eq!(r.sv, r.av - r.tv);
            prop_assert_eq!(r.is_hit(), r.sv >= 0);
        }
    }
}
