//! Melee attacks

use super::{roll_location, roll_physicality, ActionModifiers, AttackRoll, LocationRoll, PhysicalityCheck};
use crate::config::{constants, CombatConstants};
use crate::dice::{RandomSource, RngDice};
use gear_core::HitLocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use tables_core::{damage_for_sv, DamageOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Weapon skill AS
    pub attacker_as: i32,
    /// Physicality AS used for the free bonus check
    pub physicality_as: i32,
    /// Defender's Dodge AS, for the passive TV
    pub defender_dodge_as: i32,
    #[serde(default)]
    pub modifiers: ActionModifiers,
}

impl AttackRequest {
    pub fn new(attacker_as: i32, physicality_as: i32, defender_dodge_as: i32) -> Self {
        AttackRequest {
            attacker_as,
            physicality_as,
            defender_dodge_as,
            modifiers: ActionModifiers::default(),
        }
    }

    pub fn with_actions_this_round(mut self, actions: u32) -> Self {
        self.modifiers.actions_this_round = actions;
        self
    }

    pub fn with_ap_boost(mut self, ap: i32) -> Self {
        self.modifiers.ap_boost = ap;
        self
    }

    pub fn with_fat_boost(mut self, fat: i32) -> Self {
        self.modifiers.fat_boost = fat;
        self
    }

    pub fn with_other_modifiers(mut self, other: i32) -> Self {
        self.modifiers.other = other;
        self
    }
}

/// Details of a melee hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeleeHit {
    pub attack: AttackRoll,
    pub location: LocationRoll,
    pub physicality: PhysicalityCheck,
    /// Attack SV plus the Physicality SV modifier
    pub final_sv: i32,
    pub damage: DamageOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttackResult {
    Miss(AttackRoll),
    Hit(MeleeHit),
}

impl AttackResult {
    pub fn attack(&self) -> &AttackRoll {
        match self {
            AttackResult::Miss(roll) => roll,
            AttackResult::Hit(hit) => &hit.attack,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, AttackResult::Hit(_))
    }

    pub fn hit_location(&self) -> Option<HitLocation> {
        match self {
            AttackResult::Hit(hit) => Some(hit.location.location),
            AttackResult::Miss(_) => None,
        }
    }

    /// Final SV on a hit
    pub fn final_sv(&self) -> Option<i32> {
        match self {
            AttackResult::Hit(hit) => Some(hit.final_sv),
            AttackResult::Miss(_) => None,
        }
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackResult::Miss(roll) => write!(f, "Miss: {}", roll),
            AttackResult::Hit(hit) => {
                write!(f, "Hit {}: {}", hit.location.location, hit.attack)?;
                if hit.physicality.bonus.sv_modifier != 0 || hit.physicality.bonus.has_penalty() {
                    write!(f, ". Physicality: {}", hit.physicality.bonus)?;
                }
                write!(f, ". Final SV {} -> {}", hit.final_sv, hit.damage)
            }
        }
    }
}

/// Resolves melee attacks
#[derive(Debug, Clone)]
pub struct AttackResolver {
    constants: CombatConstants,
}

impl Default for AttackResolver {
    fn default() -> Self {
        Self::with_constants(constants().clone())
    }
}

impl AttackResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constants(constants: CombatConstants) -> Self {
        AttackResolver { constants }
    }

    pub fn effective_as(&self, request: &AttackRequest) -> i32 {
        request.attacker_as + request.modifiers.total(&self.constants.actions)
    }

    /// Passive defense TV: Dodge AS - 1
    pub fn passive_tv(&self, request: &AttackRequest) -> i32 {
        request.defender_dodge_as - self.constants.defense.passive_offset
    }

    /// Resolve against the defender's passive defense
    pub fn resolve(&self, request: &AttackRequest, dice: &mut impl RandomSource) -> AttackResult {
        self.resolve_with_tv(request, self.passive_tv(request), dice)
    }

    /// Resolve against an explicit TV from an active defense
    pub fn resolve_with_tv(
        &self,
        request: &AttackRequest,
        tv: i32,
        dice: &mut impl RandomSource,
    ) -> AttackResult {
        let attack = AttackRoll::new(self.effective_as(request), dice.roll_open_ended(), tv);
        if !attack.is_hit() {
            tracing::debug!(av = attack.av, tv, sv = attack.sv, "melee miss");
            return AttackResult::Miss(attack);
        }

        let location = roll_location(dice);
        let physicality = roll_physicality(request.physicality_as, &self.constants.checks, dice);
        let final_sv = attack.sv + physicality.bonus.sv_modifier;
        let damage = damage_for_sv(final_sv);

        tracing::debug!(
            av = attack.av,
            tv,
            sv = attack.sv,
            location = %location.location,
            physicality_rv = physicality.rv,
            final_sv,
            "melee hit"
        );

        AttackResult::Hit(MeleeHit {
            attack,
            location,
            physicality,
            final_sv,
            damage,
        })
    }
}

/// Resolve a melee attack against passive defense using thread-local dice
pub fn resolve_melee_attack(request: &AttackRequest) -> AttackResult {
    let mut dice = RngDice::thread_local();
    resolve_melee_attack_with_dice(request, &mut dice)
}

/// Resolve a melee attack against passive defense with provided dice
pub fn resolve_melee_attack_with_dice(
    request: &AttackRequest,
    dice: &mut impl RandomSource,
) -> AttackResult {
    AttackResolver::new().resolve(request, dice)
}

/// Resolve a melee attack against an explicit TV using thread-local dice
pub fn resolve_melee_attack_with_tv(request: &AttackRequest, tv: i32) -> AttackResult {
    let mut dice = RngDice::thread_local();
    resolve_melee_attack_with_tv_and_dice(request, tv, &mut dice)
}

pub fn resolve_melee_attack_with_tv_and_dice(
    request: &AttackRequest,
    tv: i32,
    dice: &mut impl RandomSource,
) -> AttackResult {
    AttackResolver::new().resolve_with_tv(request, tv, dice)
}
