//! Bow, crossbow and thrown-weapon attacks

use super::{roll_location, roll_physicality, ActionModifiers, AttackRoll, LocationRoll, PhysicalityCheck};
use crate::config::{constants, CombatConstants};
use crate::dice::{RandomSource, RngDice};
use gear_core::{DamageClass, DamageType, RangeCategory, WeaponRanges};
use serde::{Deserialize, Serialize};
use std::fmt;
use tables_core::{base_tv, damage_for_sv, DamageOutcome, RangeConditions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedAttackRequest {
    pub attacker_as: i32,
    /// Only used by thrown weapons
    pub physicality_as: i32,
    pub ranges: WeaponRanges,
    /// Distance to the target as a range value
    pub distance: i32,
    #[serde(default)]
    pub is_thrown: bool,
    #[serde(default = "default_ranged_damage_type")]
    pub damage_type: DamageType,
    #[serde(default)]
    pub damage_class: DamageClass,
    #[serde(default)]
    pub conditions: RangeConditions,
    #[serde(default)]
    pub modifiers: ActionModifiers,
    /// Aimed during the previous round
    #[serde(default)]
    pub has_aim_bonus: bool,
}

fn default_ranged_damage_type() -> DamageType {
    DamageType::Projectile
}

impl RangedAttackRequest {
    pub fn new(attacker_as: i32, ranges: WeaponRanges, distance: i32) -> Self {
        RangedAttackRequest {
            attacker_as,
            physicality_as: 10,
            ranges,
            distance,
            is_thrown: false,
            damage_type: DamageType::Projectile,
            damage_class: DamageClass::ONE,
            conditions: RangeConditions::default(),
            modifiers: ActionModifiers::default(),
            has_aim_bonus: false,
        }
    }

    /// A thrown weapon, which adds the Physicality check on a hit
    pub fn thrown(attacker_as: i32, physicality_as: i32, ranges: WeaponRanges, distance: i32) -> Self {
        RangedAttackRequest {
            physicality_as,
            is_thrown: true,
            ..Self::new(attacker_as, ranges, distance)
        }
    }

    pub fn with_conditions(mut self, conditions: RangeConditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ActionModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_aim_bonus(mut self) -> Self {
        self.has_aim_bonus = true;
        self
    }

    pub fn with_damage(mut self, damage_type: DamageType, damage_class: DamageClass) -> Self {
        self.damage_type = damage_type;
        self.damage_class = damage_class;
        self
    }

    pub fn range_category(&self) -> RangeCategory {
        self.ranges.category(self.distance)
    }
}

/// The roll of a ranged attack that was in range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedRoll {
    pub attack: AttackRoll,
    pub range: RangeCategory,
    pub distance: i32,
    pub base_tv: i32,
    /// TV above the range base, from conditions or an explicit TV
    pub tv_modifier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedHit {
    pub roll: RangedRoll,
    pub location: LocationRoll,
    /// Present for thrown weapons only
    pub physicality: Option<PhysicalityCheck>,
    pub final_sv: i32,
    pub damage_type: DamageType,
    pub damage_class: DamageClass,
    pub damage: DamageOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RangedAttackResult {
    /// Target beyond the weapon's extreme range; nothing was rolled
    OutOfRange { distance: i32 },
    Miss(RangedRoll),
    Hit(RangedHit),
}

impl RangedAttackResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, RangedAttackResult::Hit(_))
    }

    pub fn roll(&self) -> Option<&RangedRoll> {
        match self {
            RangedAttackResult::OutOfRange { .. } => None,
            RangedAttackResult::Miss(roll) => Some(roll),
            RangedAttackResult::Hit(hit) => Some(&hit.roll),
        }
    }

    pub fn final_sv(&self) -> Option<i32> {
        match self {
            RangedAttackResult::Hit(hit) => Some(hit.final_sv),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RangedAttackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangedAttackResult::OutOfRange { distance } => {
                write!(f, "Out of range (range value {})", distance)
            }
            RangedAttackResult::Miss(roll) => {
                write!(f, "Miss at {} range: {}", roll.range, roll.attack)
            }
            RangedAttackResult::Hit(hit) => {
                write!(f, "Hit {} at {} range: {}", hit.location.location, hit.roll.range, hit.roll.attack)?;
                if let Some(phys) = &hit.physicality {
                    write!(f, ". Physicality: {}", phys.bonus)?;
                }
                write!(f, ". Final SV {} -> {}", hit.final_sv, hit.damage)
            }
        }
    }
}

/// Resolves bow, crossbow and thrown attacks
#[derive(Debug, Clone)]
pub struct RangedAttackResolver {
    constants: CombatConstants,
}

impl Default for RangedAttackResolver {
    fn default() -> Self {
        Self::with_constants(constants().clone())
    }
}

impl RangedAttackResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constants(constants: CombatConstants) -> Self {
        RangedAttackResolver { constants }
    }

    pub fn effective_as(&self, request: &RangedAttackRequest) -> i32 {
        let aim = if request.has_aim_bonus {
            self.constants.actions.aim_bonus
        } else {
            0
        };
        request.attacker_as + request.modifiers.total(&self.constants.actions) + aim
    }

    /// Resolve with TV = range base TV + situational modifiers
    pub fn resolve(&self, request: &RangedAttackRequest, dice: &mut impl RandomSource) -> RangedAttackResult {
        let modifier = request.conditions.total_modifier();
        self.resolve_inner(request, |base| base + modifier, dice)
    }

    /// Resolve against an explicit TV (e.g. an active dodge)
    pub fn resolve_with_tv(
        &self,
        request: &RangedAttackRequest,
        tv: i32,
        dice: &mut impl RandomSource,
    ) -> RangedAttackResult {
        self.resolve_inner(request, |_| tv, dice)
    }

    fn resolve_inner(
        &self,
        request: &RangedAttackRequest,
        tv_for_base: impl FnOnce(i32) -> i32,
        dice: &mut impl RandomSource,
    ) -> RangedAttackResult {
        let range = request.range_category();
        let Some(base) = base_tv(range) else {
            tracing::debug!(distance = request.distance, "ranged attack out of range");
            return RangedAttackResult::OutOfRange {
                distance: request.distance,
            };
        };
        let tv = tv_for_base(base);

        let attack = AttackRoll::new(self.effective_as(request), dice.roll_open_ended(), tv);
        let roll = RangedRoll {
            attack,
            range,
            distance: request.distance,
            base_tv: base,
            tv_modifier: tv - base,
        };
        if !attack.is_hit() {
            tracing::debug!(av = attack.av, tv, %range, "ranged miss");
            return RangedAttackResult::Miss(roll);
        }

        let location = roll_location(dice);
        let physicality = request
            .is_thrown
            .then(|| roll_physicality(request.physicality_as, &self.constants.checks, dice));
        let final_sv = attack.sv + physicality.map_or(0, |p| p.bonus.sv_modifier);

        tracing::debug!(
            av = attack.av,
            tv,
            %range,
            location = %location.location,
            thrown = request.is_thrown,
            final_sv,
            "ranged hit"
        );

        RangedAttackResult::Hit(RangedHit {
            roll,
            location,
            physicality,
            final_sv,
            damage_type: request.damage_type,
            damage_class: request.damage_class,
            damage: damage_for_sv(final_sv),
        })
    }
}

/// Resolve a ranged attack using thread-local dice
pub fn resolve_ranged_attack(request: &RangedAttackRequest) -> RangedAttackResult {
    let mut dice = RngDice::thread_local();
    resolve_ranged_attack_with_dice(request, &mut dice)
}

pub fn resolve_ranged_attack_with_dice(
    request: &RangedAttackRequest,
    dice: &mut impl RandomSource,
) -> RangedAttackResult {
    RangedAttackResolver::new().resolve(request, dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ensure_constants_initialized;
    use crate::dice::ScriptedDice;
    use gear_core::HitLocation;
    use tables_core::{CoverType, TargetSize};

    fn setup() -> RangedAttackResolver {
        ensure_constants_initialized();
        RangedAttackResolver::new()
    }

    #[test]
    fn test_out_of_range_rolls_nothing() {
        let resolver = setup();
        let mut dice = ScriptedDice::new();
        let request = RangedAttackRequest::new(14, WeaponRanges::SHORTBOW, 10);
        let result = resolver.resolve(&request, &mut dice);
        assert_eq!(result, RangedAttackResult::OutOfRange { distance: 10 });
        assert_eq!(dice.open_ended_calls(), 0);
        assert_eq!(dice.sum_calls(), 0);
    }

    #[test]
    fn test_tv_from_range_and_conditions() {
        let resolver = setup();
        // Medium range (base 8) + moving (2) + small (1) + half cover (1) = 12
        let request = RangedAttackRequest::new(12, WeaponRanges::SHORTBOW, 5).with_conditions(
            RangeConditions {
                target_moving: true,
                target_size: TargetSize::Small,
                cover: CoverType::Half,
                ..Default::default()
            },
        );
        let mut dice = ScriptedDice::new().with_open_ended([1]).with_sums([13]);
        let result = resolver.resolve(&request, &mut dice);

        let RangedAttackResult::Hit(hit) = result else {
            panic!("expected hit, got {result:?}");
        };
        assert_eq!(hit.roll.range, RangeCategory::Medium);
        assert_eq!(hit.roll.base_tv, 8);
        assert_eq!(hit.roll.tv_modifier, 4);
        assert_eq!(hit.roll.attack.sv, 1);
        assert_eq!(hit.location.location, HitLocation::LeftArm);
        assert!(hit.physicality.is_none());
        assert_eq!(hit.final_sv, 1);
        assert_eq!(hit.damage_type, DamageType::Projectile);
    }

    #[test]
    fn test_non_thrown_uses_single_check() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([2, 4]).with_sums([3]);
        let result = resolver.resolve(&RangedAttackRequest::new(10, WeaponRanges::LONGBOW, 2), &mut dice);
        assert!(result.is_hit());
        assert_eq!(dice.open_ended_calls(), 1);
        assert_eq!(dice.remaining(), (0, 1));
    }

    #[test]
    fn test_thrown_adds_physicality() {
        let resolver = setup();
        // Short range base 6; AV 9 + 0 = 9 => SV 3; Physicality 12 + 0 - 8 = RV 4 => +2
        let request = RangedAttackRequest::thrown(9, 12, WeaponRanges::THROWN_DAGGER, 1);
        let mut dice = ScriptedDice::new().with_open_ended([0, 0]).with_sums([24]);
        let result = resolver.resolve(&request, &mut dice);

        let RangedAttackResult::Hit(hit) = result else {
            panic!("expected hit");
        };
        assert_eq!(hit.roll.attack.sv, 3);
        assert_eq!(hit.physicality.map(|p| p.rv), Some(4));
        assert_eq!(hit.final_sv, 5);
        assert_eq!(hit.location.location, HitLocation::RightLeg);
    }

    #[test]
    fn test_explicit_tv_reports_backcomputed_modifier() {
        let resolver = setup();
        let request = RangedAttackRequest::new(10, WeaponRanges::CROSSBOW, 6);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let result = resolver.resolve_with_tv(&request, 11, &mut dice);

        let RangedAttackResult::Miss(roll) = result else {
            panic!("expected miss");
        };
        // Crossbow medium band: base TV 8
        assert_eq!(roll.base_tv, 8);
        assert_eq!(roll.tv_modifier, 3);
        assert_eq!(roll.attack.sv, -1);
    }

    #[test]
    fn test_aim_and_action_modifiers() {
        let resolver = setup();
        let request = RangedAttackRequest::new(10, WeaponRanges::SHORTBOW, 1)
            .with_aim_bonus()
            .with_modifiers(ActionModifiers {
                actions_this_round: 1,
                ap_boost: 1,
                ..Default::default()
            });
        assert_eq!(resolver.effective_as(&request), 12);
    }

    #[test]
    fn test_summary_mentions_range() {
        let resolver = setup();
        let mut dice = ScriptedDice::new().with_open_ended([-3]);
        let result = resolver.resolve(&RangedAttackRequest::new(8, WeaponRanges::LONGBOW, 9), &mut dice);
        assert!(result.summary().contains("Extreme"));
        assert!(resolve_ranged_attack(&RangedAttackRequest::new(8, WeaponRanges::LONGBOW, 11))
            .summary()
            .starts_with("Out of range"));
    }
}
