//! Firearm attacks
//!
//! One open-ended roll per trigger pull. The fire mode decides how many
//! rounds leave the magazine and how the single AV is read: one shot, a
//! burst where each later shot faces a cumulatively higher TV, or a
//! suppressive spray that yields one SV for the GM to apply to every target
//! in the beaten zone. Area-effect weapons or ammunition override the fire
//! mode with a single blast.

use crate::config::{constants, CombatConstants};
use crate::dice::{RandomSource, RngDice};
use gear_core::{AreaEffect, BlastFalloff, RangeCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use tables_core::{base_tv, damage_for_sv, DamageOutcome, RangeConditions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    #[default]
    Single,
    Burst,
    Suppression,
}

impl fmt::Display for FireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireMode::Single => write!(f, "Single"),
            FireMode::Burst => write!(f, "Burst"),
            FireMode::Suppression => write!(f, "Suppression"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirearmAttackRequest {
    /// Firearm skill AS
    pub attacker_as: i32,
    #[serde(default)]
    pub weapon_av_modifier: i32,
    pub range: RangeCategory,
    /// Target conditions raise TV; `attacker_moving` lowers AV instead
    #[serde(default)]
    pub conditions: RangeConditions,
    /// GM adjustment added to the final TV
    #[serde(default)]
    pub tv_adjustment: i32,
    /// Target's active dodge TV. Replaces the base TV when higher, and only
    /// against dodgeable projectiles.
    #[serde(default)]
    pub dodge_tv: Option<i32>,
    #[serde(default)]
    pub fire_mode: FireMode,
    /// Rounds per burst, configured default when absent
    #[serde(default)]
    pub burst_size: Option<i32>,
    /// Rounds per suppressive volley, configured default when absent
    #[serde(default)]
    pub suppressive_rounds: Option<i32>,
    #[serde(default)]
    pub base_sv_modifier: i32,
    pub loaded_ammo: i32,
    #[serde(default)]
    pub ammo_damage_modifier: i32,
    #[serde(default)]
    pub is_dodgeable: bool,
    /// Blast properties when the weapon or its ammunition is area-effect
    #[serde(default)]
    pub area: Option<AreaEffect>,
}

impl FirearmAttackRequest {
    pub fn new(attacker_as: i32, range: RangeCategory, loaded_ammo: i32) -> Self {
        FirearmAttackRequest {
            attacker_as,
            weapon_av_modifier: 0,
            range,
            conditions: RangeConditions::default(),
            tv_adjustment: 0,
            dodge_tv: None,
            fire_mode: FireMode::Single,
            burst_size: None,
            suppressive_rounds: None,
            base_sv_modifier: 0,
            loaded_ammo,
            ammo_damage_modifier: 0,
            is_dodgeable: false,
            area: None,
        }
    }

    pub fn with_fire_mode(mut self, fire_mode: FireMode) -> Self {
        self.fire_mode = fire_mode;
        self
    }

    pub fn with_burst_size(mut self, size: i32) -> Self {
        self.fire_mode = FireMode::Burst;
        self.burst_size = Some(size);
        self
    }

    pub fn with_suppressive_rounds(mut self, rounds: i32) -> Self {
        self.fire_mode = FireMode::Suppression;
        self.suppressive_rounds = Some(rounds);
        self
    }

    pub fn with_conditions(mut self, conditions: RangeConditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_tv_adjustment(mut self, adjustment: i32) -> Self {
        self.tv_adjustment = adjustment;
        self
    }

    pub fn with_dodge_tv(mut self, dodge_tv: i32) -> Self {
        self.dodge_tv = Some(dodge_tv);
        self
    }

    pub fn with_weapon(mut self, av_modifier: i32, base_sv_modifier: i32) -> Self {
        self.weapon_av_modifier = av_modifier;
        self.base_sv_modifier = base_sv_modifier;
        self
    }

    pub fn with_ammo_damage_modifier(mut self, modifier: i32) -> Self {
        self.ammo_damage_modifier = modifier;
        self
    }

    pub fn with_area(mut self, area: AreaEffect) -> Self {
        self.area = Some(area);
        self
    }

    pub fn dodgeable(mut self) -> Self {
        self.is_dodgeable = true;
        self
    }
}

/// One projectile of a volley
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotResult {
    /// 1-based position in the volley
    pub shot_number: i32,
    pub tv: i32,
    pub rv: i32,
    /// SV for damage resolution, present on a hit
    pub sv: Option<i32>,
    /// Table damage for `sv` before any absorption
    pub damage: Option<DamageOutcome>,
}

impl ShotResult {
    pub fn is_hit(&self) -> bool {
        self.sv.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolleyOutcome {
    Single(ShotResult),
    Burst(Vec<ShotResult>),
    /// One SV shared by every target the GM places in the beaten zone
    Suppression { output_sv: Option<i32> },
    Area {
        blast_radius: i32,
        falloff: BlastFalloff,
        /// SV for targets in the blast, reduced by distance at the GM's table
        area_sv: Option<i32>,
        /// SV for the target at the centre
        direct_hit_sv: Option<i32>,
    },
}

/// A trigger pull that actually fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirearmVolley {
    pub fire_mode: FireMode,
    pub is_area: bool,
    /// AS + weapon modifier - moving penalty
    pub av_base: i32,
    pub roll: i32,
    pub av: i32,
    /// Range base TV + target conditions + fire-mode penalty
    pub base_tv: i32,
    /// Dodge TV that beat the base TV
    #[serde(default)]
    pub dodge_tv: Option<i32>,
    pub tv_adjustment: i32,
    pub tv: i32,
    /// AV - TV of the first (or only) shot
    pub rv: i32,
    pub ammo_consumed: i32,
    pub ammo_remaining: i32,
    pub outcome: VolleyOutcome,
}

impl FirearmVolley {
    /// Whether anything connected
    pub fn is_hit(&self) -> bool {
        match &self.outcome {
            VolleyOutcome::Single(shot) => shot.is_hit(),
            VolleyOutcome::Burst(shots) => shots.iter().any(ShotResult::is_hit),
            VolleyOutcome::Suppression { output_sv } => output_sv.is_some(),
            VolleyOutcome::Area { area_sv, .. } => area_sv.is_some(),
        }
    }

    /// Shots that hit, for single and burst fire
    pub fn hits(&self) -> Vec<ShotResult> {
        match &self.outcome {
            VolleyOutcome::Single(shot) if shot.is_hit() => vec![*shot],
            VolleyOutcome::Burst(shots) => shots.iter().copied().filter(ShotResult::is_hit).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirearmAttackResult {
    /// Burst size or suppressive rounds below one; nothing rolled or consumed
    InvalidRoundCount { fire_mode: FireMode, rounds: i32 },
    /// Not enough rounds loaded; nothing was rolled or consumed
    InsufficientAmmo { loaded: i32, required: i32 },
    /// Range band is beyond the weapon's reach; nothing consumed
    OutOfRange,
    Fired(FirearmVolley),
}

impl FirearmAttackResult {
    pub fn volley(&self) -> Option<&FirearmVolley> {
        match self {
            FirearmAttackResult::Fired(volley) => Some(volley),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.volley().is_some_and(FirearmVolley::is_hit)
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FirearmAttackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let volley = match self {
            FirearmAttackResult::InvalidRoundCount { fire_mode, rounds } => {
                return write!(f, "Invalid {} round count: {}", fire_mode, rounds);
            }
            FirearmAttackResult::InsufficientAmmo { loaded, required } => {
                return write!(f, "Insufficient ammo: {} loaded, {} required", loaded, required);
            }
            FirearmAttackResult::OutOfRange => return write!(f, "Target out of range"),
            FirearmAttackResult::Fired(volley) => volley,
        };

        write!(
            f,
            "{}: AV {} (base {} + roll {}) vs TV {} (base {}",
            volley.fire_mode, volley.av, volley.av_base, volley.roll, volley.tv, volley.base_tv
        )?;
        if let Some(dodge) = volley.dodge_tv {
            write!(f, ", dodge {}", dodge)?;
        }
        write!(f, " + adj {}), RV {}. ", volley.tv_adjustment, volley.rv)?;
        match &volley.outcome {
            VolleyOutcome::Single(shot) => match shot.sv {
                Some(sv) => write!(f, "Hit, SV {}", sv)?,
                None => write!(f, "Miss")?,
            },
            VolleyOutcome::Burst(shots) => {
                let hits: Vec<i32> = shots.iter().filter_map(|s| s.sv).collect();
                if hits.is_empty() {
                    write!(f, "All shots missed")?;
                } else {
                    write!(f, "{} of {} hit, SV {:?}", hits.len(), shots.len(), hits)?;
                }
            }
            VolleyOutcome::Suppression { output_sv } => match output_sv {
                Some(sv) => write!(f, "Suppression effective, each target applies SV {}", sv)?,
                None => write!(f, "Suppression failed")?,
            },
            VolleyOutcome::Area {
                blast_radius,
                falloff,
                area_sv,
                direct_hit_sv,
            } => match (area_sv, direct_hit_sv) {
                (Some(area), Some(direct)) => write!(
                    f,
                    "Blast {}m ({} falloff): direct hit SV {}, area SV {}",
                    blast_radius, falloff, direct, area
                )?,
                _ => write!(f, "Blast missed the target area")?,
            },
        }
        write!(f, ". Ammo {} used, {} left", volley.ammo_consumed, volley.ammo_remaining)
    }
}

/// Resolves firearm attacks
#[derive(Debug, Clone)]
pub struct FirearmAttackResolver {
    constants: CombatConstants,
}

impl Default for FirearmAttackResolver {
    fn default() -> Self {
        Self::with_constants(constants().clone())
    }
}

impl FirearmAttackResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constants(constants: CombatConstants) -> Self {
        FirearmAttackResolver { constants }
    }

    /// Rounds the request will consume. Below one only for a malformed
    /// burst size or suppressive round count.
    pub fn ammo_required(&self, request: &FirearmAttackRequest) -> i32 {
        let firearm = &self.constants.firearm;
        if request.area.is_some() {
            return firearm.area_rounds;
        }
        match request.fire_mode {
            FireMode::Single => 1,
            FireMode::Burst => request.burst_size.unwrap_or(firearm.default_burst_size),
            FireMode::Suppression => request
                .suppressive_rounds
                .unwrap_or(firearm.default_suppressive_rounds),
        }
    }

    fn fire_mode_tv_penalty(&self, fire_mode: FireMode) -> i32 {
        match fire_mode {
            FireMode::Single => 0,
            FireMode::Burst => self.constants.firearm.burst_tv_penalty,
            FireMode::Suppression => self.constants.firearm.suppression_tv_penalty,
        }
    }

    pub fn av_base(&self, request: &FirearmAttackRequest) -> i32 {
        let moving = if request.conditions.attacker_moving {
            self.constants.firearm.moving_av_penalty
        } else {
            0
        };
        request.attacker_as + request.weapon_av_modifier - moving
    }

    fn output_sv(request: &FirearmAttackRequest, rv: i32) -> i32 {
        request.base_sv_modifier + rv.div_euclid(2) + request.ammo_damage_modifier
    }

    fn shot(request: &FirearmAttackRequest, shot_number: i32, av: i32, tv: i32) -> ShotResult {
        let rv = av - tv;
        let sv = (rv >= 0).then(|| Self::output_sv(request, rv));
        ShotResult {
            shot_number,
            tv,
            rv,
            sv,
            damage: sv.map(damage_for_sv),
        }
    }

    /// The dodge TV that applies to this request, if it beats `base_tv`
    fn effective_dodge(request: &FirearmAttackRequest, base_tv: i32) -> Option<i32> {
        if !request.is_dodgeable {
            return None;
        }
        request.dodge_tv.filter(|&dodge| dodge > base_tv)
    }

    pub fn resolve(&self, request: &FirearmAttackRequest, dice: &mut impl RandomSource) -> FirearmAttackResult {
        let required = self.ammo_required(request);
        if required < 1 {
            tracing::warn!(mode = %request.fire_mode, rounds = required, "rejected firearm round count");
            return FirearmAttackResult::InvalidRoundCount {
                fire_mode: request.fire_mode,
                rounds: required,
            };
        }
        if request.loaded_ammo < required {
            tracing::debug!(loaded = request.loaded_ammo, required, "insufficient ammo");
            return FirearmAttackResult::InsufficientAmmo {
                loaded: request.loaded_ammo,
                required,
            };
        }

        let Some(range_tv) = base_tv(request.range) else {
            tracing::debug!("firearm target out of range");
            return FirearmAttackResult::OutOfRange;
        };

        let av_base = self.av_base(request);
        let roll = dice.roll_open_ended();
        let av = av_base + roll;
        let base_tv = range_tv
            + request.conditions.target_modifier()
            + self.fire_mode_tv_penalty(request.fire_mode);
        let dodge_tv = Self::effective_dodge(request, base_tv);
        let tv = dodge_tv.unwrap_or(base_tv) + request.tv_adjustment;
        let rv = av - tv;

        let outcome = match (&request.area, request.fire_mode) {
            (Some(area), _) => {
                let area_sv = (rv >= 0).then(|| Self::output_sv(request, rv));
                VolleyOutcome::Area {
                    blast_radius: area.blast_radius,
                    falloff: area.effective_falloff(),
                    area_sv,
                    direct_hit_sv: area_sv.map(|sv| sv + area.direct_hit_bonus),
                }
            }
            (None, FireMode::Single) => VolleyOutcome::Single(Self::shot(request, 1, av, tv)),
            (None, FireMode::Burst) => VolleyOutcome::Burst(
                (1..=required)
                    .map(|k| Self::shot(request, k, av, tv + (k - 1)))
                    .collect(),
            ),
            (None, FireMode::Suppression) => VolleyOutcome::Suppression {
                output_sv: (rv >= 0).then(|| Self::output_sv(request, rv)),
            },
        };

        let volley = FirearmVolley {
            fire_mode: request.fire_mode,
            is_area: request.area.is_some(),
            av_base,
            roll,
            av,
            base_tv,
            dodge_tv,
            tv_adjustment: request.tv_adjustment,
            tv,
            rv,
            ammo_consumed: required,
            ammo_remaining: request.loaded_ammo - required,
            outcome,
        };
        tracing::debug!(
            mode = %volley.fire_mode,
            area = volley.is_area,
            av,
            tv,
            rv,
            hit = volley.is_hit(),
            ammo_remaining = volley.ammo_remaining,
            "firearm attack"
        );
        FirearmAttackResult::Fired(volley)
    }
}

/// Resolve a firearm attack using thread-local dice
pub fn resolve_firearm_attack(request: &FirearmAttackRequest) -> FirearmAttackResult {
    let mut dice = RngDice::thread_local();
    resolve_firearm_attack_with_dice(request, &mut dice)
}

pub fn resolve_firearm_attack_with_dice(
    request: &FirearmAttackRequest,
    dice: &mut impl RandomSource,
) -> FirearmAttackResult {
    FirearmAttackResolver::new().resolve(request, dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ensure_constants_initialized;
    use crate::dice::ScriptedDice;
    use tables_core::CoverType;

    fn setup() -> FirearmAttackResolver {
        ensure_constants_initialized();
        FirearmAttackResolver::new()
    }

    fn fired(result: FirearmAttackResult) -> FirearmVolley {
        match result {
            FirearmAttackResult::Fired(volley) => volley,
            other => panic!("expected a volley, got {other:?}"),
        }
    }

    #[test]
    fn test_single_shot_hit() {
        let resolver = setup();
        // AV 12 + 1 + 2 = 15; TV short 6 + half cover 1 = 7; RV 8 => SV 2 + 4 + 1 = 7
        let request = FirearmAttackRequest::new(12, RangeCategory::Short, 6)
            .with_weapon(1, 2)
            .with_ammo_damage_modifier(1)
            .with_conditions(RangeConditions {
                cover: CoverType::Half,
                ..Default::default()
            });
        let mut dice = ScriptedDice::new().with_open_ended([2]);
        let volley = fired(resolver.resolve(&request, &mut dice));

        assert_eq!((volley.av, volley.tv, volley.rv), (15, 7, 8));
        assert_eq!(volley.ammo_consumed, 1);
        assert_eq!(volley.ammo_remaining, 5);
        let VolleyOutcome::Single(shot) = volley.outcome else {
            panic!("expected single");
        };
        assert_eq!(shot.sv, Some(7));
        assert_eq!(shot.damage, Some(damage_for_sv(7)));
    }

    #[test]
    fn test_single_shot_miss() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(5, RangeCategory::Long, 3);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let result = resolver.resolve(&request, &mut dice);
        assert!(!result.is_hit());
        assert_eq!(result.volley().map(|v| v.ammo_remaining), Some(2));
    }

    #[test]
    fn test_burst_tv_climbs_per_shot() {
        let resolver = setup();
        // TV = short 6 + burst penalty 1 = 7; AV 9 => RVs 2, 1, 0
        let request = FirearmAttackRequest::new(9, RangeCategory::Short, 10).with_burst_size(3);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));

        let VolleyOutcome::Burst(shots) = &volley.outcome else {
            panic!("expected burst");
        };
        let tvs: Vec<i32> = shots.iter().map(|s| s.tv).collect();
        assert_eq!(tvs, vec![7, 8, 9]);
        let svs: Vec<Option<i32>> = shots.iter().map(|s| s.sv).collect();
        assert_eq!(svs, vec![Some(1), Some(0), Some(0)]);
        assert_eq!(volley.ammo_consumed, 3);
        assert_eq!(volley.ammo_remaining, 7);
        assert_eq!(dice.open_ended_calls(), 1);
    }

    #[test]
    fn test_burst_later_shots_can_miss() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(8, RangeCategory::Short, 5).with_burst_size(4);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        // TV 7: RV 1, 0, -1, -2
        let hits = volley.hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.iter().map(|s| s.shot_number).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_default_burst_size_from_constants() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(10, RangeCategory::Medium, 2)
            .with_fire_mode(FireMode::Burst);
        assert_eq!(resolver.ammo_required(&request), 3);
        let mut dice = ScriptedDice::new();
        assert_eq!(
            resolver.resolve(&request, &mut dice),
            FirearmAttackResult::InsufficientAmmo {
                loaded: 2,
                required: 3
            }
        );
        assert_eq!(dice.open_ended_calls(), 0);
    }

    #[test]
    fn test_suppression_shared_sv() {
        let resolver = setup();
        // TV medium 8 + suppression 3 = 11; AV 14 => RV 3 => SV 1
        let request = FirearmAttackRequest::new(14, RangeCategory::Medium, 30).with_suppressive_rounds(12);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        assert_eq!(volley.outcome, VolleyOutcome::Suppression { output_sv: Some(1) });
        assert_eq!(volley.ammo_consumed, 12);
        assert_eq!(volley.ammo_remaining, 18);
    }

    #[test]
    fn test_area_overrides_fire_mode() {
        let resolver = setup();
        let area = AreaEffect::new(5)
            .with_falloff(BlastFalloff::Steep)
            .with_direct_hit_bonus(2);
        let request = FirearmAttackRequest::new(12, RangeCategory::Short, 1)
            .with_burst_size(3)
            .with_weapon(0, 3)
            .with_area(area);
        assert_eq!(resolver.ammo_required(&request), 1);

        // TV 6 + burst 1 = 7; AV 12 => RV 5 => SV 3 + 2 = 5
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        assert!(volley.is_area);
        assert_eq!(
            volley.outcome,
            VolleyOutcome::Area {
                blast_radius: 5,
                falloff: BlastFalloff::Steep,
                area_sv: Some(5),
                direct_hit_sv: Some(7),
            }
        );
        assert_eq!(volley.ammo_remaining, 0);
    }

    #[test]
    fn test_area_miss() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(2, RangeCategory::Extreme, 1).with_area(AreaEffect::new(3));
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let result = resolver.resolve(&request, &mut dice);
        assert!(!result.is_hit());
        assert!(result.summary().contains("missed"));
    }

    #[test]
    fn test_out_of_range_consumes_nothing() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(12, RangeCategory::OutOfRange, 5);
        let mut dice = ScriptedDice::new();
        assert_eq!(resolver.resolve(&request, &mut dice), FirearmAttackResult::OutOfRange);
        assert_eq!(dice.open_ended_calls(), 0);
    }

    #[test]
    fn test_moving_shooter_loses_av_not_tv() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(10, RangeCategory::Short, 1).with_conditions(RangeConditions {
            attacker_moving: true,
            ..Default::default()
        });
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        assert_eq!(volley.av_base, 8);
        assert_eq!(volley.base_tv, 6);
    }

    #[test]
    fn test_gm_adjustment_raises_tv() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(10, RangeCategory::Short, 1).with_tv_adjustment(3);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        assert_eq!(volley.tv, 9);
        assert_eq!(volley.rv, 1);
    }

    #[test]
    fn test_dodge_only_counts_against_dodgeable_projectiles() {
        let resolver = setup();
        let bullet = FirearmAttackRequest::new(10, RangeCategory::Short, 2).with_dodge_tv(11);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&bullet, &mut dice));
        assert_eq!((volley.tv, volley.dodge_tv), (6, None));

        // Dodge 11 beats short range 6
        let arrow = bullet.dodgeable().with_tv_adjustment(1);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&arrow, &mut dice));
        assert_eq!((volley.tv, volley.dodge_tv), (12, Some(11)));
        assert!(!volley.is_hit());
        assert!(FirearmAttackResult::Fired(volley).summary().contains("dodge 11"));
    }

    #[test]
    fn test_weak_dodge_keeps_base_tv() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(10, RangeCategory::Long, 1)
            .dodgeable()
            .with_dodge_tv(7);
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        assert_eq!((volley.tv, volley.dodge_tv), (10, None));
    }

    #[test]
    fn test_non_positive_round_counts_are_rejected() {
        let resolver = setup();
        let cases = [
            (FirearmAttackRequest::new(10, RangeCategory::Short, 5).with_burst_size(-4), FireMode::Burst, -4),
            (FirearmAttackRequest::new(10, RangeCategory::Short, 5).with_burst_size(0), FireMode::Burst, 0),
            (
                FirearmAttackRequest::new(10, RangeCategory::Short, 5).with_suppressive_rounds(-2),
                FireMode::Suppression,
                -2,
            ),
            (
                FirearmAttackRequest::new(10, RangeCategory::Short, 5).with_suppressive_rounds(0),
                FireMode::Suppression,
                0,
            ),
        ];
        for (request, fire_mode, rounds) in cases {
            let mut dice = ScriptedDice::new();
            let result = resolver.resolve(&request, &mut dice);
            assert_eq!(result, FirearmAttackResult::InvalidRoundCount { fire_mode, rounds });
            assert!(result.volley().is_none());
            assert_eq!(dice.open_ended_calls(), 0);
        }
    }

    #[test]
    fn test_area_ignores_malformed_burst_size() {
        let resolver = setup();
        let request = FirearmAttackRequest::new(10, RangeCategory::Short, 1)
            .with_burst_size(0)
            .with_area(AreaEffect::new(3));
        let mut dice = ScriptedDice::new().with_open_ended([0]);
        let volley = fired(resolver.resolve(&request, &mut dice));
        assert_eq!((volley.ammo_consumed, volley.ammo_remaining), (1, 0));
    }
}
