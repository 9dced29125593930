//! Damage resolution - run a hit's SV through shield and armor
//!
//! The defender rolls one free armor-skill check per attack. A successful
//! shield block absorbs first, then every intact armor piece covering the
//! struck location in ascending layer order. The armor-skill bonus only
//! applies at the first armor layer. Whatever SV gets through is looked up on
//! the damage table.
//!
//! Resolvers work on a clone of the defender's equipment and hand the worn
//! copy back in the result; the caller decides when to write it back.

mod absorption;
mod multi;

pub use absorption::{scale_for_class, shield_block_bonus, AbsorberKind, AbsorptionRecord};
pub use multi::{
    resolve_multi_damage, resolve_multi_damage_with_dice, MultiDamageRequest,
    MultiDamageResolutionResult,
};

use crate::config::{constants, CombatConstants};
use crate::dice::{RandomSource, RngDice};
use absorption::{absorb_layer, HitProfile};
use gear_core::{Absorber, DamageClass, DamageType, DefenderEquipment, HitLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tables_core::{damage_for_sv, skill_bonus, DamageOutcome, SkillBonus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRequest {
    pub incoming_sv: i32,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub damage_class: DamageClass,
    pub hit_location: HitLocation,
    /// Defender's armor skill AS for the free check
    pub defender_armor_as: i32,
    /// RV of a successful shield block this attack
    #[serde(default)]
    pub shield_block_rv: Option<i32>,
    #[serde(default)]
    pub equipment: DefenderEquipment,
    #[serde(default)]
    pub ap_offset: i32,
    #[serde(default)]
    pub sv_max: Option<i32>,
}

impl DamageRequest {
    pub fn new(
        incoming_sv: i32,
        damage_type: DamageType,
        hit_location: HitLocation,
        defender_armor_as: i32,
    ) -> Self {
        DamageRequest {
            incoming_sv,
            damage_type,
            damage_class: DamageClass::ONE,
            hit_location,
            defender_armor_as,
            shield_block_rv: None,
            equipment: DefenderEquipment::default(),
            ap_offset: 0,
            sv_max: None,
        }
    }

    pub fn with_damage_class(mut self, damage_class: DamageClass) -> Self {
        self.damage_class = damage_class;
        self
    }

    pub fn with_shield_block_rv(mut self, rv: i32) -> Self {
        self.shield_block_rv = Some(rv);
        self
    }

    pub fn with_equipment(mut self, equipment: DefenderEquipment) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_ap_offset(mut self, ap_offset: i32) -> Self {
        self.ap_offset = ap_offset;
        self
    }

    pub fn with_sv_max(mut self, sv_max: i32) -> Self {
        self.sv_max = Some(sv_max);
        self
    }
}

/// The defender's free armor-skill check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorSkillCheck {
    pub ability_score: i32,
    pub roll: i32,
    pub total: i32,
    pub rv: i32,
    pub bonus: SkillBonus,
    /// Added to the first armor layer's absorption
    pub absorption_bonus: i32,
}

/// What got past the defender's protection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PenetrationOutcome {
    /// Nothing got through
    FullyAbsorbed,
    Damage { sv: i32, damage: DamageOutcome },
}

impl PenetrationOutcome {
    fn for_sv(penetrating_sv: i32) -> Self {
        if penetrating_sv > 0 {
            PenetrationOutcome::Damage {
                sv: penetrating_sv,
                damage: damage_for_sv(penetrating_sv),
            }
        } else {
            PenetrationOutcome::FullyAbsorbed
        }
    }

    pub fn damage(&self) -> DamageOutcome {
        match self {
            PenetrationOutcome::FullyAbsorbed => DamageOutcome::NONE,
            PenetrationOutcome::Damage { damage, .. } => *damage,
        }
    }
}

/// One damage type's pass through the defender's protection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedResolution {
    pub damage_type: DamageType,
    /// SV entering the first layer
    pub incoming_sv: i32,
    pub ap_offset: i32,
    pub sv_max: Option<i32>,
    pub absorption: Vec<AbsorptionRecord>,
    pub total_absorbed: i32,
    pub penetrating_sv: i32,
    pub outcome: PenetrationOutcome,
}

impl TypedResolution {
    pub fn damage(&self) -> DamageOutcome {
        self.outcome.damage()
    }

    pub fn is_fully_absorbed(&self) -> bool {
        matches!(self.outcome, PenetrationOutcome::FullyAbsorbed)
    }
}

impl fmt::Display for TypedResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SV {}", self.damage_type, self.incoming_sv)?;
        for record in &self.absorption {
            write!(f, "; {}", record)?;
        }
        match self.outcome {
            PenetrationOutcome::FullyAbsorbed => write!(f, "; fully absorbed"),
            PenetrationOutcome::Damage { sv, damage } => write!(f, "; SV {} -> {}", sv, damage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageResolutionResult {
    pub hit_location: HitLocation,
    pub armor_check: ArmorSkillCheck,
    pub resolution: TypedResolution,
    /// Defender's equipment after wear
    pub equipment: DefenderEquipment,
}

impl DamageResolutionResult {
    pub fn damage(&self) -> DamageOutcome {
        self.resolution.damage()
    }

    pub fn penetrating_sv(&self) -> i32 {
        self.resolution.penetrating_sv
    }

    pub fn is_fully_absorbed(&self) -> bool {
        self.resolution.is_fully_absorbed()
    }

    /// Items that broke during this resolution
    pub fn destroyed_items(&self) -> Vec<&str> {
        self.resolution
            .absorption
            .iter()
            .filter(|r| r.destroyed)
            .map(|r| r.item_id.as_str())
            .collect()
    }

    pub fn summary(&self) -> String {
        format!("{}: {}", self.hit_location, self.resolution)
    }
}

/// Resolves damage against a defender's equipment
#[derive(Debug, Clone)]
pub struct DamageResolver {
    constants: CombatConstants,
}

impl Default for DamageResolver {
    fn default() -> Self {
        Self::with_constants(constants().clone())
    }
}

impl DamageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constants(constants: CombatConstants) -> Self {
        DamageResolver { constants }
    }

    pub fn roll_armor_check(&self, armor_as: i32, dice: &mut impl RandomSource) -> ArmorSkillCheck {
        let roll = dice.roll_open_ended();
        let total = armor_as + roll;
        let rv = total - self.constants.checks.armor_skill_tv;
        let bonus = skill_bonus(rv);
        ArmorSkillCheck {
            ability_score: armor_as,
            roll,
            total,
            rv,
            bonus,
            absorption_bonus: bonus.absorption_bonus(),
        }
    }

    pub fn resolve(&self, request: &DamageRequest, dice: &mut impl RandomSource) -> DamageResolutionResult {
        let armor_check = self.roll_armor_check(request.defender_armor_as, dice);
        let mut equipment = request.equipment.clone();
        let mut armor_bonus = Some(armor_check.absorption_bonus);

        let hit = HitProfile {
            damage_type: request.damage_type,
            damage_class: request.damage_class,
            ap_offset: request.ap_offset,
            sv_max: request.sv_max,
        };
        let resolution = self.absorb(
            &mut equipment,
            request.incoming_sv,
            &hit,
            request.hit_location,
            request.shield_block_rv,
            &mut armor_bonus,
        );

        DamageResolutionResult {
            hit_location: request.hit_location,
            armor_check,
            resolution,
            equipment,
        }
    }

    /// Absorb one damage type. `armor_bonus` is taken by the first armor
    /// layer that sees the hit and stays `None` afterwards.
    pub(crate) fn absorb(
        &self,
        equipment: &mut DefenderEquipment,
        incoming_sv: i32,
        hit: &HitProfile,
        location: HitLocation,
        shield_block_rv: Option<i32>,
        armor_bonus: &mut Option<i32>,
    ) -> TypedResolution {
        let absorption_constants = &self.constants.absorption;
        let mut records = Vec::new();
        let mut remaining = incoming_sv;

        if let (Some(rv), Some(shield)) = (shield_block_rv, equipment.shield.as_mut()) {
            if remaining > 0 && shield.is_intact() {
                let bonus = shield_block_bonus(rv, absorption_constants);
                let record = absorb_layer(shield, AbsorberKind::Shield, remaining, bonus, hit, absorption_constants);
                remaining = record.remaining_sv;
                records.push(record);
            }
        }

        for index in equipment.armor_layers_for(location) {
            if remaining <= 0 {
                break;
            }
            let bonus = armor_bonus.take().unwrap_or(0);
            let record = absorb_layer(
                &mut equipment.armor[index],
                AbsorberKind::Armor,
                remaining,
                bonus,
                hit,
                absorption_constants,
            );
            remaining = record.remaining_sv;
            records.push(record);
        }

        let penetrating_sv = remaining.max(0);
        let total_absorbed: i32 = records.iter().map(|r| r.absorbed).sum();
        let outcome = PenetrationOutcome::for_sv(penetrating_sv);

        tracing::debug!(
            damage_type = %hit.damage_type,
            incoming_sv,
            total_absorbed,
            penetrating_sv,
            layers = records.len(),
            "damage resolved"
        );

        TypedResolution {
            damage_type: hit.damage_type,
            incoming_sv,
            ap_offset: hit.ap_offset,
            sv_max: hit.sv_max,
            absorption: records,
            total_absorbed,
            penetrating_sv,
            outcome,
        }
    }
}

/// Resolve damage using thread-local dice
pub fn resolve_damage(request: &DamageRequest) -> DamageResolutionResult {
    let mut dice = RngDice::thread_local();
    resolve_damage_with_dice(request, &mut dice)
}

/// Resolve damage with provided dice (for deterministic testing)
pub fn resolve_damage_with_dice(request: &DamageRequest, dice: &mut impl RandomSource) -> DamageResolutionResult {
    DamageResolver::new().resolve(request, dice)
}
