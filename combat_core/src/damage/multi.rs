//! Multi-type damage: one attack fanned out over its weapon profile
//!
//! The armor-skill check is rolled once and its bonus is spent at the first
//! armor layer any damage type reaches. Equipment is cloned once, so every
//! type after the first meets protection already worn by the ones before it.

use super::{ArmorSkillCheck, DamageResolver, HitProfile, TypedResolution};
use crate::dice::{RandomSource, RngDice};
use gear_core::{DamageClass, DamageType, DamageTypeEntry, DefenderEquipment, HitLocation, WeaponDamageProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiDamageRequest {
    /// SV of the hit before per-type modifiers
    pub base_sv: i32,
    /// Merged weapon and ammunition profile
    #[serde(default)]
    pub profile: WeaponDamageProfile,
    #[serde(default)]
    pub damage_class: DamageClass,
    pub hit_location: HitLocation,
    pub defender_armor_as: i32,
    #[serde(default)]
    pub shield_block_rv: Option<i32>,
    #[serde(default)]
    pub equipment: DefenderEquipment,
}

impl MultiDamageRequest {
    pub fn new(
        base_sv: i32,
        profile: WeaponDamageProfile,
        hit_location: HitLocation,
        defender_armor_as: i32,
    ) -> Self {
        MultiDamageRequest {
            base_sv,
            profile,
            damage_class: DamageClass::ONE,
            hit_location,
            defender_armor_as,
            shield_block_rv: None,
            equipment: DefenderEquipment::default(),
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiDamageResolutionResult {
    pub hit_location: HitLocation,
    pub armor_check: ArmorSkillCheck,
    /// One entry per damage type that carried positive SV, in processing order
    pub resolutions: Vec<TypedResolution>,
    /// Active types whose effective SV was not positive
    pub skipped: Vec<DamageType>,
    pub total_fatigue: i32,
    pub total_vitality: i32,
    pub wound_count: u32,
    pub caused_wound: bool,
    /// No damage type got through
    pub fully_absorbed: bool,
    pub equipment: DefenderEquipment,
}

impl MultiDamageResolutionResult {
    pub fn resolution(&self, damage_type: DamageType) -> Option<&TypedResolution> {
        self.resolutions.iter().find(|r| r.damage_type == damage_type)
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MultiDamageResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.hit_location)?;
        for resolution in &self.resolutions {
            write!(f, "\n  {}", resolution)?;
        }
        if self.fully_absorbed {
            write!(f, "\nTotal: fully absorbed")
        } else {
            write!(f, "\nTotal: {} FAT, {} VIT", self.total_fatigue, self.total_vitality)?;
            if self.wound_count > 0 {
                write!(f, ", {} wound(s)", self.wound_count)?;
            }
            Ok(())
        }
    }
}

impl DamageResolver {
    pub fn resolve_multi(
        &self,
        request: &MultiDamageRequest,
        dice: &mut impl RandomSource,
    ) -> MultiDamageResolutionResult {
        let armor_check = self.roll_armor_check(request.defender_armor_as, dice);
        let mut equipment = request.equipment.clone();
        let mut armor_bonus = Some(armor_check.absorption_bonus);

        let active = request.profile.active_types();
        let plan = if active.is_empty() {
            vec![(DamageType::Bashing, DamageTypeEntry::default())]
        } else {
            active
        };

        let mut resolutions = Vec::with_capacity(plan.len());
        let mut skipped = Vec::new();
        for (damage_type, entry) in plan {
            let effective_sv = request.base_sv + entry.sv_modifier;
            if entry.sv_modifier != 0 && effective_sv <= 0 {
                skipped.push(damage_type);
                continue;
            }
            let hit = HitProfile {
                damage_type,
                damage_class: request.damage_class,
                ap_offset: entry.ap_offset,
                sv_max: entry.sv_max,
            };
            resolutions.push(self.absorb(
                &mut equipment,
                effective_sv,
                &hit,
                request.hit_location,
                request.shield_block_rv,
                &mut armor_bonus,
            ));
        }

        let mut total_fatigue = 0;
        let mut total_vitality = 0;
        let mut wound_count = 0;
        for resolution in &resolutions {
            let damage = resolution.damage();
            total_fatigue += damage.fatigue;
            total_vitality += damage.vitality;
            if damage.wound {
                wound_count += 1;
            }
        }
        let fully_absorbed = resolutions.iter().all(TypedResolution::is_fully_absorbed);

        tracing::debug!(
            types = resolutions.len(),
            skipped = skipped.len(),
            total_fatigue,
            total_vitality,
            wound_count,
            "multi-damage resolved"
        );

        MultiDamageResolutionResult {
            hit_location: request.hit_location,
            armor_check,
            resolutions,
            skipped,
            total_fatigue,
            total_vitality,
            wound_count,
            caused_wound: wound_count > 0,
            fully_absorbed,
            equipment,
        }
    }
}

/// Resolve a multi-type hit using thread-local dice
pub fn resolve_multi_damage(request: &MultiDamageRequest) -> MultiDamageResolutionResult {
    let mut dice = RngDice::thread_local();
    resolve_multi_damage_with_dice(request, &mut dice)
}

pub fn resolve_multi_damage_with_dice(
    request: &MultiDamageRequest,
    dice: &mut impl RandomSource,
) -> MultiDamageResolutionResult {
    DamageResolver::new().resolve_multi(request, dice)
}
