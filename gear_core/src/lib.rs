//! gear_core - Equipment views shared by the combat resolvers
//!
//! This library provides:
//! - Core enums: damage types, damage classes, hit locations, range bands
//! - ArmorInfo / ShieldInfo: mutable durability views of equipped protection
//! - WeaponDamageProfile: per-damage-type modifiers merged from weapon and ammo
//! - WeaponRanges and area-effect properties for ranged weapons

pub mod area;
pub mod armor;
pub mod profile;
pub mod ranges;
pub mod slot;
pub mod types;

pub use area::{AreaEffect, BlastFalloff};
pub use armor::{Absorber, ArmorInfo, DefenderEquipment, ShieldInfo};
pub use profile::{DamageTypeEntry, WeaponDamageProfile};
pub use ranges::WeaponRanges;
pub use slot::EquipmentSlot;
pub use types::{DamageClass, DamageType, HitLocation, RangeCategory};

use thiserror::Error;

/// Error building equipment or profiles from caller-supplied data
#[derive(Debug, Error)]
pub enum GearError {
    #[error("Item id must not be empty")]
    EmptyItemId,
    #[error("Damage class must be between 1 and 4, got {0}")]
    InvalidDamageClass(u8),
    #[error("Unknown damage type: {0}")]
    UnknownDamageType(String),
    #[error("Failed to parse damage profile: {0}")]
    ProfileParse(#[from] serde_json::Error),
}
