//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Attacks
pub use crate::attack::{
    AttackRequest, AttackResolver, AttackResult, FireMode, FirearmAttackRequest,
    FirearmAttackResolver, FirearmAttackResult, RangedAttackRequest, RangedAttackResolver,
    RangedAttackResult, VolleyOutcome,
};

// Defense
pub use crate::defense::{
    Concentration, ConcentrationState, DefenseRequest, DefenseResolver, DefenseResult, DefenseType,
};

// Damage
pub use crate::damage::{
    AbsorptionRecord, DamageRequest, DamageResolutionResult, DamageResolver, MultiDamageRequest,
    MultiDamageResolutionResult, PenetrationOutcome,
};

// Dice
pub use crate::dice::{RandomSource, RngDice, ScriptedDice};

// Config
pub use crate::config::{init_constants, init_constants_default, CombatConstants};

// Re-exports from gear_core and tables_core
pub use gear_core::{
    AreaEffect, ArmorInfo, DamageClass, DamageType, DefenderEquipment, EquipmentSlot, HitLocation,
    RangeCategory, ShieldInfo, WeaponDamageProfile, WeaponRanges,
};
pub use tables_core::{CoverType, DamageOutcome, RangeConditions, SkillBonus, TargetSize};
