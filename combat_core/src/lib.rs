//! combat_core - Attack, defense and damage resolution
//!
//! This library provides:
//! - RandomSource: injected dice (4dF+ open-ended checks and summed rolls)
//! - Attack resolvers: melee, ranged (bows and thrown) and firearms
//! - DefenseResolver: passive, dodge, parry and shield-block target values
//! - DamageResolver: shield and layered armor absorption, single and multi-type
//! - CombatConstants: tunable rule constants loaded from TOML
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use combat_core::prelude::*;
//!
//! init_constants_default().unwrap();
//! let mut dice = RngDice::seeded(42);
//!
//! // Defender dodges and raises a shield
//! let defense = DefenseResolver::new().resolve_with_shield(
//!     &DefenseRequest::dodge(10),
//!     Some(11),
//!     &mut dice,
//! );
//!
//! // Attacker swings against the dodge TV
//! let attack = AttackResolver::new().resolve_with_tv(
//!     &AttackRequest::new(12, 11, 10),
//!     defense.tv().unwrap_or(9),
//!     &mut dice,
//! );
//!
//! // Run the hit through the defender's armor
//! if let AttackResult::Hit(hit) = attack {
//!     let mut request = DamageRequest::new(hit.final_sv, DamageType::Cutting, hit.location.location, 9)
//!         .with_equipment(equipment);
//!     request.shield_block_rv = defense.shield_block_rv();
//!     let result = DamageResolver::new().resolve(&request, &mut dice);
//!     println!("{}", result.summary());
//!     equipment = result.equipment;
//! }
//! ```

pub mod attack;
pub mod config;
pub mod damage;
pub mod defense;
pub mod dice;
pub mod prelude;

// Resolvers
pub use attack::{
    AttackRequest, AttackResolver, AttackResult, FirearmAttackRequest, FirearmAttackResolver,
    FirearmAttackResult, RangedAttackRequest, RangedAttackResolver, RangedAttackResult,
};
pub use damage::{
    DamageRequest, DamageResolutionResult, DamageResolver, MultiDamageRequest,
    MultiDamageResolutionResult,
};
pub use defense::{DefenseRequest, DefenseResolver, DefenseResult, DefenseType};

// Top-level operations
pub use attack::{
    resolve_firearm_attack, resolve_melee_attack, resolve_melee_attack_with_tv,
    resolve_ranged_attack,
};
pub use damage::{resolve_damage, resolve_multi_damage};
pub use defense::{resolve_defense, resolve_defense_with_shield};

// Configuration
pub use config::{init_constants, init_constants_default, CombatConstants, ConfigError};

// Dice
pub use dice::{RandomSource, RngDice, ScriptedDice};

// Re-export commonly needed gear_core types
pub use gear_core::{
    ArmorInfo, DamageClass, DamageType, DefenderEquipment, HitLocation, RangeCategory, ShieldInfo,
    WeaponDamageProfile,
};
