//! tables_core - Lookup tables driving combat resolution
//!
//! Every table here is a pure function of its key. Boundaries are inclusive
//! exactly as written in each table's match arms.

pub mod damage;
pub mod hit_location;
pub mod range;
pub mod skill_bonus;

pub use damage::{damage_for_sv, DamageOutcome};
pub use hit_location::{location_for_roll, try_location_for_roll, HIT_LOCATION_SIDES};
pub use range::{base_tv, CoverType, RangeConditions, TargetSize};
pub use skill_bonus::{skill_bonus, SkillBonus};

/// Baseline subtracted from a check total to produce its result value
pub const RESULT_VALUE_BASELINE: i32 = 8;
