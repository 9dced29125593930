//! Hit-location table
//!
//! One d24 draw, partitioned so the odds match the old d12-with-reroll
//! procedure: Head 1/24, Torso 11/24, each arm 2/24, each leg 4/24.

use gear_core::HitLocation;

/// Sides on the hit-location die
pub const HIT_LOCATION_SIDES: u32 = 24;

/// Location for a d24 roll, `None` outside 1..=24
pub fn try_location_for_roll(roll: i32) -> Option<HitLocation> {
    match roll {
        1 => Some(HitLocation::Head),
        2..=12 => Some(HitLocation::Torso),
        13..=14 => Some(HitLocation::LeftArm),
        15..=16 => Some(HitLocation::RightArm),
        17..=20 => Some(HitLocation::LeftLeg),
        21..=24 => Some(HitLocation::RightLeg),
        _ => None,
    }
}

/// Location for a d24 roll. A roll outside the die's faces is a dice-source
/// bug; it is logged and treated as a torso hit.
pub fn location_for_roll(roll: i32) -> HitLocation {
    try_location_for_roll(roll).unwrap_or_else(|| {
        tracing::warn!(roll, "hit location roll outside 1..=24, defaulting to torso");
        HitLocation::Torso
    })
}

/// Number of d24 faces mapping to a location
pub fn faces(location: HitLocation) -> u32 {
    match location {
        HitLocation::Head => 1,
        HitLocation::Torso => 11,
        HitLocation::LeftArm | HitLocation::RightArm => 2,
        HitLocation::LeftLeg | HitLocation::RightLeg => 4,
    }
}

/// Chance of striking a location
pub fn probability(location: HitLocation) -> f64 {
    f64::from(faces(location)) / f64::from(HIT_LOCATION_SIDES)
}
