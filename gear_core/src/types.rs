use crate::GearError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Damage types an attack can deal and armor can absorb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum DamageType {
    #[default]
    Bashing,
    Cutting,
    Piercing,
    Projectile,
    Energy,
}

impl DamageType {
    /// Get all damage type variants
    pub fn all() -> &'static [DamageType] {
        &[
            DamageType::Bashing,
            DamageType::Cutting,
            DamageType::Piercing,
            DamageType::Projectile,
            DamageType::Energy,
        ]
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageType::Bashing => write!(f, "Bashing"),
            DamageType::Cutting => write!(f, "Cutting"),
            DamageType::Piercing => write!(f, "Piercing"),
            DamageType::Projectile => write!(f, "Projectile"),
            DamageType::Energy => write!(f, "Energy"),
        }
    }
}

impl FromStr for DamageType {
    type Err = GearError;

    /// Case-insensitive parse, matching how item records store type names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DamageType::all()
            .iter()
            .copied()
            .find(|dt| dt.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GearError::UnknownDamageType(s.to_string()))
    }
}

/// Damage class (1-4). Each step up is an order of magnitude more destructive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DamageClass(u8);

impl DamageClass {
    pub const ONE: DamageClass = DamageClass(1);
    pub const TWO: DamageClass = DamageClass(2);
    pub const THREE: DamageClass = DamageClass(3);
    pub const FOUR: DamageClass = DamageClass(4);

    pub fn new(value: u8) -> Result<Self, GearError> {
        if (1..=4).contains(&value) {
            Ok(DamageClass(value))
        } else {
            Err(GearError::InvalidDamageClass(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Signed class difference `self - other`
    pub fn difference(self, other: DamageClass) -> i32 {
        i32::from(self.0) - i32::from(other.0)
    }
}

impl Default for DamageClass {
    fn default() -> Self {
        DamageClass::ONE
    }
}

impl TryFrom<u8> for DamageClass {
    type Error = GearError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DamageClass::new(value)
    }
}

impl From<DamageClass> for u8 {
    fn from(class: DamageClass) -> u8 {
        class.0
    }
}

impl fmt::Display for DamageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DC{}", self.0)
    }
}

/// Body locations that can be struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitLocation {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl HitLocation {
    pub fn all() -> &'static [HitLocation] {
        &[
            HitLocation::Head,
            HitLocation::Torso,
            HitLocation::LeftArm,
            HitLocation::RightArm,
            HitLocation::LeftLeg,
            HitLocation::RightLeg,
        ]
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HitLocation::Head => write!(f, "Head"),
            HitLocation::Torso => write!(f, "Torso"),
            HitLocation::LeftArm => write!(f, "Left Arm"),
            HitLocation::RightArm => write!(f, "Right Arm"),
            HitLocation::LeftLeg => write!(f, "Left Leg"),
            HitLocation::RightLeg => write!(f, "Right Leg"),
        }
    }
}

/// Range band of a ranged attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeCategory {
    Short,
    Medium,
    Long,
    Extreme,
    /// Beyond the weapon's extreme range; cannot hit
    OutOfRange,
}

impl fmt::Display for RangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeCategory::Short => write!(f, "Short"),
            RangeCategory::Medium => write!(f, "Medium"),
            RangeCategory::Long => write!(f, "Long"),
            RangeCategory::Extreme => write!(f, "Extreme"),
            RangeCategory::OutOfRange => write!(f, "Out of range"),
        }
    }
}
