//! Ranged-attack target values

use gear_core::RangeCategory;
use serde::{Deserialize, Serialize};

/// Base TV for a range band, `None` when the target is out of range
pub fn base_tv(category: RangeCategory) -> Option<i32> {
    match category {
        RangeCategory::Short => Some(6),
        RangeCategory::Medium => Some(8),
        RangeCategory::Long => Some(10),
        RangeCategory::Extreme => Some(12),
        RangeCategory::OutOfRange => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSize {
    #[default]
    Normal,
    Small,
    Tiny,
}

impl TargetSize {
    pub fn modifier(self) -> i32 {
        match self {
            TargetSize::Normal => 0,
            TargetSize::Small => 1,
            TargetSize::Tiny => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverType {
    #[default]
    None,
    Half,
    ThreeQuarters,
}

impl CoverType {
    pub fn modifier(self) -> i32 {
        match self {
            CoverType::None => 0,
            CoverType::Half => 1,
            CoverType::ThreeQuarters => 2,
        }
    }
}

/// Situational conditions that raise a ranged attack's TV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConditions {
    #[serde(default)]
    pub target_moving: bool,
    #[serde(default)]
    pub target_prone: bool,
    #[serde(default)]
    pub target_crouching: bool,
    #[serde(default)]
    pub target_size: TargetSize,
    #[serde(default)]
    pub cover: CoverType,
    #[serde(default)]
    pub attacker_moving: bool,
}

const MOVEMENT_MODIFIER: i32 = 2;

impl RangeConditions {
    /// +2 each for a moving, prone, or crouching target
    pub fn target_movement_modifier(&self) -> i32 {
        [self.target_moving, self.target_prone, self.target_crouching]
            .iter()
            .filter(|&&flag| flag)
            .count() as i32
            * MOVEMENT_MODIFIER
    }

    pub fn attacker_modifier(&self) -> i32 {
        if self.attacker_moving {
            MOVEMENT_MODIFIER
        } else {
            0
        }
    }

    /// Modifiers that depend on the target only
    pub fn target_modifier(&self) -> i32 {
        self.target_movement_modifier() + self.target_size.modifier() + self.cover.modifier()
    }

    pub fn total_modifier(&self) -> i32 {
        self.target_modifier() + self.attacker_modifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tv_by_band() {
        assert_eq!(base_tv(RangeCategory::Short), Some(6));
        assert_eq!(base_tv(RangeCategory::Medium), Some(8));
        assert_eq!(base_tv(RangeCategory::Long), Some(10));
        assert_eq!(base_tv(RangeCategory::Extreme), Some(12));
        assert_eq!(base_tv(RangeCategory::OutOfRange), None);
    }

    #[test]
    fn test_no_conditions() {
        assert_eq!(RangeConditions::default().total_modifier(), 0);
    }

    #[test]
    fn test_all_conditions_stack() {
        let conditions = RangeConditions {
            target_moving: true,
            target_prone: true,
            target_crouching: true,
            target_size: TargetSize::Tiny,
            cover: CoverType::ThreeQuarters,
            attacker_moving: true,
        };
        assert_eq!(conditions.target_movement_modifier(), 6);
        assert_eq!(conditions.target_modifier(), 10);
        assert_eq!(conditions.total_modifier(), 12);
    }

    #[test]
    fn test_size_and_cover() {
        let conditions = RangeConditions {
            target_size: TargetSize::Small,
            cover: CoverType::Half,
            ..Default::default()
        };
        assert_eq!(conditions.total_modifier(), 2);
    }
}
