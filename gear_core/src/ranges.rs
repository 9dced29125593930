//! Range thresholds for ranged weapons
//!
//! Distances are range values (the square root of meters, rounded), so a
//! threshold of 3 is about 9m and 10 is about 100m.

use crate::types::RangeCategory;
use serde::{Deserialize, Serialize};

/// Inclusive upper bound of each range band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRanges {
    pub short: i32,
    pub medium: i32,
    pub long: i32,
    pub extreme: i32,
}

impl WeaponRanges {
    pub const fn new(short: i32, medium: i32, long: i32, extreme: i32) -> Self {
        WeaponRanges {
            short,
            medium,
            long,
            extreme,
        }
    }

    pub const SHORTBOW: WeaponRanges = WeaponRanges::new(3, 5, 7, 9);
    pub const LONGBOW: WeaponRanges = WeaponRanges::new(4, 6, 8, 10);
    pub const CROSSBOW: WeaponRanges = WeaponRanges::new(5, 7, 9, 11);
    pub const THROWN_DAGGER: WeaponRanges = WeaponRanges::new(1, 2, 3, 4);
    pub const THROWN_JAVELIN: WeaponRanges = WeaponRanges::new(2, 4, 5, 6);

    /// Band a distance falls into
    pub fn category(&self, distance: i32) -> RangeCategory {
        if distance <= self.short {
            RangeCategory::Short
        } else if distance <= self.medium {
            RangeCategory::Medium
        } else if distance <= self.long {
            RangeCategory::Long
        } else if distance <= self.extreme {
            RangeCategory::Extreme
        } else {
            RangeCategory::OutOfRange
        }
    }

    pub fn in_range(&self, distance: i32) -> bool {
        distance <= self.extreme
    }
}
