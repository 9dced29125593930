//! Damage table: final SV to fatigue / vitality / wound

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDamageOutcome")]
pub struct DamageOutcome {
    pub fatigue: i32,
    pub vitality: i32,
    pub wound: bool,
    /// Row name; rebuilt from the row on deserialize
    #[serde(skip_deserializing)]
    pub label: &'static str,
}

#[derive(Deserialize)]
struct StoredDamageOutcome {
    fatigue: i32,
    vitality: i32,
    wound: bool,
}

impl From<StoredDamageOutcome> for DamageOutcome {
    fn from(stored: StoredDamageOutcome) -> Self {
        let mut outcome = DamageOutcome::new(stored.fatigue, stored.vitality, stored.wound, "");
        outcome.label = if outcome.is_none() {
            DamageOutcome::NONE.label
        } else {
            // Every row from SV 0 up deals SV + 1 fatigue
            damage_for_sv(stored.fatigue.saturating_sub(1).max(0)).label
        };
        outcome
    }
}

impl DamageOutcome {
    const fn new(fatigue: i32, vitality: i32, wound: bool, label: &'static str) -> Self {
        DamageOutcome {
            fatigue,
            vitality,
            wound,
            label,
        }
    }

    pub const NONE: DamageOutcome = DamageOutcome::new(0, 0, false, "No damage");

    pub fn is_none(&self) -> bool {
        self.fatigue == 0 && self.vitality == 0 && !self.wound
    }
}

impl fmt::Display for DamageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "{}", self.label);
        }
        write!(f, "{}: {} FAT", self.label, self.fatigue)?;
        if self.vitality > 0 {
            write!(f, ", {} VIT", self.vitality)?;
        }
        if self.wound {
            write!(f, " + wound")?;
        }
        Ok(())
    }
}

/// Damage for a final success value. Negative SV deals nothing.
pub fn damage_for_sv(sv: i32) -> DamageOutcome {
    match sv {
        i32::MIN..=-1 => DamageOutcome::NONE,
        0 => DamageOutcome::new(1, 0, false, "Glancing blow"),
        1 => DamageOutcome::new(2, 0, false, "Light hit"),
        2 => DamageOutcome::new(3, 0, false, "Solid hit"),
        3 => DamageOutcome::new(4, 0, false, "Good hit"),
        4 => DamageOutcome::new(5, 1, false, "Strong hit"),
        5 => DamageOutcome::new(6, 2, false, "Heavy hit"),
        6 => DamageOutcome::new(7, 3, true, "Wounding blow"),
        7 => DamageOutcome::new(8, 4, true, "Serious wound"),
        _ => DamageOutcome::new(
            8i32.saturating_add(sv - 7),
            5i32.saturating_add(sv - 8),
            true,
            "Critical wound",
        ),
    }
}
