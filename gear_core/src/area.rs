//! Blast properties of area-effect weapons and ammunition

use serde::{Deserialize, Serialize};
use std::fmt;

/// How SV drops off away from the blast centre
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlastFalloff {
    #[default]
    Linear,
    Steep,
    Flat,
}

impl fmt::Display for BlastFalloff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlastFalloff::Linear => write!(f, "Linear"),
            BlastFalloff::Steep => write!(f, "Steep"),
            BlastFalloff::Flat => write!(f, "Flat"),
        }
    }
}

/// Area-effect property of a weapon (grenade, rocket) or its ammunition
/// (HE rounds, explosive arrows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEffect {
    /// Blast radius in meters; 0 means "not specified"
    #[serde(default)]
    pub blast_radius: i32,
    #[serde(default)]
    pub falloff: Option<BlastFalloff>,
    /// Extra SV for the target at the centre of the blast
    #[serde(default)]
    pub direct_hit_bonus: i32,
}

impl AreaEffect {
    pub fn new(blast_radius: i32) -> Self {
        AreaEffect {
            blast_radius,
            ..Default::default()
        }
    }

    pub fn with_falloff(mut self, falloff: BlastFalloff) -> Self {
        self.falloff = Some(falloff);
        self
    }

    pub fn with_direct_hit_bonus(mut self, bonus: i32) -> Self {
        self.direct_hit_bonus = bonus;
        self
    }

    /// Falloff, Linear when neither weapon nor ammunition named one
    pub fn effective_falloff(&self) -> BlastFalloff {
        self.falloff.unwrap_or_default()
    }

    /// Effective blast of a weapon firing some ammunition.
    ///
    /// Ammunition values override the weapon's defaults wherever the
    /// ammunition specifies them. Returns `None` when neither is area-effect.
    pub fn combine(weapon: Option<&AreaEffect>, ammo: Option<&AreaEffect>) -> Option<AreaEffect> {
        match (weapon, ammo) {
            (None, None) => None,
            (Some(w), None) => Some(*w),
            (None, Some(a)) => Some(*a),
            (Some(w), Some(a)) => Some(AreaEffect {
                blast_radius: if a.blast_radius > 0 {
                    a.blast_radius
                } else {
                    w.blast_radius
                },
                falloff: a.falloff.or(w.falloff),
                direct_hit_bonus: if a.direct_hit_bonus != 0 {
                    a.direct_hit_bonus
                } else {
                    w.direct_hit_bonus
                },
            }),
        }
    }
}
