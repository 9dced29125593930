//! Skill-bonus table
//!
//! Indexed by a check's result value. Used for the attacker's free
//! Physicality check and, with the penalty read as lost absorption, for the
//! defender's armor-skill check.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSkillBonus")]
pub struct SkillBonus {
    /// Added to the attack's SV
    pub sv_modifier: i32,
    /// AV penalty the attacker suffers (zero or negative)
    pub attacker_av_penalty: i32,
    /// Rounds the AV penalty lasts
    pub penalty_rounds: u32,
    /// Band name; rebuilt from the band on deserialize
    #[serde(skip_deserializing)]
    pub label: &'static str,
}

/// Serialized form. The label is not trusted from input.
#[derive(Deserialize)]
struct StoredSkillBonus {
    sv_modifier: i32,
    attacker_av_penalty: i32,
    penalty_rounds: u32,
}

impl From<StoredSkillBonus> for SkillBonus {
    fn from(stored: StoredSkillBonus) -> Self {
        let label = BANDS
            .iter()
            .find(|band| {
                band.sv_modifier == stored.sv_modifier
                    && band.attacker_av_penalty == stored.attacker_av_penalty
                    && band.penalty_rounds == stored.penalty_rounds
            })
            .map_or(UNLISTED_LABEL, |band| band.label);
        SkillBonus::new(
            stored.sv_modifier,
            stored.attacker_av_penalty,
            stored.penalty_rounds,
            label,
        )
    }
}

const UNLISTED_LABEL: &str = "Unlisted";

const OVEREXTENDED: SkillBonus = SkillBonus::new(0, -3, 3, "Overextended");
const OFF_BALANCE: SkillBonus = SkillBonus::new(0, -2, 2, "Off-balance");
const STRAINED: SkillBonus = SkillBonus::new(0, -2, 1, "Strained");
const WEAK_SWING: SkillBonus = SkillBonus::new(0, -1, 1, "Weak swing");
const SOLID_HIT: SkillBonus = SkillBonus::new(1, 0, 0, "Solid hit");
const POWERFUL_BLOW: SkillBonus = SkillBonus::new(2, 0, 0, "Powerful blow");
const CRUSHING_STRIKE: SkillBonus = SkillBonus::new(3, 0, 0, "Crushing strike");
const DEVASTATING_BLOW: SkillBonus = SkillBonus::new(4, 0, 0, "Devastating blow");

/// Every band, lowest RV first
const BANDS: [SkillBonus; 9] = [
    OVEREXTENDED,
    OFF_BALANCE,
    STRAINED,
    WEAK_SWING,
    SkillBonus::NONE,
    SOLID_HIT,
    POWERFUL_BLOW,
    CRUSHING_STRIKE,
    DEVASTATING_BLOW,
];

impl SkillBonus {
    const fn new(sv_modifier: i32, attacker_av_penalty: i32, penalty_rounds: u32, label: &'static str) -> Self {
        SkillBonus {
            sv_modifier,
            attacker_av_penalty,
            penalty_rounds,
            label,
        }
    }

    pub const NONE: SkillBonus = SkillBonus::new(0, 0, 0, "No effect");

    pub fn has_penalty(&self) -> bool {
        self.attacker_av_penalty < 0
    }

    /// The same band read from the defender's side: bonus (or loss) to
    /// first-layer armor absorption
    pub fn absorption_bonus(&self) -> i32 {
        self.sv_modifier + self.attacker_av_penalty
    }
}

impl fmt::Display for SkillBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_penalty() {
            let unit = if self.penalty_rounds == 1 { "round" } else { "rounds" };
            write!(
                f,
                "{}: {} AV for {} {}",
                self.label, self.attacker_av_penalty, self.penalty_rounds, unit
            )
        } else if self.sv_modifier > 0 {
            write!(f, "{}: +{} SV", self.label, self.sv_modifier)
        } else {
            write!(f, "{}", self.label)
        }
    }
}

/// Look up the skill-bonus band for a result value
pub fn skill_bonus(rv: i32) -> SkillBonus {
    match rv {
        i32::MIN..=-9 => OVEREXTENDED,
        -8..=-7 => OFF_BALANCE,
        -6..=-5 => STRAINED,
        -4..=-3 => WEAK_SWING,
        -2..=1 => SkillBonus::NONE,
        2..=3 => SOLID_HIT,
        4..=7 => POWERFUL_BLOW,
        8..=11 => CRUSHING_STRIKE,
        12..=i32::MAX => DEVASTATING_BLOW,
    }
}
