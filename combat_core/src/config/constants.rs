//! Combat rule constants

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use super::ConfigError;

/// Global combat constants instance
static COMBAT_CONSTANTS: OnceLock<CombatConstants> = OnceLock::new();

/// Initialize the global combat constants from a TOML file
///
/// Returns error if already initialized or if loading fails.
pub fn init_constants(path: &Path) -> Result<(), ConfigError> {
    let constants = CombatConstants::load_from_path(path)?;
    COMBAT_CONSTANTS
        .set(constants)
        .map_err(|_| ConfigError::ValidationError("CombatConstants already initialized".to_string()))
}

/// Initialize the global combat constants with default values
pub fn init_constants_default() -> Result<(), ConfigError> {
    COMBAT_CONSTANTS
        .set(CombatConstants::default())
        .map_err(|_| ConfigError::ValidationError("CombatConstants already initialized".to_string()))
}

/// Get a reference to the global combat constants
///
/// Falls back to the defaults if nothing was initialized.
pub fn constants() -> &'static CombatConstants {
    COMBAT_CONSTANTS.get_or_init(CombatConstants::default)
}

/// Check if constants have been initialized
pub fn constants_initialized() -> bool {
    COMBAT_CONSTANTS.get().is_some()
}

/// Ensure constants are initialized with defaults (idempotent, useful for tests)
pub fn ensure_constants_initialized() {
    COMBAT_CONSTANTS.get_or_init(CombatConstants::default);
}

/// Tunable combat constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub checks: CheckConstants,
    #[serde(default)]
    pub defense: DefenseConstants,
    #[serde(default)]
    pub actions: ActionConstants,
    #[serde(default)]
    pub absorption: AbsorptionConstants,
    #[serde(default)]
    pub firearm: FirearmConstants,
    #[serde(default)]
    pub concentration: ConcentrationConstants,
}

impl CombatConstants {
    /// Load and validate constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let constants = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded combat constants");
        Ok(constants)
    }

    /// Parse and validate constants from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = toml::from_str(content)?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("defense.passive_offset", self.defense.passive_offset),
            ("actions.multiple_action_penalty", self.actions.multiple_action_penalty),
            ("actions.aim_bonus", self.actions.aim_bonus),
            ("absorption.shield_block_bonus_cap", self.absorption.shield_block_bonus_cap),
            ("firearm.burst_tv_penalty", self.firearm.burst_tv_penalty),
            ("firearm.suppression_tv_penalty", self.firearm.suppression_tv_penalty),
            ("firearm.moving_av_penalty", self.firearm.moving_av_penalty),
        ];
        for (name, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        let positive = [
            ("absorption.class_scale", self.absorption.class_scale),
            ("firearm.default_burst_size", self.firearm.default_burst_size),
            ("firearm.default_suppressive_rounds", self.firearm.default_suppressive_rounds),
            ("firearm.area_rounds", self.firearm.area_rounds),
            ("concentration.damage_per_penalty", self.concentration.damage_per_penalty),
        ];
        for (name, value) in positive {
            if value < 1 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be at least 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Fixed target values of the free checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConstants {
    /// TV of the attacker's free Physicality check
    #[serde(default = "default_check_tv")]
    pub physicality_tv: i32,
    /// TV of the defender's free armor-skill check
    #[serde(default = "default_check_tv")]
    pub armor_skill_tv: i32,
    /// TV a shield block must reach
    #[serde(default = "default_check_tv")]
    pub shield_block_tv: i32,
}

impl Default for CheckConstants {
    fn default() -> Self {
        CheckConstants {
            physicality_tv: 8,
            armor_skill_tv: 8,
            shield_block_tv: 8,
        }
    }
}

fn default_check_tv() -> i32 {
    8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseConstants {
    /// Passive TV = Dodge AS - passive_offset
    #[serde(default = "default_passive_offset")]
    pub passive_offset: i32,
}

impl Default for DefenseConstants {
    fn default() -> Self {
        DefenseConstants { passive_offset: 1 }
    }
}

fn default_passive_offset() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConstants {
    /// AS lost on any action after the first in a round (not cumulative)
    #[serde(default = "default_multiple_action_penalty")]
    pub multiple_action_penalty: i32,
    /// AS gained from aiming the previous round
    #[serde(default = "default_aim_bonus")]
    pub aim_bonus: i32,
}

impl Default for ActionConstants {
    fn default() -> Self {
        ActionConstants {
            multiple_action_penalty: 1,
            aim_bonus: 2,
        }
    }
}

fn default_multiple_action_penalty() -> i32 {
    1
}
fn default_aim_bonus() -> i32 {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorptionConstants {
    /// Largest absorption bonus a shield block can add
    #[serde(default = "default_shield_block_bonus_cap")]
    pub shield_block_bonus_cap: i32,
    /// Absorption factor per damage-class step
    #[serde(default = "default_class_scale")]
    pub class_scale: i32,
}

impl Default for AbsorptionConstants {
    fn default() -> Self {
        AbsorptionConstants {
            shield_block_bonus_cap: 4,
            class_scale: 10,
        }
    }
}

fn default_shield_block_bonus_cap() -> i32 {
    4
}
fn default_class_scale() -> i32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirearmConstants {
    #[serde(default = "default_burst_tv_penalty")]
    pub burst_tv_penalty: i32,
    #[serde(default = "default_suppression_tv_penalty")]
    pub suppression_tv_penalty: i32,
    /// AV lost when the shooter is moving
    #[serde(default = "default_moving_av_penalty")]
    pub moving_av_penalty: i32,
    #[serde(default = "default_burst_size")]
    pub default_burst_size: i32,
    #[serde(default = "default_suppressive_rounds")]
    pub default_suppressive_rounds: i32,
    /// Rounds an area-effect shot consumes regardless of fire mode
    #[serde(default = "default_area_rounds")]
    pub area_rounds: i32,
}

impl Default for FirearmConstants {
    fn default() -> Self {
        FirearmConstants {
            burst_tv_penalty: 1,
            suppression_tv_penalty: 3,
            moving_av_penalty: 2,
            default_burst_size: 3,
            default_suppressive_rounds: 10,
            area_rounds: 1,
        }
    }
}

fn default_burst_tv_penalty() -> i32 {
    1
}
fn default_suppression_tv_penalty() -> i32 {
    3
}
fn default_moving_av_penalty() -> i32 {
    2
}
fn default_burst_size() -> i32 {
    3
}
fn default_suppressive_rounds() -> i32 {
    10
}
fn default_area_rounds() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationConstants {
    /// Focus AS drops by 1 per this much incoming damage
    #[serde(default = "default_damage_per_penalty")]
    pub damage_per_penalty: i32,
}

impl Default for ConcentrationConstants {
    fn default() -> Self {
        ConcentrationConstants {
            damage_per_penalty: 2,
        }
    }
}

fn default_damage_per_penalty() -> i32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = CombatConstants::default();
        assert_eq!(c.checks.physicality_tv, 8);
        assert_eq!(c.checks.armor_skill_tv, 8);
        assert_eq!(c.defense.passive_offset, 1);
        assert_eq!(c.absorption.class_scale, 10);
        assert_eq!(c.firearm.default_burst_size, 3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let c = CombatConstants::parse(
            r#"
            [firearm]
            suppression_tv_penalty = 4
            "#,
        )
        .unwrap();
        assert_eq!(c.firearm.suppression_tv_penalty, 4);
        assert_eq!(c.firearm.burst_tv_penalty, 1);
        assert_eq!(c.checks, CheckConstants::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = CombatConstants::parse("[absorption]\nclass_scale = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = CombatConstants::parse("[actions]\naim_bonus = -2\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = CombatConstants::parse("[checks\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[checks]\nshield_block_tv = 9").unwrap();
        let c = CombatConstants::load_from_path(file.path()).unwrap();
        assert_eq!(c.checks.shield_block_tv, 9);
        assert_eq!(c.checks.physicality_tv, 8);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CombatConstants::load_from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_reference_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/combat.toml");
        let c = CombatConstants::load_from_path(&path).unwrap();
        assert_eq!(c, CombatConstants::default());
    }

    #[test]
    fn test_global_constants_available() {
        ensure_constants_initialized();
        assert!(constants_initialized());
        assert_eq!(constants().checks.physicality_tv, 8);
        assert!(init_constants_default().is_err());
    }
}
