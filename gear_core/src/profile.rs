//! Weapon damage profiles
//!
//! A profile maps each damage type a weapon (or its ammunition) deals to an
//! SV modifier, an armor-piercing offset, and an optional SV cap. Weapon and
//! ammunition profiles merge into the single profile an attack resolves with.

use crate::types::DamageType;
use crate::GearError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Per-damage-type modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageTypeEntry {
    /// Added to the attack's SV for this damage type
    #[serde(default)]
    pub sv_modifier: i32,
    /// Subtracted from each armor layer's raw absorption
    #[serde(default)]
    pub ap_offset: i32,
    /// Largest total absorption a layer may apply before it fully stops the hit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sv_max: Option<i32>,
}

impl DamageTypeEntry {
    pub fn new(sv_modifier: i32) -> Self {
        DamageTypeEntry {
            sv_modifier,
            ..Default::default()
        }
    }

    pub fn with_ap_offset(mut self, ap_offset: i32) -> Self {
        self.ap_offset = ap_offset;
        self
    }

    pub fn with_sv_max(mut self, sv_max: i32) -> Self {
        self.sv_max = Some(sv_max);
        self
    }

    fn is_empty(&self) -> bool {
        self.sv_modifier == 0 && self.ap_offset == 0 && self.sv_max.is_none()
    }

    /// Combine two entries: modifiers and offsets add, caps take the minimum
    pub fn merge(&self, other: &DamageTypeEntry) -> DamageTypeEntry {
        let sv_max = match (self.sv_max, other.sv_max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
        DamageTypeEntry {
            sv_modifier: self.sv_modifier + other.sv_modifier,
            ap_offset: self.ap_offset + other.ap_offset,
            sv_max,
        }
    }
}

/// Persisted form of one entry: a bare modifier or the full object
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Modifier(i32),
    Full(DamageTypeEntry),
}

impl From<StoredEntry> for DamageTypeEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored {
            StoredEntry::Modifier(m) => DamageTypeEntry::new(m),
            StoredEntry::Full(entry) => entry,
        }
    }
}

impl From<DamageTypeEntry> for StoredEntry {
    fn from(entry: DamageTypeEntry) -> Self {
        if entry.ap_offset == 0 && entry.sv_max.is_none() {
            StoredEntry::Modifier(entry.sv_modifier)
        } else {
            StoredEntry::Full(entry)
        }
    }
}

/// Damage types dealt by a weapon or ammunition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponDamageProfile {
    entries: HashMap<DamageType, DamageTypeEntry>,
}

impl WeaponDamageProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile dealing a single damage type
    pub fn from_single(damage_type: DamageType, sv_modifier: i32) -> Self {
        Self::new().with_entry(damage_type, DamageTypeEntry::new(sv_modifier))
    }

    pub fn with_entry(mut self, damage_type: DamageType, entry: DamageTypeEntry) -> Self {
        self.entries.insert(damage_type, entry);
        self
    }

    pub fn with_modifier(self, damage_type: DamageType, sv_modifier: i32) -> Self {
        self.with_entry(damage_type, DamageTypeEntry::new(sv_modifier))
    }

    /// Entry for a damage type (all zero when absent)
    pub fn entry(&self, damage_type: DamageType) -> DamageTypeEntry {
        self.entries.get(&damage_type).copied().unwrap_or_default()
    }

    pub fn sv_modifier(&self, damage_type: DamageType) -> i32 {
        self.entry(damage_type).sv_modifier
    }

    pub fn entries(&self) -> &HashMap<DamageType, DamageTypeEntry> {
        &self.entries
    }

    /// Merge with another profile. The operation is commutative.
    pub fn merge(&self, other: &WeaponDamageProfile) -> WeaponDamageProfile {
        let mut merged = self.entries.clone();
        for (&damage_type, entry) in &other.entries {
            merged
                .entry(damage_type)
                .and_modify(|existing| *existing = existing.merge(entry))
                .or_insert(*entry);
        }
        WeaponDamageProfile { entries: merged }
    }

    /// Types with a non-zero SV modifier, highest modifier first.
    /// Ties keep `DamageType` declaration order so resolution is deterministic.
    pub fn active_types(&self) -> Vec<(DamageType, DamageTypeEntry)> {
        let mut active: Vec<(DamageType, DamageTypeEntry)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.sv_modifier != 0)
            .map(|(&dt, &e)| (dt, e))
            .collect();
        active.sort_by(|a, b| b.1.sv_modifier.cmp(&a.1.sv_modifier).then(a.0.cmp(&b.0)));
        active
    }

    /// Type with the highest modifier, Bashing when the profile deals nothing
    pub fn primary_damage_type(&self) -> DamageType {
        self.active_types()
            .first()
            .map(|(dt, _)| *dt)
            .unwrap_or(DamageType::Bashing)
    }

    pub fn primary_sv_modifier(&self) -> i32 {
        self.active_types()
            .first()
            .map(|(_, e)| e.sv_modifier)
            .unwrap_or(0)
    }

    pub fn has_damage(&self) -> bool {
        self.entries.values().any(|e| e.sv_modifier != 0)
    }

    pub fn is_multi_type(&self) -> bool {
        self.active_types().len() > 1
    }

    /// Parse the persisted JSON form.
    ///
    /// Accepts `{"Cutting": 4}` and `{"Piercing": {"sv_modifier": 2, "ap_offset": 3}}`.
    /// Type names are case-insensitive; unknown names are skipped. Blank input
    /// or a profile with no recognised types yields `Ok(None)`.
    pub fn from_json(json: &str) -> Result<Option<Self>, GearError> {
        if json.trim().is_empty() {
            return Ok(None);
        }
        let raw: HashMap<String, StoredEntry> = serde_json::from_str(json)?;
        let mut profile = WeaponDamageProfile::new();
        for (name, stored) in raw {
            match name.parse::<DamageType>() {
                Ok(damage_type) => {
                    profile.entries.insert(damage_type, stored.into());
                }
                Err(_) => tracing::debug!(name = %name, "skipping unknown damage type in profile"),
            }
        }
        if profile.entries.is_empty() {
            Ok(None)
        } else {
            Ok(Some(profile))
        }
    }

    /// Serialize to the persisted JSON form, omitting all-zero entries
    pub fn to_json(&self) -> Result<String, GearError> {
        let stored: BTreeMap<String, StoredEntry> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.is_empty())
            .map(|(dt, e)| (dt.to_string(), StoredEntry::from(*e)))
            .collect();
        Ok(serde_json::to_string(&stored)?)
    }
}

impl fmt::Display for WeaponDamageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_types();
        if active.is_empty() {
            return write!(f, "None");
        }
        let parts: Vec<String> = active
            .iter()
            .map(|(dt, e)| {
                if e.sv_modifier >= 0 {
                    format!("{} +{}", dt, e.sv_modifier)
                } else {
                    format!("{} {}", dt, e.sv_modifier)
                }
            })
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
