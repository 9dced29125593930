//! Armor and shield views used during damage absorption
//!
//! These are working copies of equipped items. Absorption mutates
//! `current_durability`; everything else is fixed for the life of the view.

use crate::slot::EquipmentSlot;
use crate::types::{DamageClass, DamageType, HitLocation};
use crate::GearError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shared behaviour of anything that can soak success value
pub trait Absorber {
    fn item_id(&self) -> &str;
    fn name(&self) -> &str;
    fn damage_class(&self) -> DamageClass;
    /// Base absorption against a damage type (0 when unlisted)
    fn absorption(&self, damage_type: DamageType) -> i32;
    fn current_durability(&self) -> i32;
    /// Reduce durability, returning how much was actually removed
    fn reduce_durability(&mut self, amount: i32) -> i32;

    fn is_intact(&self) -> bool {
        self.current_durability() > 0
    }
}

/// Clamp a durability reduction to what remains
fn reduce(current: &mut i32, amount: i32) -> i32 {
    if amount <= 0 || *current <= 0 {
        return 0;
    }
    let actual = amount.min(*current);
    *current -= actual;
    actual
}

/// A worn armor piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorInfo {
    pub item_id: String,
    pub name: String,
    /// Locations this piece protects
    pub covered_locations: Vec<HitLocation>,
    #[serde(default)]
    pub damage_class: DamageClass,
    /// Base absorption per damage type
    #[serde(default)]
    pub absorption: HashMap<DamageType, i32>,
    pub current_durability: i32,
    pub max_durability: i32,
    /// Lower layers absorb first
    #[serde(default)]
    pub layer_order: i32,
}

impl ArmorInfo {
    /// Create an armor view at full durability
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        damage_class: DamageClass,
        max_durability: i32,
    ) -> Result<Self, GearError> {
        let item_id = item_id.into();
        if item_id.trim().is_empty() {
            return Err(GearError::EmptyItemId);
        }
        let max_durability = clamp_durability(&item_id, max_durability);
        Ok(ArmorInfo {
            item_id,
            name: name.into(),
            covered_locations: Vec::new(),
            damage_class,
            absorption: HashMap::new(),
            current_durability: max_durability,
            max_durability,
            layer_order: 10,
        })
    }

    /// Create an armor view for an item equipped in `slot`, taking coverage
    /// and layer order from the slot
    pub fn for_slot(
        item_id: impl Into<String>,
        name: impl Into<String>,
        slot: EquipmentSlot,
        damage_class: DamageClass,
        max_durability: i32,
    ) -> Result<Self, GearError> {
        let mut armor = ArmorInfo::new(item_id, name, damage_class, max_durability)?;
        armor.covered_locations = slot.covered_locations().to_vec();
        armor.layer_order = slot.layer_order();
        Ok(armor)
    }

    pub fn with_absorption(mut self, damage_type: DamageType, value: i32) -> Self {
        self.absorption.insert(damage_type, value);
        self
    }

    pub fn covering(mut self, locations: &[HitLocation]) -> Self {
        self.covered_locations = locations.to_vec();
        self
    }

    pub fn with_layer_order(mut self, layer_order: i32) -> Self {
        self.layer_order = layer_order;
        self
    }

    pub fn with_current_durability(mut self, durability: i32) -> Self {
        self.current_durability = clamp_durability(&self.item_id, durability);
        self
    }

    pub fn covers(&self, location: HitLocation) -> bool {
        self.covered_locations.contains(&location)
    }
}

impl Absorber for ArmorInfo {
    fn item_id(&self) -> &str {
        &self.item_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn damage_class(&self) -> DamageClass {
        self.damage_class
    }

    fn absorption(&self, damage_type: DamageType) -> i32 {
        self.absorption.get(&damage_type).copied().unwrap_or(0)
    }

    fn current_durability(&self) -> i32 {
        self.current_durability
    }

    fn reduce_durability(&mut self, amount: i32) -> i32 {
        reduce(&mut self.current_durability, amount)
    }
}

/// A carried shield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldInfo {
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub damage_class: DamageClass,
    #[serde(default)]
    pub absorption: HashMap<DamageType, i32>,
    pub current_durability: i32,
    pub max_durability: i32,
}

impl ShieldInfo {
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        damage_class: DamageClass,
        max_durability: i32,
    ) -> Result<Self, GearError> {
        let item_id = item_id.into();
        if item_id.trim().is_empty() {
            return Err(GearError::EmptyItemId);
        }
        let max_durability = clamp_durability(&item_id, max_durability);
        Ok(ShieldInfo {
            item_id,
            name: name.into(),
            damage_class,
            absorption: HashMap::new(),
            current_durability: max_durability,
            max_durability,
        })
    }

    pub fn with_absorption(mut self, damage_type: DamageType, value: i32) -> Self {
        self.absorption.insert(damage_type, value);
        self
    }

    pub fn with_current_durability(mut self, durability: i32) -> Self {
        self.current_durability = clamp_durability(&self.item_id, durability);
        self
    }
}

impl Absorber for ShieldInfo {
    fn item_id(&self) -> &str {
        &self.item_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn damage_class(&self) -> DamageClass {
        self.damage_class
    }

    fn absorption(&self, damage_type: DamageType) -> i32 {
        self.absorption.get(&damage_type).copied().unwrap_or(0)
    }

    fn current_durability(&self) -> i32 {
        self.current_durability
    }

    fn reduce_durability(&mut self, amount: i32) -> i32 {
        reduce(&mut self.current_durability, amount)
    }
}

fn clamp_durability(item_id: &str, durability: i32) -> i32 {
    if durability < 0 {
        tracing::warn!(item_id, durability, "negative durability clamped to 0");
        0
    } else {
        durability
    }
}

/// Everything a defender has that can absorb a hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefenderEquipment {
    #[serde(default)]
    pub shield: Option<ShieldInfo>,
    #[serde(default)]
    pub armor: Vec<ArmorInfo>,
}

impl DefenderEquipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shield(mut self, shield: ShieldInfo) -> Self {
        self.shield = Some(shield);
        self
    }

    pub fn with_armor(mut self, armor: ArmorInfo) -> Self {
        self.armor.push(armor);
        self
    }

    /// Indices of intact armor covering `location`, in absorption order
    pub fn armor_layers_for(&self, location: HitLocation) -> Vec<usize> {
        let mut layers: Vec<usize> = self
            .armor
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_intact() && a.covers(location))
            .map(|(i, _)| i)
            .collect();
        // Stable sort keeps caller order within a layer
        layers.sort_by_key(|&i| self.armor[i].layer_order);
        layers
    }

    pub fn find_armor(&self, item_id: &str) -> Option<&ArmorInfo> {
        self.armor.iter().find(|a| a.item_id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leather() -> ArmorInfo {
        ArmorInfo::new("leather-1", "Leather Jerkin", DamageClass::ONE, 12)
            .unwrap()
            .with_absorption(DamageType::Cutting, 3)
            .covering(&[HitLocation::Torso])
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(matches!(
            ArmorInfo::new("  ", "Nothing", DamageClass::ONE, 5),
            Err(GearError::EmptyItemId)
        ));
        assert!(ShieldInfo::new("", "Nothing", DamageClass::ONE, 5).is_err());
    }

    #[test]
    fn test_reduce_durability_clamps() {
        let mut armor = leather();
        assert_eq!(armor.reduce_durability(5), 5);
        assert_eq!(armor.current_durability, 7);
        assert_eq!(armor.reduce_durability(20), 7);
        assert_eq!(armor.current_durability, 0);
        assert!(!armor.is_intact());
        assert_eq!(armor.reduce_durability(3), 0);
    }

    #[test]
    fn test_reduce_durability_ignores_non_positive() {
        let mut armor = leather();
        assert_eq!(armor.reduce_durability(-4), 0);
        assert_eq!(armor.current_durability, 12);
    }

    #[test]
    fn test_unlisted_damage_type_absorbs_nothing() {
        let armor = leather();
        assert_eq!(armor.absorption(DamageType::Cutting), 3);
        assert_eq!(armor.absorption(DamageType::Energy), 0);
    }

    #[test]
    fn test_for_slot_uses_slot_coverage() {
        let armor =
            ArmorInfo::for_slot("greaves", "Greaves", EquipmentSlot::Legs, DamageClass::ONE, 8)
                .unwrap();
        assert!(armor.covers(HitLocation::LeftLeg));
        assert!(armor.covers(HitLocation::RightLeg));
        assert!(!armor.covers(HitLocation::Torso));
        assert_eq!(armor.layer_order, 10);
    }

    #[test]
    fn test_armor_layers_sorted_and_filtered() {
        let cloak = ArmorInfo::for_slot("cloak", "Cloak", EquipmentSlot::Back, DamageClass::ONE, 4)
            .unwrap();
        let broken = leather().with_current_durability(0);
        let mail = ArmorInfo::for_slot("mail", "Mail", EquipmentSlot::Chest, DamageClass::ONE, 20)
            .unwrap();
        let helm = ArmorInfo::for_slot("helm", "Helm", EquipmentSlot::Head, DamageClass::ONE, 10)
            .unwrap();
        let equipment = DefenderEquipment::new()
            .with_armor(mail)
            .with_armor(broken)
            .with_armor(helm)
            .with_armor(cloak);

        let layers = equipment.armor_layers_for(HitLocation::Torso);
        let ids: Vec<&str> = layers
            .iter()
            .map(|&i| equipment.armor[i].item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["cloak", "mail"]);
    }

    #[test]
    fn test_absorption_map_json_shape() {
        let armor = leather();
        let json = serde_json::to_string(&armor).unwrap();
        assert!(json.contains("\"Cutting\":3"));
        let back: ArmorInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, armor);
    }
}
