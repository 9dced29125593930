//! Equipment slots and the body locations armor in each slot protects

use crate::types::HitLocation;
use serde::{Deserialize, Serialize};

/// Where an item is worn or held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    // Body
    Head,
    Face,
    Ears,
    Neck,
    Shoulders,
    Back,
    Chest,
    ArmLeft,
    ArmRight,
    WristLeft,
    WristRight,
    HandLeft,
    HandRight,
    Waist,
    Legs,
    AnkleLeft,
    AnkleRight,
    FootLeft,
    FootRight,

    // Weapons
    MainHand,
    OffHand,
    TwoHand,

    // Jewelry
    FingerLeft,
    FingerRight,

    // Implants
    ImplantNeural,
    ImplantCardiac,
    ImplantSpine,
    ImplantArmLeft,
    ImplantArmRight,
    ImplantLegLeft,
    ImplantLegRight,
    ImplantSubdermal,
}

impl EquipmentSlot {
    /// Hit locations covered by armor equipped in this slot
    pub fn covered_locations(self) -> &'static [HitLocation] {
        use EquipmentSlot::*;
        match self {
            Head | Face => &[HitLocation::Head],
            Chest | Back | Shoulders | Waist | ImplantSubdermal => &[HitLocation::Torso],
            ArmLeft | WristLeft | HandLeft | ImplantArmLeft => &[HitLocation::LeftArm],
            ArmRight | WristRight | HandRight | ImplantArmRight => &[HitLocation::RightArm],
            Legs => &[HitLocation::LeftLeg, HitLocation::RightLeg],
            AnkleLeft | FootLeft | ImplantLegLeft => &[HitLocation::LeftLeg],
            AnkleRight | FootRight | ImplantLegRight => &[HitLocation::RightLeg],
            Ears | Neck | MainHand | OffHand | TwoHand | FingerLeft | FingerRight
            | ImplantNeural | ImplantCardiac | ImplantSpine => &[],
        }
    }

    /// Absorption order for armor in this slot (lower absorbs first)
    pub fn layer_order(self) -> i32 {
        match self {
            EquipmentSlot::Back => 1,
            EquipmentSlot::Shoulders => 2,
            EquipmentSlot::Chest => 3,
            _ => 10,
        }
    }

    /// Whether armor in this slot protects any location
    pub fn is_armor_slot(self) -> bool {
        !self.covered_locations().is_empty()
    }

    /// All slots that can hold armor protecting `location`
    pub fn slots_for_location(location: HitLocation) -> &'static [EquipmentSlot] {
        use EquipmentSlot::*;
        match location {
            HitLocation::Head => &[Head, Face],
            HitLocation::Torso => &[Chest, Back, Shoulders, Waist, ImplantSubdermal],
            HitLocation::LeftArm => &[ArmLeft, WristLeft, HandLeft, ImplantArmLeft],
            HitLocation::RightArm => &[ArmRight, WristRight, HandRight, ImplantArmRight],
            HitLocation::LeftLeg => &[Legs, AnkleLeft, FootLeft, ImplantLegLeft],
            HitLocation::RightLeg => &[Legs, AnkleRight, FootRight, ImplantLegRight],
        }
    }
}
