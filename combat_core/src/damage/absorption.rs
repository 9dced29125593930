//! Absorption at a single shield or armor layer

use crate::config::AbsorptionConstants;
use gear_core::{Absorber, DamageClass, DamageType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsorberKind {
    Shield,
    Armor,
}

impl fmt::Display for AbsorberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsorberKind::Shield => write!(f, "Shield"),
            AbsorberKind::Armor => write!(f, "Armor"),
        }
    }
}

/// What one layer did to the hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsorptionRecord {
    pub kind: AbsorberKind,
    pub item_id: String,
    pub name: String,
    pub incoming_sv: i32,
    /// Listed absorption for the damage type
    pub raw_absorption: i32,
    pub ap_offset: i32,
    /// After armor piercing and damage-class scaling
    pub base_absorption: i32,
    /// Shield-block or armor-skill bonus, may be negative
    pub bonus: i32,
    /// max(0, base + bonus), then capped by `sv_max`
    pub total_absorption: i32,
    pub absorbed: i32,
    pub remaining_sv: i32,
    pub durability_before: i32,
    pub durability_lost: i32,
    pub destroyed: bool,
    pub sv_max: Option<i32>,
    /// Absorption exceeded the cap, so the layer stopped the hit outright
    pub cap_triggered: bool,
}

impl fmt::Display for AbsorptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} absorbed {} of {} SV ({} base + {} bonus), {} left",
            self.kind, self.name, self.absorbed, self.incoming_sv, self.base_absorption, self.bonus, self.remaining_sv
        )?;
        if self.cap_triggered {
            write!(f, ", stopped at cap")?;
        }
        if self.destroyed {
            write!(f, ", destroyed")?;
        }
        Ok(())
    }
}

/// Per-hit inputs shared by every layer the hit passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HitProfile {
    pub damage_type: DamageType,
    pub damage_class: DamageClass,
    pub ap_offset: i32,
    pub sv_max: Option<i32>,
}

/// Scale absorption for a damage-class mismatch.
///
/// Heavier protection multiplies its absorption by `class_scale` per step;
/// a heavier attack divides it, rounding down. A `class_scale` below 1 is
/// read as 1.
pub fn scale_for_class(
    base: i32,
    protection_class: DamageClass,
    attack_class: DamageClass,
    constants: &AbsorptionConstants,
) -> i32 {
    let scale = constants.class_scale.max(1);
    let diff = protection_class.difference(attack_class);
    if diff > 0 {
        base.saturating_mul(scale.saturating_mul(diff))
    } else if diff < 0 {
        base / scale.saturating_mul(-diff)
    } else {
        base
    }
}

/// Shield absorption bonus from a block RV: half the RV, capped
pub fn shield_block_bonus(block_rv: i32, constants: &AbsorptionConstants) -> i32 {
    if block_rv > 0 {
        (block_rv / 2).min(constants.shield_block_bonus_cap)
    } else {
        0
    }
}

/// Run `incoming` SV through one layer, wearing it down by what it absorbs
pub(crate) fn absorb_layer(
    layer: &mut impl Absorber,
    kind: AbsorberKind,
    incoming: i32,
    bonus: i32,
    hit: &HitProfile,
    constants: &AbsorptionConstants,
) -> AbsorptionRecord {
    let raw = layer.absorption(hit.damage_type);
    let pierced = (raw - hit.ap_offset).max(0);
    let base = scale_for_class(pierced, layer.damage_class(), hit.damage_class, constants);

    let mut total = (base + bonus).max(0);
    let mut cap_triggered = false;
    if let Some(cap) = hit.sv_max {
        if total > cap {
            total = cap.max(0);
            cap_triggered = true;
        }
    }

    let durability_before = layer.current_durability();
    let absorbed = total.min(durability_before).min(incoming).max(0);
    let remaining_sv = if cap_triggered { 0 } else { incoming - absorbed };
    let durability_lost = layer.reduce_durability(absorbed);
    let destroyed = durability_before > 0 && !layer.is_intact();

    tracing::debug!(
        item_id = layer.item_id(),
        %kind,
        incoming,
        base,
        bonus,
        absorbed,
        remaining_sv,
        cap_triggered,
        destroyed,
        "absorption"
    );

    AbsorptionRecord {
        kind,
        item_id: layer.item_id().to_string(),
        name: layer.name().to_string(),
        incoming_sv: incoming,
        raw_absorption: raw,
        ap_offset: hit.ap_offset,
        base_absorption: base,
        bonus,
        total_absorption: total,
        absorbed,
        remaining_sv,
        durability_before,
        durability_lost,
        destroyed,
        sv_max: hit.sv_max,
        cap_triggered,
    }
}
