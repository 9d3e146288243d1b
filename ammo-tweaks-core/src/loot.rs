//! Loot chance scaling for arrow drops and arrow recovery.
use crate::constants::LOOT_CHANCE_CAP;
use crate::numbers::{i32_to_f32, round_f32, round_f32_to_i32};
use crate::records::{EntryPoint, PerkEffect};

/// Scale an integer chance, rounding and capping at 100.
#[must_use]
pub fn scale_chance(value: i32, mult: f32) -> i32 {
    round_f32_to_i32(i32_to_f32(value) * mult).min(LOOT_CHANCE_CAP)
}

/// Scale a float chance, rounding and capping at 100.
#[must_use]
pub fn scale_chance_f32(value: f32, mult: f32) -> f32 {
    round_f32(value * mult).min(i32_to_f32(LOOT_CHANCE_CAP))
}

/// A single recover-arrow-chance effect that was rescaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChanceChange {
    pub from: f32,
    pub to: f32,
}

/// Scale every recover-arrow-chance effect in place.
///
/// Returns one change per matching effect; other effects are untouched.
pub fn scale_recover_arrow_chance(effects: &mut [PerkEffect], mult: f32) -> Vec<ChanceChange> {
    let mut changes = Vec::new();
    for effect in effects {
        let PerkEffect::ModifyValue {
            entry_point: EntryPoint::ModRecoverArrowChance,
            value,
        } = effect
        else {
            continue;
        };
        let from = *value;
        *value = scale_chance_f32(from, mult);
        changes.push(ChanceChange { from, to: *value });
    }
    changes
}
