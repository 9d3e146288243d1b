//! Damage rescaling: range discovery followed by a linear remap.
use serde::{Deserialize, Serialize};

use crate::numbers::round_f32;
use crate::records::AmmoRecord;

/// Target damage window from the user configuration.
///
/// `max` doubles as the overpowered threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageBounds {
    pub min: f32,
    pub max: f32,
}

/// Observed damage range of the eligible ammunition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRange {
    pub low: f32,
    pub high: f32,
}

impl DamageRange {
    /// Starting point for discovery: inverted so any observation narrows it.
    #[must_use]
    pub const fn seed(bounds: DamageBounds) -> Self {
        Self {
            low: bounds.max,
            high: bounds.min,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.high - self.low
    }

    /// True when the range cannot be used as a divisor.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0
    }
}

/// Result of the discovery pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageSurvey {
    pub range: DamageRange,
    /// Names of ammunition above the upper damage limit, in encounter order
    pub overpowered: Vec<String>,
}

/// Zero damage marks ammunition that is left out of rescaling entirely.
#[must_use]
pub fn deals_damage(damage: f32) -> bool {
    damage != 0.0
}

/// Discover the damage range over playable ammunition and collect the
/// names of overpowered entries.
///
/// Damage above `bounds.max` never widens the range.
#[must_use]
pub fn survey_damage<'a, I>(ammo: I, bounds: DamageBounds) -> DamageSurvey
where
    I: IntoIterator<Item = &'a AmmoRecord>,
{
    let mut range = DamageRange::seed(bounds);
    let mut overpowered = Vec::new();
    for record in ammo {
        if !record.playable || !deals_damage(record.damage) {
            continue;
        }
        let damage = record.damage;
        if damage < range.low {
            range.low = damage;
        }
        if damage > range.high && damage <= bounds.max {
            range.high = damage;
        }
        if damage > bounds.max
            && let Some(name) = &record.name
        {
            overpowered.push(name.clone());
        }
    }
    DamageSurvey {
        range,
        overpowered,
    }
}

/// New damage for a single ammunition, or `None` when it deals no damage.
///
/// Overpowered damage is clamped to `bounds.max`. A degenerate range maps
/// every in-bounds value to `bounds.min`.
#[must_use]
pub fn rescaled_damage(damage: f32, range: DamageRange, bounds: DamageBounds) -> Option<f32> {
    if !deals_damage(damage) {
        return None;
    }
    if damage > bounds.max {
        return Some(bounds.max);
    }
    if range.is_degenerate() {
        return Some(bounds.min);
    }
    let scaled = (damage - range.low) / range.width() * (bounds.max - bounds.min) + bounds.min;
    Some(round_f32(scaled))
}
