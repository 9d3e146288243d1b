//! Projectile physics alignment for arrows and bolts.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::{
    DRAGONBORN_PLUGIN, RIEKLING_SPEAR_PROJECTILE, SKYRIM_PLUGIN, TUTORIAL_STEEL_ARROW_PROJECTILE,
};
use crate::records::{AmmoKind, ProjectileRecord, RecordKey};

/// Target physics for adjusted projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTargets {
    pub speed_arrow: f32,
    pub speed_bolt: f32,
    pub gravity: f32,
}

impl ProjectileTargets {
    #[must_use]
    pub const fn speed_for(&self, kind: AmmoKind) -> f32 {
        match kind {
            AmmoKind::Arrow => self.speed_arrow,
            AmmoKind::Bolt => self.speed_bolt,
        }
    }

    /// Exact comparison against the current values; any difference counts.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn differs_from(&self, projectile: &ProjectileRecord, kind: AmmoKind) -> bool {
        projectile.gravity != self.gravity || projectile.speed != self.speed_for(kind)
    }

    /// Overwrite gravity and the category speed on an override.
    pub fn apply(&self, projectile: &mut ProjectileRecord, kind: AmmoKind) {
        projectile.gravity = self.gravity;
        projectile.speed = self.speed_for(kind);
    }
}

/// Projectiles that are never adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blacklist {
    keys: BTreeSet<RecordKey>,
}

impl Blacklist {
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = RecordKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Riekling spears and the opening-sequence steel arrows.
    #[must_use]
    pub fn vanilla() -> Self {
        Self::new([
            RecordKey::new(DRAGONBORN_PLUGIN, RIEKLING_SPEAR_PROJECTILE),
            RecordKey::new(SKYRIM_PLUGIN, TUTORIAL_STEEL_ARROW_PROJECTILE),
        ])
    }

    #[must_use]
    pub fn contains(&self, key: &RecordKey) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordKey> {
        self.keys.iter()
    }
}
