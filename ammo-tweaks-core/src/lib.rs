//! AmmoTweaks Core
//!
//! Platform-agnostic normalization rules for ranged-weapon ammunition.
//! This crate rescales damage, renames ammunition, aligns projectile physics
//! and scales loot chances without touching files or consoles; record access
//! goes through the [`RecordStore`] trait.

pub mod config;
pub mod constants;
pub mod loot;
pub mod numbers;
pub mod patcher;
pub mod projectile;
pub mod records;
pub mod rename;
pub mod rescale;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigError, TweakConfig};
pub use loot::{ChanceChange, scale_chance, scale_chance_f32, scale_recover_arrow_chance};
pub use patcher::{AmmoPatcher, OVERPOWERED_WARNING, PatchEvent, PatchReport};
pub use projectile::{Blacklist, ProjectileTargets};
pub use records::{
    AmmoFlag, AmmoKind, AmmoRecord, EntryPoint, GameSettingRecord, PerkEffect, PerkRecord,
    ProjectileRecord, Record, RecordKey, RecordKeyError,
};
pub use rename::{NamePrefix, rename, rename_ammo, strip_category_suffix};
pub use rescale::{DamageBounds, DamageRange, DamageSurvey, rescaled_damage, survey_damage};
pub use store::{
    LoadOrder, OverrideGroup, PatchMod, Plugin, RecordKind, RecordStore, StoreError,
};
