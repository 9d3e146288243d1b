//! Centralized defaults and well-known record identities for AmmoTweaks.
//!
//! Defaults mirror the documented `config.json` options. Record identities
//! name the vanilla records the loot scaler and blacklist target.

// Config defaults ----------------------------------------------------------
pub const DEFAULT_RESCALING: bool = false;
pub const DEFAULT_MIN_DAMAGE: f32 = 4.0;
pub const DEFAULT_MAX_DAMAGE: f32 = 25.0;
pub const DEFAULT_LOOT_MULT: f32 = 1.0;
pub const DEFAULT_RENAMING: bool = false;
pub const DEFAULT_SEPARATOR: &str = " - ";
pub const DEFAULT_SPEED_CHANGES: bool = true;
pub const DEFAULT_SPEED_ARROW: f32 = 5400.0;
pub const DEFAULT_SPEED_BOLT: f32 = 8100.0;
pub const DEFAULT_GRAVITY: f32 = 0.2;

// Config file --------------------------------------------------------------
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const PATCH_NAME: &str = "AmmoTweaks.esp";

// Loot ---------------------------------------------------------------------
/// Upper bound applied to every scaled loot chance.
pub const LOOT_CHANCE_CAP: i32 = 100;

// Plugins ------------------------------------------------------------------
pub const SKYRIM_PLUGIN: &str = "Skyrim.esm";
pub const DRAGONBORN_PLUGIN: &str = "Dragonborn.esm";

// Well-known records -------------------------------------------------------
pub const ARROW_INVENTORY_CHANCE_SETTING: &str = "iArrowInventoryChance";
pub const HUNTERS_DISCIPLINE_PERK: &str = "HuntersDiscipline";
pub const RIEKLING_SPEAR_PROJECTILE: &str = "DLC2ArrowRieklingSpearProjectile";
pub const TUTORIAL_STEEL_ARROW_PROJECTILE: &str = "MQ101ArrowSteelProjectile";
