//! User options read from `config.json`.
//!
//! Each key is read on its own: a missing key or a value of the wrong type
//! silently falls back to its default instead of failing the whole document.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_GRAVITY, DEFAULT_LOOT_MULT, DEFAULT_MAX_DAMAGE, DEFAULT_MIN_DAMAGE,
    DEFAULT_RENAMING, DEFAULT_RESCALING, DEFAULT_SEPARATOR, DEFAULT_SPEED_ARROW,
    DEFAULT_SPEED_BOLT, DEFAULT_SPEED_CHANGES,
};
use crate::projectile::ProjectileTargets;
use crate::rescale::DamageBounds;

/// Errors raised while locating or parsing the configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("\"{file}\" cannot be found in the users Data folder ({})", .dir.display())]
    NotFound { file: &'static str, dir: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("configuration must be a JSON object")]
    NotAnObject,
}

/// Options for a single patch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweakConfig {
    pub rescaling: bool,
    pub min_damage: f32,
    pub max_damage: f32,
    pub loot_mult: f32,
    pub renaming: bool,
    pub separator: String,
    pub speed_changes: bool,
    pub speed_arrow: f32,
    pub speed_bolt: f32,
    pub gravity: f32,
}

impl Default for TweakConfig {
    fn default() -> Self {
        Self {
            rescaling: DEFAULT_RESCALING,
            min_damage: DEFAULT_MIN_DAMAGE,
            max_damage: DEFAULT_MAX_DAMAGE,
            loot_mult: DEFAULT_LOOT_MULT,
            renaming: DEFAULT_RENAMING,
            separator: DEFAULT_SEPARATOR.to_string(),
            speed_changes: DEFAULT_SPEED_CHANGES,
            speed_arrow: DEFAULT_SPEED_ARROW,
            speed_bolt: DEFAULT_SPEED_BOLT,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl TweakConfig {
    /// Load `config.json` from the user data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file does not exist, and an
    /// I/O or parse error when it cannot be read as a JSON object.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                file: CONFIG_FILE_NAME,
                dir: dir.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or is not an object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self::from_map(&map)),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Read every option from a JSON object, substituting defaults per key.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            rescaling: read_bool(map, "rescaling").unwrap_or(defaults.rescaling),
            min_damage: read_f32(map, "minDamage").unwrap_or(defaults.min_damage),
            max_damage: read_f32(map, "maxDamage").unwrap_or(defaults.max_damage),
            loot_mult: read_f32(map, "lootMult").unwrap_or(defaults.loot_mult),
            renaming: read_bool(map, "renaming").unwrap_or(defaults.renaming),
            separator: read_string(map, "separator").unwrap_or(defaults.separator),
            speed_changes: read_bool(map, "speedChanges").unwrap_or(defaults.speed_changes),
            speed_arrow: read_f32(map, "speedArrow").unwrap_or(defaults.speed_arrow),
            speed_bolt: read_f32(map, "speedBolt").unwrap_or(defaults.speed_bolt),
            gravity: read_f32(map, "gravity").unwrap_or(defaults.gravity),
        }
    }

    #[must_use]
    pub const fn damage_bounds(&self) -> DamageBounds {
        DamageBounds {
            min: self.min_damage,
            max: self.max_damage,
        }
    }

    #[must_use]
    pub const fn projectile_targets(&self) -> ProjectileTargets {
        ProjectileTargets {
            speed_arrow: self.speed_arrow,
            speed_bolt: self.speed_bolt,
            gravity: self.gravity,
        }
    }

    /// Loot scaling only runs for a multiplier other than one.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn scales_loot(&self) -> bool {
        self.loot_mult != 1.0
    }
}

fn read_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

fn read_f32(map: &Map<String, Value>, key: &str) -> Option<f32> {
    map.get(key)
        .and_then(Value::as_f64)
        .and_then(num_traits::cast::<f64, f32>)
        .filter(|value| value.is_finite())
}

fn read_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
