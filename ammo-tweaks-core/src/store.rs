//! Record store: winning records, reference resolution and patch overrides.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::constants::PATCH_NAME;
use crate::records::{
    AmmoRecord, GameSettingRecord, PerkRecord, ProjectileRecord, Record, RecordKey,
};

/// Record kinds the patcher resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Projectile,
    GameSetting,
    Perk,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projectile => write!(f, "projectile"),
            Self::GameSetting => write!(f, "game setting"),
            Self::Perk => write!(f, "perk"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {key} could not be resolved")]
    Unresolved { kind: RecordKind, key: RecordKey },
    #[error("JSON parsing error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Collaborator the patcher reads records from and writes overrides to.
///
/// Overrides are created on first request and handed back on every later
/// request for the same key.
pub trait RecordStore {
    /// Winning playable and non-playable ammunition, highest priority first, each key once.
    fn winning_ammunition(&self) -> Vec<AmmoRecord>;

    /// Resolution sees this run's overrides: a record already overridden
    /// resolves to its current override values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unresolved`] when no plugin defines the projectile.
    fn resolve_projectile(&self, key: &RecordKey) -> Result<ProjectileRecord, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Unresolved`] when no plugin defines the setting.
    fn resolve_game_setting(&self, key: &RecordKey) -> Result<GameSettingRecord, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Unresolved`] when no plugin defines the perk.
    fn resolve_perk(&self, key: &RecordKey) -> Result<PerkRecord, StoreError>;

    fn ammunition_override(&mut self, record: &AmmoRecord) -> &mut AmmoRecord;

    fn projectile_override(&mut self, record: &ProjectileRecord) -> &mut ProjectileRecord;

    fn game_setting_override(&mut self, record: &GameSettingRecord) -> &mut GameSettingRecord;

    fn perk_override(&mut self, record: &PerkRecord) -> &mut PerkRecord;
}

/// Overrides of one record kind, keyed by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideGroup<T> {
    records: BTreeMap<RecordKey, T>,
}

impl<T> Default for OverrideGroup<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: Record> OverrideGroup<T> {
    /// Copy the record on first touch, return the existing copy afterwards.
    pub fn get_or_add(&mut self, record: &T) -> &mut T {
        self.records
            .entry(record.key().clone())
            .or_insert_with(|| record.clone())
    }

    #[must_use]
    pub fn get(&self, key: &RecordKey) -> Option<&T> {
        self.records.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }
}

/// Every override created during a run, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMod {
    pub name: String,
    #[serde(default)]
    pub ammunition: OverrideGroup<AmmoRecord>,
    #[serde(default)]
    pub projectiles: OverrideGroup<ProjectileRecord>,
    #[serde(default)]
    pub game_settings: OverrideGroup<GameSettingRecord>,
    #[serde(default)]
    pub perks: OverrideGroup<PerkRecord>,
}

impl Default for PatchMod {
    fn default() -> Self {
        Self::named(PATCH_NAME)
    }
}

impl PatchMod {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ammunition: OverrideGroup::default(),
            projectiles: OverrideGroup::default(),
            game_settings: OverrideGroup::default(),
            perks: OverrideGroup::default(),
        }
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.ammunition.len() + self.projectiles.len() + self.game_settings.len() + self.perks.len()
    }

    /// Serialize the patch as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Records defined by a single plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    #[serde(default)]
    pub ammunition: Vec<AmmoRecord>,
    #[serde(default)]
    pub projectiles: Vec<ProjectileRecord>,
    #[serde(default)]
    pub game_settings: Vec<GameSettingRecord>,
    #[serde(default)]
    pub perks: Vec<PerkRecord>,
}

impl Plugin {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ammunition: Vec::new(),
            projectiles: Vec::new(),
            game_settings: Vec::new(),
            perks: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoadOrderData {
    plugins: Vec<Plugin>,
}

/// In-memory load order; later plugins override earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOrder {
    plugins: Vec<Plugin>,
    patch: PatchMod,
}

impl LoadOrder {
    /// Build from plugins listed lowest priority first.
    #[must_use]
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self {
            plugins,
            patch: PatchMod::default(),
        }
    }

    /// Parse `{ "plugins": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a load order.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let data: LoadOrderData = serde_json::from_str(json)?;
        Ok(Self::new(data.plugins))
    }

    #[must_use]
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    #[must_use]
    pub fn patch(&self) -> &PatchMod {
        &self.patch
    }

    /// Hand over the overrides for persistence.
    #[must_use]
    pub fn into_patch(self) -> PatchMod {
        self.patch
    }

    /// Current state of `key`: this run's override if one exists, otherwise
    /// the winning plugin record.
    fn current<T, F>(
        &self,
        kind: RecordKind,
        key: &RecordKey,
        overridden: Option<&T>,
        select: F,
    ) -> Result<T, StoreError>
    where
        T: Record,
        F: Fn(&Plugin) -> &[T],
    {
        overridden
            .or_else(|| {
                self.plugins
                    .iter()
                    .rev()
                    .find_map(|plugin| select(plugin).iter().find(|record| record.key() == key))
            })
            .cloned()
            .ok_or_else(|| StoreError::Unresolved {
                kind,
                key: key.clone(),
            })
    }
}

impl RecordStore for LoadOrder {
    fn winning_ammunition(&self) -> Vec<AmmoRecord> {
        let mut seen = HashSet::new();
        self.plugins
            .iter()
            .rev()
            .flat_map(|plugin| plugin.ammunition.iter())
            .filter(|record| seen.insert(record.key.clone()))
            .cloned()
            .collect()
    }

    fn resolve_projectile(&self, key: &RecordKey) -> Result<ProjectileRecord, StoreError> {
        self.current(
            RecordKind::Projectile,
            key,
            self.patch.projectiles.get(key),
            |plugin| plugin.projectiles.as_slice(),
        )
    }

    fn resolve_game_setting(&self, key: &RecordKey) -> Result<GameSettingRecord, StoreError> {
        self.current(
            RecordKind::GameSetting,
            key,
            self.patch.game_settings.get(key),
            |plugin| plugin.game_settings.as_slice(),
        )
    }

    fn resolve_perk(&self, key: &RecordKey) -> Result<PerkRecord, StoreError> {
        self.current(
            RecordKind::Perk,
            key,
            self.patch.perks.get(key),
            |plugin| plugin.perks.as_slice(),
        )
    }

    fn ammunition_override(&mut self, record: &AmmoRecord) -> &mut AmmoRecord {
        self.patch.ammunition.get_or_add(record)
    }

    fn projectile_override(&mut self, record: &ProjectileRecord) -> &mut ProjectileRecord {
        self.patch.projectiles.get_or_add(record)
    }

    fn game_setting_override(&mut self, record: &GameSettingRecord) -> &mut GameSettingRecord {
        self.patch.game_settings.get_or_add(record)
    }

    fn perk_override(&mut self, record: &PerkRecord) -> &mut PerkRecord {
        self.patch.perks.get_or_add(record)
    }
}
