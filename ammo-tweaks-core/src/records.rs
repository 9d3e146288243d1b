//! Record types read from a load order and written back as overrides.
//!
//! Raw flag sets are decoded once when an ammunition record is ingested,
//! so the rest of the crate only sees `playable` and [`AmmoKind`].
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity of a record: the defining plugin plus its editor id.
///
/// The textual form is `Plugin.esm:EditorId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordKey {
    pub plugin: String,
    pub editor_id: String,
}

impl RecordKey {
    #[must_use]
    pub fn new(plugin: impl Into<String>, editor_id: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            editor_id: editor_id.into(),
        }
    }
}

/// Errors raised when a record key cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordKeyError {
    #[error("record key `{0}` is missing the `Plugin:EditorId` separator")]
    MissingSeparator(String),
    #[error("record key `{0}` has an empty plugin or editor id")]
    EmptyPart(String),
}

impl FromStr for RecordKey {
    type Err = RecordKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((plugin, editor_id)) = s.split_once(':') else {
            return Err(RecordKeyError::MissingSeparator(s.to_string()));
        };
        let (plugin, editor_id) = (plugin.trim(), editor_id.trim());
        if plugin.is_empty() || editor_id.is_empty() {
            return Err(RecordKeyError::EmptyPart(s.to_string()));
        }
        Ok(Self::new(plugin, editor_id))
    }
}

impl TryFrom<String> for RecordKey {
    type Error = RecordKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordKey> for String {
    fn from(key: RecordKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.plugin, self.editor_id)
    }
}

/// Anything that can be stored in a load order or overridden by a patch.
pub trait Record: Clone {
    fn key(&self) -> &RecordKey;
}

/// Raw ammunition flags as they appear in record data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoFlag {
    IgnoresNormalWeaponResistance,
    NonPlayable,
    NonBolt,
}

/// Ammunition category; each has its own projectile speed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoKind {
    /// Ammunition carrying the `NonBolt` flag
    Arrow,
    Bolt,
}

impl AmmoKind {
    #[must_use]
    pub const fn is_bolt(self) -> bool {
        matches!(self, Self::Bolt)
    }
}

/// An ammunition record with its flags decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AmmoRecordData", into = "AmmoRecordData")]
pub struct AmmoRecord {
    pub key: RecordKey,
    pub name: Option<String>,
    /// `0.0` means the ammunition deals no damage of its own
    pub damage: f32,
    pub weight: f32,
    pub playable: bool,
    pub kind: AmmoKind,
    pub ignores_normal_weapon_resistance: bool,
    pub projectile: Option<RecordKey>,
}

impl AmmoRecord {
    /// Build a playable record with no projectile link.
    #[must_use]
    pub fn new(key: RecordKey, name: Option<&str>, damage: f32, kind: AmmoKind) -> Self {
        Self {
            key,
            name: name.map(str::to_string),
            damage,
            weight: 0.0,
            playable: true,
            kind,
            ignores_normal_weapon_resistance: false,
            projectile: None,
        }
    }

    /// Decode a raw flag set into the record's boolean fields.
    pub fn apply_flags(&mut self, flags: &[AmmoFlag]) {
        self.playable = !flags.contains(&AmmoFlag::NonPlayable);
        self.kind = if flags.contains(&AmmoFlag::NonBolt) {
            AmmoKind::Arrow
        } else {
            AmmoKind::Bolt
        };
        self.ignores_normal_weapon_resistance =
            flags.contains(&AmmoFlag::IgnoresNormalWeaponResistance);
    }

    /// Re-encode the decoded fields as a raw flag set.
    #[must_use]
    pub fn flags(&self) -> Vec<AmmoFlag> {
        let mut flags = Vec::new();
        if self.ignores_normal_weapon_resistance {
            flags.push(AmmoFlag::IgnoresNormalWeaponResistance);
        }
        if !self.playable {
            flags.push(AmmoFlag::NonPlayable);
        }
        if !self.kind.is_bolt() {
            flags.push(AmmoFlag::NonBolt);
        }
        flags
    }

    /// Display name, falling back to the editor id for log lines.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key.editor_id)
    }
}

impl Record for AmmoRecord {
    fn key(&self) -> &RecordKey {
        &self.key
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AmmoRecordData {
    key: RecordKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    damage: f32,
    #[serde(default)]
    weight: f32,
    #[serde(default)]
    flags: Vec<AmmoFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    projectile: Option<RecordKey>,
}

impl From<AmmoRecordData> for AmmoRecord {
    fn from(data: AmmoRecordData) -> Self {
        let mut record = Self {
            key: data.key,
            name: data.name,
            damage: data.damage,
            weight: data.weight,
            playable: true,
            kind: AmmoKind::Bolt,
            ignores_normal_weapon_resistance: false,
            projectile: data.projectile,
        };
        record.apply_flags(&data.flags);
        record
    }
}

impl From<AmmoRecord> for AmmoRecordData {
    fn from(record: AmmoRecord) -> Self {
        let flags = record.flags();
        Self {
            key: record.key,
            name: record.name,
            damage: record.damage,
            weight: record.weight,
            flags,
            projectile: record.projectile,
        }
    }
}

/// Projectile physics linked from an ammunition record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileRecord {
    pub key: RecordKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub gravity: f32,
    #[serde(default)]
    pub speed: f32,
}

impl Record for ProjectileRecord {
    fn key(&self) -> &RecordKey {
        &self.key
    }
}

/// Integer game setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettingRecord {
    pub key: RecordKey,
    #[serde(default)]
    pub data: Option<i32>,
}

impl GameSettingRecord {
    /// Stored value, with missing data reading as zero.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.data.unwrap_or_default()
    }
}

impl Record for GameSettingRecord {
    fn key(&self) -> &RecordKey {
        &self.key
    }
}

/// Game mechanic a perk entry point modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryPoint {
    ModAttackDamage,
    ModRecoverArrowChance,
    #[serde(other)]
    Other,
}

/// A single perk effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerkEffect {
    /// Entry point that modifies a value by a float magnitude
    ModifyValue { entry_point: EntryPoint, value: f32 },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerkRecord {
    pub key: RecordKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub effects: Vec<PerkEffect>,
}

impl Record for PerkRecord {
    fn key(&self) -> &RecordKey {
        &self.key
    }
}
