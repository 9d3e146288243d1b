//! Patch orchestration: survey, per-ammunition pass, then loot scaling.
use serde::Serialize;
use std::fmt;

use crate::config::TweakConfig;
use crate::constants::{ARROW_INVENTORY_CHANCE_SETTING, HUNTERS_DISCIPLINE_PERK, SKYRIM_PLUGIN};
use crate::loot::{scale_chance, scale_recover_arrow_chance};
use crate::projectile::Blacklist;
use crate::records::{AmmoRecord, RecordKey};
use crate::rename::rename_ammo;
use crate::rescale::{DamageRange, rescaled_damage, survey_damage};
use crate::store::RecordStore;

/// Header printed above the overpowered ammunition list.
pub const OVERPOWERED_WARNING: &str = "Warning: The following ammunitions were above the upper damage limit. They have been reduced to the maximum.";

/// One progress line of a patch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PatchEvent {
    DamageChanged { name: String, from: f32, to: f32 },
    ProjectileAdjusted { name: String },
    Renamed { from: String, to: String },
    GameSettingScaled { setting: String, from: i32, to: i32 },
    PerkChanceScaled { perk: String, from: f32, to: f32 },
}

impl fmt::Display for PatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DamageChanged { name, from, to } => {
                write!(f, "Changing {name} damage from {from} to {to}.")
            }
            Self::ProjectileAdjusted { name } => write!(f, "Adjusting {name} projectile."),
            Self::Renamed { from, to } => write!(f, "Renaming {from} to {to}."),
            Self::GameSettingScaled { setting, from, to } => {
                write!(f, "Setting {setting} from {from} to {to}")
            }
            Self::PerkChanceScaled { perk, from, to } => {
                write!(f, "Setting {perk} chance from {from} to {to}")
            }
        }
    }
}

/// Everything a run produced besides the overrides themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchReport {
    pub range: DamageRange,
    pub events: Vec<PatchEvent>,
    /// Ammunition whose damage exceeded the upper limit
    pub overpowered: Vec<String>,
}

impl PatchReport {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.overpowered.is_empty()
    }
}

/// Drives the rescale, rename, projectile and loot rules over a record store.
#[derive(Debug, Clone)]
pub struct AmmoPatcher {
    config: TweakConfig,
    blacklist: Blacklist,
    arrow_chance_setting: RecordKey,
    recover_arrow_perk: RecordKey,
}

impl AmmoPatcher {
    /// Patcher targeting the vanilla loot records with the vanilla blacklist.
    #[must_use]
    pub fn new(config: TweakConfig) -> Self {
        Self {
            config,
            blacklist: Blacklist::vanilla(),
            arrow_chance_setting: RecordKey::new(SKYRIM_PLUGIN, ARROW_INVENTORY_CHANCE_SETTING),
            recover_arrow_perk: RecordKey::new(SKYRIM_PLUGIN, HUNTERS_DISCIPLINE_PERK),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TweakConfig {
        &self.config
    }

    #[must_use]
    pub const fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    /// Apply every enabled rule, creating overrides in `store`.
    pub fn run<S: RecordStore>(&self, store: &mut S) -> PatchReport {
        let bounds = self.config.damage_bounds();
        let patch_ammo: Vec<AmmoRecord> = store
            .winning_ammunition()
            .into_iter()
            .filter(|ammo| ammo.playable)
            .collect();
        let survey = survey_damage(&patch_ammo, bounds);
        log::debug!(
            "damage range {}..{} over {} playable ammunition",
            survey.range.low,
            survey.range.high,
            patch_ammo.len()
        );

        let mut events = Vec::new();
        for source in &patch_ammo {
            self.patch_ammunition(store, source, survey.range, &mut events);
        }
        if self.config.scales_loot() {
            self.scale_loot(store, &mut events);
        }

        for name in &survey.overpowered {
            log::warn!("{name} exceeds the upper damage limit of {}", bounds.max);
        }
        PatchReport {
            range: survey.range,
            events,
            overpowered: survey.overpowered,
        }
    }

    fn patch_ammunition<S: RecordStore>(
        &self,
        store: &mut S,
        source: &AmmoRecord,
        range: DamageRange,
        events: &mut Vec<PatchEvent>,
    ) {
        let ammo = store.ammunition_override(source);
        ammo.weight = 0.0;

        if self.config.rescaling
            && let Some(damage) = rescaled_damage(ammo.damage, range, self.config.damage_bounds())
        {
            let from = ammo.damage;
            ammo.damage = damage;
            push_event(
                events,
                PatchEvent::DamageChanged {
                    name: ammo.name.clone().unwrap_or_default(),
                    from,
                    to: damage,
                },
            );
        }

        if self.config.speed_changes {
            self.adjust_projectile(store, source, events);
        }

        if self.config.renaming {
            let ammo = store.ammunition_override(source);
            let renamed = rename_ammo(ammo.name.as_deref(), &self.config.separator);
            if let Some(old) = ammo.name.as_deref()
                && old != renamed
            {
                push_event(
                    events,
                    PatchEvent::Renamed {
                        from: old.to_string(),
                        to: renamed.clone(),
                    },
                );
            }
            ammo.name = Some(renamed);
        }
    }

    fn adjust_projectile<S: RecordStore>(
        &self,
        store: &mut S,
        ammo: &AmmoRecord,
        events: &mut Vec<PatchEvent>,
    ) {
        let Some(link) = &ammo.projectile else {
            log::debug!("{} has no projectile link", ammo.key);
            return;
        };
        let projectile = match store.resolve_projectile(link) {
            Ok(projectile) => projectile,
            Err(err) => {
                log::debug!("skipping projectile for {}: {err}", ammo.key);
                return;
            }
        };
        if self.blacklist.contains(&projectile.key) {
            log::debug!("{} is blacklisted", projectile.key);
            return;
        }
        let targets = self.config.projectile_targets();
        if !targets.differs_from(&projectile, ammo.kind) {
            return;
        }
        push_event(
            events,
            PatchEvent::ProjectileAdjusted {
                name: projectile.name.clone().unwrap_or_default(),
            },
        );
        targets.apply(store.projectile_override(&projectile), ammo.kind);
    }

    fn scale_loot<S: RecordStore>(&self, store: &mut S, events: &mut Vec<PatchEvent>) {
        let mult = self.config.loot_mult;

        match store.resolve_game_setting(&self.arrow_chance_setting) {
            Ok(setting) => {
                let setting = store.game_setting_override(&setting);
                let from = setting.value();
                let to = scale_chance(from, mult);
                setting.data = Some(to);
                push_event(
                    events,
                    PatchEvent::GameSettingScaled {
                        setting: setting.key.editor_id.clone(),
                        from,
                        to,
                    },
                );
            }
            Err(err) => log::debug!("skipping arrow inventory chance: {err}"),
        }

        match store.resolve_perk(&self.recover_arrow_perk) {
            Ok(perk) => {
                let perk = store.perk_override(&perk);
                let label = perk.name.clone().unwrap_or_default();
                for change in scale_recover_arrow_chance(&mut perk.effects, mult) {
                    push_event(
                        events,
                        PatchEvent::PerkChanceScaled {
                            perk: label.clone(),
                            from: change.from,
                            to: change.to,
                        },
                    );
                }
            }
            Err(err) => log::debug!("skipping arrow recovery chance: {err}"),
        }
    }
}

fn push_event(events: &mut Vec<PatchEvent>, event: PatchEvent) {
    log::info!("{event}");
    events.push(event);
}
