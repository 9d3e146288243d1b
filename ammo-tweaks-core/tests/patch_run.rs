use ammo_tweaks_core::{
    AmmoKind, AmmoPatcher, AmmoRecord, EntryPoint, GameSettingRecord, LoadOrder, PatchEvent,
    PerkEffect, PerkRecord, Plugin, ProjectileRecord, RecordKey, TweakConfig, rename,
};

fn key(plugin: &str, editor_id: &str) -> RecordKey {
    RecordKey::new(plugin, editor_id)
}

fn ammo(editor_id: &str, name: &str, damage: f32, kind: AmmoKind) -> AmmoRecord {
    let mut record = AmmoRecord::new(key("Skyrim.esm", editor_id), Some(name), damage, kind);
    record.weight = 0.1;
    record
}

fn linked(mut record: AmmoRecord, projectile: &str) -> AmmoRecord {
    record.projectile = Some(key("Skyrim.esm", projectile));
    record
}

fn projectile(editor_id: &str, speed: f32, gravity: f32) -> ProjectileRecord {
    ProjectileRecord {
        key: key("Skyrim.esm", editor_id),
        name: Some(editor_id.to_string()),
        gravity,
        speed,
    }
}

fn arsenal() -> Vec<AmmoRecord> {
    vec![
        ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
        ammo("SteelArrow", "Steel Arrow", 10.0, AmmoKind::Arrow),
        ammo("ElvenArrow", "Elven Arrow", 16.0, AmmoKind::Arrow),
        ammo("DaedricArrow", "Daedric Arrow", 24.0, AmmoKind::Arrow),
        ammo("DragonboneArrow", "Dragonbone Arrow", 40.0, AmmoKind::Arrow),
        ammo("PracticeArrow", "Practice Arrow", 0.0, AmmoKind::Arrow),
        ammo("DwarvenBolt", "Dwarven Bolt", 14.0, AmmoKind::Bolt),
    ]
}

fn order_with(ammo: Vec<AmmoRecord>) -> LoadOrder {
    let mut plugin = Plugin::new("Skyrim.esm");
    plugin.ammunition = ammo;
    LoadOrder::new(vec![plugin])
}

fn rescale_config() -> TweakConfig {
    TweakConfig {
        rescaling: true,
        speed_changes: false,
        ..TweakConfig::default()
    }
}

fn patched_damage(order: &LoadOrder, editor_id: &str) -> f32 {
    order
        .patch()
        .ammunition
        .get(&key("Skyrim.esm", editor_id))
        .expect("override exists")
        .damage
}

#[test]
fn in_range_damage_lands_within_bounds() {
    let mut order = order_with(arsenal());
    let config = rescale_config();
    let report = AmmoPatcher::new(config.clone()).run(&mut order);

    assert!((report.range.low - 8.0).abs() < f32::EPSILON);
    assert!((report.range.high - 24.0).abs() < f32::EPSILON);
    for record in order.patch().ammunition.iter() {
        if record.damage == 0.0 {
            continue;
        }
        assert!(
            record.damage >= config.min_damage && record.damage <= config.max_damage,
            "{} rescaled to {}",
            record.label(),
            record.damage
        );
    }
    assert!((patched_damage(&order, "IronArrow") - 4.0).abs() < f32::EPSILON);
    assert!((patched_damage(&order, "DaedricArrow") - 25.0).abs() < f32::EPSILON);
    // (14 - 8) / 16 * 21 + 4 = 11.875
    assert!((patched_damage(&order, "DwarvenBolt") - 12.0).abs() < f32::EPSILON);
}

#[test]
fn overpowered_ammunition_is_clamped_and_reported_once() {
    let mut order = order_with(arsenal());
    let report = AmmoPatcher::new(rescale_config()).run(&mut order);

    assert!((patched_damage(&order, "DragonboneArrow") - 25.0).abs() < f32::EPSILON);
    assert_eq!(report.overpowered, vec!["Dragonbone Arrow".to_string()]);
    assert!(report.has_warnings());
}

#[test]
fn zero_damage_is_untouched_and_never_reported() {
    let mut order = order_with(arsenal());
    let report = AmmoPatcher::new(rescale_config()).run(&mut order);

    assert!(patched_damage(&order, "PracticeArrow").abs() < f32::EPSILON);
    assert!(!report.overpowered.contains(&"Practice Arrow".to_string()));
    assert!(!report.events.iter().any(|event| matches!(
        event,
        PatchEvent::DamageChanged { name, .. } if name == "Practice Arrow"
    )));
}

#[test]
fn weight_is_zeroed_even_without_rescaling() {
    let mut order = order_with(arsenal());
    let config = TweakConfig {
        speed_changes: false,
        ..TweakConfig::default()
    };
    let report = AmmoPatcher::new(config).run(&mut order);

    assert_eq!(order.patch().ammunition.len(), arsenal().len());
    for record in order.patch().ammunition.iter() {
        assert!(record.weight.abs() < f32::EPSILON);
    }
    assert!((patched_damage(&order, "ElvenArrow") - 16.0).abs() < f32::EPSILON);
    assert!(report.events.is_empty());
    // discovery still reports outliers when the remap is off
    assert_eq!(report.overpowered, vec!["Dragonbone Arrow".to_string()]);
}

#[test]
fn non_playable_ammunition_is_not_processed() {
    let mut hidden = ammo(
        "DLC1ElvenArrowBlood",
        "Bloodcursed Elven Arrow",
        100.0,
        AmmoKind::Arrow,
    );
    hidden.playable = false;
    let iron = ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow);
    let mut order = order_with(vec![hidden, iron]);
    let report = AmmoPatcher::new(rescale_config()).run(&mut order);

    assert_eq!(order.patch().ammunition.len(), 1);
    assert!(report.overpowered.is_empty());
}

#[test]
fn single_damage_value_falls_back_to_floor() {
    let mut order = order_with(vec![
        ammo("SteelArrow", "Steel Arrow", 10.0, AmmoKind::Arrow),
        ammo("SteelBolt", "Steel Bolt", 10.0, AmmoKind::Bolt),
    ]);
    AmmoPatcher::new(rescale_config()).run(&mut order);

    let floor = TweakConfig::default().min_damage;
    assert!((patched_damage(&order, "SteelArrow") - floor).abs() < f32::EPSILON);
    assert!((patched_damage(&order, "SteelBolt") - floor).abs() < f32::EPSILON);
}

#[test]
fn renaming_applies_to_each_override() {
    let mut order = order_with(vec![
        ammo("ElvenArrow", "Elven Arrow", 16.0, AmmoKind::Arrow),
        ammo("DwarvenBolt", "Dwarven Bolt", 14.0, AmmoKind::Bolt),
        ammo("Rune", "Rune", 5.0, AmmoKind::Bolt),
    ]);
    let config = TweakConfig {
        renaming: true,
        speed_changes: false,
        ..TweakConfig::default()
    };
    let report = AmmoPatcher::new(config).run(&mut order);

    let name = |id: &str| {
        order
            .patch()
            .ammunition
            .get(&key("Skyrim.esm", id))
            .and_then(|record| record.name.clone())
    };
    assert_eq!(name("ElvenArrow").as_deref(), Some("Arrow - Elven"));
    assert_eq!(name("DwarvenBolt").as_deref(), Some("Bolt - Dwarven"));
    assert_eq!(name("Rune").as_deref(), Some("Rune"));
    assert_eq!(report.events.len(), 2);
}

#[test]
fn renaming_is_not_idempotent() {
    assert_eq!(rename("Arrow - Elven", " - "), "Arrow - Arrow - Elven");
    assert_eq!(rename("Bolt - Dwarven", " - "), "Bolt - Bolt - Dwarven");
}

fn physics_order(ammo: Vec<AmmoRecord>, projectiles: Vec<ProjectileRecord>) -> LoadOrder {
    let mut skyrim = Plugin::new("Skyrim.esm");
    skyrim.ammunition = ammo;
    skyrim.projectiles = projectiles;
    let mut dragonborn = Plugin::new("Dragonborn.esm");
    dragonborn.projectiles = vec![ProjectileRecord {
        key: key("Dragonborn.esm", "DLC2ArrowRieklingSpearProjectile"),
        name: Some("Riekling Spear".to_string()),
        gravity: 0.5,
        speed: 2000.0,
    }];
    dragonborn.ammunition = vec![AmmoRecord {
        projectile: Some(key("Dragonborn.esm", "DLC2ArrowRieklingSpearProjectile")),
        ..AmmoRecord::new(
            key("Dragonborn.esm", "DLC2RieklingSpearThrown"),
            Some("Riekling Spear"),
            10.0,
            AmmoKind::Arrow,
        )
    }];
    LoadOrder::new(vec![skyrim, dragonborn])
}

#[test]
fn matching_physics_create_no_projectile_override() {
    let mut order = physics_order(
        vec![linked(
            ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
            "ArrowIronProjectile",
        )],
        vec![projectile("ArrowIronProjectile", 5400.0, 0.2)],
    );
    let report = AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    assert!(order.patch().projectiles.is_empty());
    assert!(report.events.is_empty());
}

#[test]
fn arrows_and_bolts_get_their_own_speed() {
    let mut order = physics_order(
        vec![
            linked(
                ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
                "ArrowIronProjectile",
            ),
            linked(
                ammo("SteelBolt", "Steel Bolt", 12.0, AmmoKind::Bolt),
                "BoltSteelProjectile",
            ),
        ],
        vec![
            projectile("ArrowIronProjectile", 3000.0, 0.34),
            projectile("BoltSteelProjectile", 8100.0, 0.34),
        ],
    );
    let report = AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    let patch = order.patch();
    let arrow = patch
        .projectiles
        .get(&key("Skyrim.esm", "ArrowIronProjectile"))
        .expect("arrow projectile adjusted");
    assert!((arrow.speed - 5400.0).abs() < f32::EPSILON);
    assert!((arrow.gravity - 0.2).abs() < f32::EPSILON);
    let bolt = patch
        .projectiles
        .get(&key("Skyrim.esm", "BoltSteelProjectile"))
        .expect("bolt projectile adjusted");
    assert!((bolt.speed - 8100.0).abs() < f32::EPSILON);
    assert!((bolt.gravity - 0.2).abs() < f32::EPSILON);
    assert_eq!(
        report
            .events
            .iter()
            .filter(|event| matches!(event, PatchEvent::ProjectileAdjusted { .. }))
            .count(),
        2
    );
}

#[test]
fn blacklisted_projectiles_are_never_adjusted() {
    let mut order = physics_order(Vec::new(), Vec::new());
    AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    assert!(order.patch().projectiles.is_empty());
    assert_eq!(order.patch().ammunition.len(), 1);
}

#[test]
fn unresolved_projectile_is_skipped() {
    let mut order = physics_order(
        vec![linked(
            ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
            "MissingProjectile",
        )],
        Vec::new(),
    );
    let report = AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    assert!(order.patch().projectiles.is_empty());
    assert!(report.events.is_empty());
}

#[test]
fn shared_projectile_uses_one_override() {
    let mut order = physics_order(
        vec![
            linked(
                ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
                "ArrowSharedProjectile",
            ),
            linked(
                ammo("IronBolt", "Iron Bolt", 8.0, AmmoKind::Bolt),
                "ArrowSharedProjectile",
            ),
        ],
        vec![projectile("ArrowSharedProjectile", 3000.0, 0.34)],
    );
    AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    assert_eq!(order.patch().projectiles.len(), 1);
}

#[test]
fn shared_projectile_is_adjusted_once() {
    let mut order = physics_order(
        vec![
            linked(
                ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
                "ArrowSharedProjectile",
            ),
            linked(
                ammo("SteelArrow", "Steel Arrow", 10.0, AmmoKind::Arrow),
                "ArrowSharedProjectile",
            ),
        ],
        vec![projectile("ArrowSharedProjectile", 3000.0, 0.34)],
    );
    let report = AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    let adjusted: Vec<_> = report
        .events
        .iter()
        .filter(|event| matches!(event, PatchEvent::ProjectileAdjusted { .. }))
        .collect();
    assert_eq!(adjusted.len(), 1);
    assert_eq!(adjusted[0].to_string(), "Adjusting ArrowSharedProjectile projectile.");
    let shared = order
        .patch()
        .projectiles
        .get(&key("Skyrim.esm", "ArrowSharedProjectile"))
        .unwrap();
    assert!((shared.speed - 5400.0).abs() < f32::EPSILON);
}

#[test]
fn projectile_shared_by_arrow_and_bolt_ends_with_bolt_speed() {
    let mut order = physics_order(
        vec![
            linked(
                ammo("IronArrow", "Iron Arrow", 8.0, AmmoKind::Arrow),
                "ArrowSharedProjectile",
            ),
            linked(
                ammo("IronBolt", "Iron Bolt", 8.0, AmmoKind::Bolt),
                "ArrowSharedProjectile",
            ),
        ],
        vec![projectile("ArrowSharedProjectile", 3000.0, 0.34)],
    );
    let report = AmmoPatcher::new(TweakConfig::default()).run(&mut order);

    let adjusted = report
        .events
        .iter()
        .filter(|event| matches!(event, PatchEvent::ProjectileAdjusted { .. }))
        .count();
    assert_eq!(adjusted, 2);
    let shared = order
        .patch()
        .projectiles
        .get(&key("Skyrim.esm", "ArrowSharedProjectile"))
        .unwrap();
    assert!((shared.speed - 8100.0).abs() < f32::EPSILON);
}

fn loot_order(setting: Option<i32>, recover_chance: f32) -> LoadOrder {
    let mut plugin = Plugin::new("Skyrim.esm");
    plugin.game_settings = vec![GameSettingRecord {
        key: key("Skyrim.esm", "iArrowInventoryChance"),
        data: setting,
    }];
    plugin.perks = vec![PerkRecord {
        key: key("Skyrim.esm", "HuntersDiscipline"),
        name: Some("Hunter's Discipline".to_string()),
        effects: vec![
            PerkEffect::ModifyValue {
                entry_point: EntryPoint::ModRecoverArrowChance,
                value: recover_chance,
            },
            PerkEffect::ModifyValue {
                entry_point: EntryPoint::ModRecoverArrowChance,
                value: 20.0,
            },
            PerkEffect::ModifyValue {
                entry_point: EntryPoint::ModAttackDamage,
                value: 40.0,
            },
        ],
    }];
    LoadOrder::new(vec![plugin])
}

fn loot_config(mult: f32) -> TweakConfig {
    TweakConfig {
        loot_mult: mult,
        ..TweakConfig::default()
    }
}

#[test]
fn unit_loot_multiplier_changes_nothing() {
    let mut order = loot_order(Some(60), 40.0);
    let report = AmmoPatcher::new(loot_config(1.0)).run(&mut order);

    assert_eq!(order.patch().record_count(), 0);
    assert!(report.events.is_empty());
}

#[test]
fn game_setting_is_scaled_and_capped() {
    let mut order = loot_order(Some(60), 40.0);
    AmmoPatcher::new(loot_config(2.0)).run(&mut order);

    let setting = order
        .patch()
        .game_settings
        .get(&key("Skyrim.esm", "iArrowInventoryChance"))
        .expect("setting override");
    assert_eq!(setting.data, Some(100));

    let mut order = loot_order(Some(30), 40.0);
    AmmoPatcher::new(loot_config(1.5)).run(&mut order);
    let setting = order
        .patch()
        .game_settings
        .get(&key("Skyrim.esm", "iArrowInventoryChance"))
        .expect("setting override");
    assert_eq!(setting.data, Some(45));
}

#[test]
fn every_recover_arrow_effect_is_scaled() {
    let mut order = loot_order(Some(10), 40.0);
    let report = AmmoPatcher::new(loot_config(3.0)).run(&mut order);

    let perk = order
        .patch()
        .perks
        .get(&key("Skyrim.esm", "HuntersDiscipline"))
        .expect("perk override");
    assert_eq!(
        perk.effects,
        vec![
            PerkEffect::ModifyValue {
                entry_point: EntryPoint::ModRecoverArrowChance,
                value: 100.0,
            },
            PerkEffect::ModifyValue {
                entry_point: EntryPoint::ModRecoverArrowChance,
                value: 60.0,
            },
            PerkEffect::ModifyValue {
                entry_point: EntryPoint::ModAttackDamage,
                value: 40.0,
            },
        ]
    );
    let lines: Vec<String> = report.events.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Setting iArrowInventoryChance from 10 to 30",
            "Setting Hunter's Discipline chance from 40 to 100",
            "Setting Hunter's Discipline chance from 20 to 60",
        ]
    );
}

#[test]
fn missing_loot_records_are_skipped() {
    let mut order = order_with(Vec::new());
    let report = AmmoPatcher::new(loot_config(2.0)).run(&mut order);

    assert_eq!(order.patch().record_count(), 0);
    assert!(report.events.is_empty());
}

#[test]
fn source_records_are_never_modified() {
    let mut order = order_with(arsenal());
    AmmoPatcher::new(TweakConfig {
        renaming: true,
        ..rescale_config()
    })
    .run(&mut order);

    assert_eq!(order.plugins()[0].ammunition, arsenal());
}
