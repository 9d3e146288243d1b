use ammo_tweaks_core::{OVERPOWERED_WARNING, PatchMod, PatchReport};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::io::Write;

/// Progress lines followed by the overpowered warning block, if any.
pub fn generate_console_report(
    writer: &mut dyn Write,
    report: &PatchReport,
    patch: &PatchMod,
) -> Result<()> {
    for event in &report.events {
        writeln!(writer, "{event}")?;
    }

    if report.has_warnings() {
        writeln!(writer, "{}", OVERPOWERED_WARNING.yellow().bold())?;
        for name in &report.overpowered {
            writeln!(writer, "{name}")?;
        }
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} {} records overridden ({} ammunition, {} projectiles, {} game settings, {} perks)",
        "✅".green(),
        patch.record_count(),
        patch.ammunition.len(),
        patch.projectiles.len(),
        patch.game_settings.len(),
        patch.perks.len()
    )?;
    Ok(())
}

pub fn generate_json_report(
    writer: &mut dyn Write,
    report: &PatchReport,
    patch: &PatchMod,
) -> Result<()> {
    let payload = json!({
        "patch": patch.name,
        "records": patch.record_count(),
        "damage_range": report.range,
        "events": report.events,
        "messages": report.events.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "overpowered": report.overpowered,
    });
    serde_json::to_writer_pretty(&mut *writer, &payload)?;
    writeln!(writer)?;
    Ok(())
}
