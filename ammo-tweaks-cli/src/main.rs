mod report;

use ammo_tweaks_core::{AmmoPatcher, LoadOrder, PatchMod, PatchReport, TweakConfig};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

const DEFAULT_LOAD_ORDER_FILE: &str = "load_order.json";
const DEFAULT_PATCH_FILE: &str = "AmmoTweaks.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable progress lines
    Console,
    /// Machine-readable summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "ammo-tweaks", version)]
#[command(about = "Normalize ammunition damage, names, projectiles and loot chances")]
struct Args {
    /// User data directory holding config.json
    #[arg(long, default_value = "Data")]
    data_dir: PathBuf,

    /// Load order document (defaults to <data-dir>/load_order.json)
    #[arg(long)]
    load_order: Option<PathBuf>,

    /// Where to write the created overrides (defaults to <data-dir>/AmmoTweaks.json)
    #[arg(long)]
    patch: Option<PathBuf>,

    /// Run every rule but do not write the patch
    #[arg(long)]
    dry_run: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn load_order_path(&self) -> PathBuf {
        self.load_order
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_LOAD_ORDER_FILE))
    }

    fn patch_path(&self) -> PathBuf {
        self.patch
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_PATCH_FILE))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    // A missing config aborts before any record is read.
    let config = TweakConfig::load_from_dir(&args.data_dir)?;
    if args.verbose {
        describe_config(&config);
    }

    let (report, patch) = run_patch(&args, config)?;
    write_report(&args, &report, &patch)?;

    let console = args.report == ReportFormat::Console;
    if args.dry_run {
        if console {
            println!("{}", "🧪 Dry run: patch not written".yellow());
        }
    } else {
        let path = args.patch_path();
        persist_patch(&path, &patch)?;
        if console {
            println!("💾 Patch written to {}", path.display());
        }
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "🏹 AmmoTweaks Patcher".bright_cyan().bold());
    println!("{}", "=====================".cyan());
}

fn describe_config(config: &TweakConfig) {
    println!(
        "Damage rescaling: {} ({} - {})",
        config.rescaling, config.min_damage, config.max_damage
    );
    println!(
        "Renaming: {} (separator {:?})",
        config.renaming, config.separator
    );
    println!(
        "Projectile changes: {} (arrow {}, bolt {}, gravity {})",
        config.speed_changes, config.speed_arrow, config.speed_bolt, config.gravity
    );
    println!("Loot multiplier: {}", config.loot_mult);
}

fn load_order(path: &Path) -> Result<LoadOrder> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read load order {}", path.display()))?;
    let order = LoadOrder::from_json(&text)
        .with_context(|| format!("failed to parse load order {}", path.display()))?;
    log::debug!(
        "loaded {} plugins from {}",
        order.plugins().len(),
        path.display()
    );
    Ok(order)
}

fn run_patch(args: &Args, config: TweakConfig) -> Result<(PatchReport, PatchMod)> {
    let mut order = load_order(&args.load_order_path())?;
    let patcher = AmmoPatcher::new(config);
    if args.verbose {
        for key in patcher.blacklist().iter() {
            println!("Blacklisted projectile: {key}");
        }
    }
    let report = patcher.run(&mut order);
    Ok((report, order.into_patch()))
}

fn write_report(args: &Args, report: &PatchReport, patch: &PatchMod) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => {
            report::generate_json_report(output_target.writer(), report, patch)?;
        }
        ReportFormat::Console => {
            report::generate_console_report(output_target.writer(), report, patch)?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

fn persist_patch(path: &Path, patch: &PatchMod) -> Result<()> {
    let json = patch.to_json().context("serializing patch")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ammo-tweaks-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn base_args(data_dir: PathBuf) -> Args {
        Args {
            data_dir,
            load_order: None,
            patch: None,
            dry_run: false,
            report: ReportFormat::Json,
            output: None,
            verbose: false,
        }
    }

    #[test]
    fn default_paths_live_in_data_dir() {
        let args = base_args(PathBuf::from("Data"));
        assert_eq!(args.load_order_path(), Path::new("Data/load_order.json"));
        assert_eq!(args.patch_path(), Path::new("Data/AmmoTweaks.json"));
    }

    #[test]
    fn explicit_paths_win() {
        let mut args = base_args(PathBuf::from("Data"));
        args.load_order = Some(PathBuf::from("other/order.json"));
        args.patch = Some(PathBuf::from("out/patch.json"));
        assert_eq!(args.load_order_path(), Path::new("other/order.json"));
        assert_eq!(args.patch_path(), Path::new("out/patch.json"));
    }

    #[test]
    fn run_patch_reports_missing_load_order() {
        let dir = temp_dir("missing-order");
        let err = run_patch(&base_args(dir), TweakConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read load order"));
    }

    #[test]
    fn run_patch_and_persist_write_overrides() {
        let dir = temp_dir("persist");
        std::fs::write(
            dir.join("load_order.json"),
            r#"{
                "plugins": [
                    {
                        "name": "Skyrim.esm",
                        "ammunition": [
                            { "key": "Skyrim.esm:IronArrow", "name": "Iron Arrow", "damage": 8, "weight": 0.1, "flags": ["NonBolt"] }
                        ]
                    }
                ]
            }"#,
        )
        .expect("write load order");
        let args = base_args(dir.clone());
        let (report, patch) = run_patch(&args, TweakConfig::default()).expect("run patch");
        assert!(report.events.is_empty());
        assert_eq!(patch.ammunition.len(), 1);

        persist_patch(&args.patch_path(), &patch).expect("persist patch");
        let written = std::fs::read_to_string(dir.join("AmmoTweaks.json")).expect("read patch");
        let value: serde_json::Value = serde_json::from_str(&written).expect("patch json");
        assert_eq!(value["ammunition"]["Skyrim.esm:IronArrow"]["weight"], 0.0);
    }

    #[test]
    fn write_report_targets_output_file() {
        let dir = temp_dir("report");
        let mut args = base_args(dir.clone());
        args.output = Some(dir.join("report.json"));
        let report = PatchReport {
            range: ammo_tweaks_core::DamageRange {
                low: 4.0,
                high: 25.0,
            },
            events: Vec::new(),
            overpowered: Vec::new(),
        };
        write_report(&args, &report, &PatchMod::default()).expect("write report");
        let content = std::fs::read_to_string(dir.join("report.json")).expect("read report");
        assert!(content.contains("\"records\": 0"));
    }
}
