use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use pushgate_core::config::{ConfigWarning, GateConfig, WarnLevel};
use pushgate_core::io::write_if_missing;
use pushgate_core::paths;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (file merged over defaults)
    Show {
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Check the configuration for common mistakes
    Validate {
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Write a default .pushgate.yaml if none exists
    Init,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show { json } => show(root, json),
        ConfigSubcommand::Validate { json } => validate(root, json),
        ConfigSubcommand::Init => init(root),
    }
}

fn load(root: &Path) -> anyhow::Result<GateConfig> {
    GateConfig::load(root)
        .with_context(|| format!("failed to load {}", paths::config_path(root).display()))
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(root)?;
    if json {
        print_json(&config)?;
    } else {
        print!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load(root)?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        print!("{}", render_warnings(&warnings));
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn level_label(level: &WarnLevel) -> &'static str {
    match level {
        WarnLevel::Warning => "warning",
        WarnLevel::Error => "error",
    }
}

/// One `LEVEL  message` line per warning, errors first.
fn render_warnings(warnings: &[ConfigWarning]) -> String {
    let mut sorted: Vec<&ConfigWarning> = warnings.iter().collect();
    sorted.sort_by_key(|w| w.level != WarnLevel::Error);
    let width = sorted
        .iter()
        .map(|w| level_label(&w.level).len())
        .max()
        .unwrap_or(0);
    sorted
        .iter()
        .map(|w| format!("{:<width$}  {}\n", level_label(&w.level), w.message))
        .collect()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let data = serde_yaml::to_string(&GateConfig::default())?;
    let written = write_if_missing(&path, data.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if written {
        println!("Wrote {}", path.display());
    } else {
        println!("{} already exists; left unchanged", path.display());
    }
    Ok(())
}
