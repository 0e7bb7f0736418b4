use crate::output::print_json;
use crate::settings::Settings;
use clap::Subcommand;
use rdm_core::config::{Config, WarnLevel};
use rdm_core::io;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Write a default rdm.yaml (never overwrites)
    Init,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(settings: &Settings, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(settings, json),
        ConfigSubcommand::Validate => validate(settings, json),
        ConfigSubcommand::Init => init(settings),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(settings: &Settings, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&settings.config);
    }
    let source = if settings.path.exists() {
        settings.path.display().to_string()
    } else {
        "defaults".to_string()
    };
    println!("# source: {source}");
    print!("{}", serde_yaml::to_string(&settings.config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let warnings = settings.config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if settings.config.has_errors() {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(settings: &Settings) -> anyhow::Result<()> {
    let mut config = Config::default();
    config.device.url = settings.config.device.url.clone();
    let data = serde_yaml::to_string(&config)?;

    if io::write_if_missing(&settings.path, data.as_bytes())? {
        println!("Wrote {}", settings.path.display());
    } else {
        println!("{} already exists, leaving it alone", settings.path.display());
    }
    Ok(())
}
