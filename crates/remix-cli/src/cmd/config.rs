use crate::cmd::load_config;
use crate::output::print_json;
use clap::Subcommand;
use remix_core::config::{Config, WarnLevel};
use remix_core::credentials;
use remix_core::paths;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration and which secrets are set
    Show,

    /// Write a default .remix/config.yaml if none exists
    Init,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Init => init(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

const SECRET_VARS: [&str; 5] = [
    credentials::ENV_STORE_TOKEN,
    credentials::ENV_STORE_BASE_ID,
    credentials::ENV_STORE_TABLE_ID,
    credentials::ENV_COMPLETION_KEY,
    credentials::ENV_COMPLETION_BASE_URL,
];

fn secret_is_set(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| !v.trim().is_empty())
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let path = paths::config_path(root);
    let env_base_url = std::env::var(credentials::ENV_COMPLETION_BASE_URL)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let base_url = config.completion.effective_base_url(env_base_url.as_deref());

    if json {
        let secrets: serde_json::Map<String, serde_json::Value> = SECRET_VARS
            .iter()
            .map(|k| (k.to_string(), serde_json::Value::Bool(secret_is_set(k))))
            .collect();
        return print_json(&serde_json::json!({
            "path": path,
            "exists": path.exists(),
            "config": config,
            "effective": {
                "model": config.completion.effective_model(),
                "temperature": config.temperature(),
                "base_url": base_url,
            },
            "secrets": secrets,
        }));
    }

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", serde_yaml::to_string(&config)?);
    println!();
    println!("effective model:       {}", config.completion.effective_model());
    println!("effective temperature: {}", config.temperature());
    println!("effective endpoint:    {base_url}");
    println!();
    for key in SECRET_VARS {
        let state = if secret_is_set(key) { "set" } else { "missing" };
        println!("{key:<20} {state}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path, json: bool) -> anyhow::Result<()> {
    let created = Config::init(root)?;
    let path = paths::config_path(root);

    if json {
        return print_json(&serde_json::json!({ "path": path, "created": created }));
    }
    if created {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists; left unchanged.", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
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

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
