//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use ritual_bag::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, StorageBackend};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { currency, force } => init_config(&currency, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output.kv("session", ctx.session.as_str());

    ctx.output.info("");
    ctx.output.info("[bag]");
    ctx.output.kv("currency", &ctx.config.bag.currency);
    ctx.output.kv("session", &ctx.config.bag.session);

    ctx.output.info("");
    ctx.output.info("[storage]");
    let backend = match ctx.config.storage.backend {
        StorageBackend::File => "file",
        StorageBackend::Memory => "memory",
    };
    ctx.output.kv("backend", backend);
    ctx.output.kv(
        "dir",
        &ctx.resolve_config_path(&ctx.config.storage.dir).display().to_string(),
    );

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "fixture",
        ctx.config.catalog.fixture.as_deref().unwrap_or("(none)"),
    );

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output
        .kv("format", &format!("{:?}", ctx.config.logging.format).to_lowercase());

    Ok(())
}

fn init_config(currency: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let Some(currency) = Currency::from_code(currency) else {
        bail!("Unsupported currency: {}", currency);
    };

    fs::write(&config_path, generate_default_config(currency.code()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut warnings: Vec<String> = Vec::new();

    if ctx.config_path.is_none() {
        warnings.push("no config file found, using defaults".to_string());
    }

    if ctx.config.storage.backend == StorageBackend::Memory {
        warnings.push("storage.backend = \"memory\" keeps nothing between commands".to_string());
    }

    if let Some(fixture) = ctx.config.catalog.fixture.as_deref() {
        if !ctx.resolve_config_path(fixture).exists() {
            warnings.push(format!("catalog.fixture '{}' does not exist", fixture));
        }
    }

    ctx.config.validate()?;

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}
