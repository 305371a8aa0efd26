//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
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

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.config.storage.dir);
    ctx.output
        .kv("resolved", &ctx.storage_dir().display().to_string());

    ctx.output.info("[checkout]");
    let client_key = if ctx.config.checkout.client_key.is_empty() {
        "(not set)"
    } else {
        &ctx.config.checkout.client_key
    };
    ctx.output.kv("client_key", client_key);
    ctx.output.kv("origin", &ctx.config.checkout.origin);
    ctx.output.kv("customer_key", &ctx.config.checkout.customer_key);

    Ok(())
}

/// Writes to `--config` when given, otherwise `./agora.toml`.
fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx
        .config_path
        .clone()
        .unwrap_or_else(|| ctx.cwd.join("agora.toml"));

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if config_path.extension().is_some_and(|ext| ext == "json") {
        CliConfig::default().save(&config_path)?;
    } else {
        std::fs::write(&config_path, generate_default_config())?;
    }
    ctx.output
        .success(&format!("Created {}", config_path.display()));

    Ok(())
}
