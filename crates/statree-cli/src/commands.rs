use anyhow::Context as _;
use colored::Colorize;
use statree_registry::{Registry, RegistryConfig};
use statree_types::Value;
use tracing::info;

use crate::cli::*;
use crate::state::{ServerState, WorkersHandler, SERVER_TEMPLATE};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let registry = build_registry(&cli)?;
    let state = ServerState::simulated(cli.workers);

    let path = match &cli.command {
        Command::Query(args) => args.path.as_str(),
        Command::Tree => "/",
    };

    let value = registry
        .resolve_with(path, &state)
        .with_context(|| format!("{} {}", "failed to resolve".red(), path.bold()))?;

    println!("{}", render(&value, &cli.format)?);
    Ok(())
}

/// Build the registry: configured entries first, then the built-in status
/// entries. Any registration failure aborts startup.
pub fn build_registry(cli: &Cli) -> anyhow::Result<Registry> {
    let mut config = match &cli.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    config.strict_paths |= cli.strict;

    let mut registry = Registry::from_config(config)?;
    registry.register_template("/status", &SERVER_TEMPLATE)?;
    registry.register("/status", WorkersHandler::entry())?;

    info!(workers = cli.workers, strict = registry.config().strict_paths, "registry ready");
    Ok(registry)
}

fn render(value: &Value, format: &OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Text => value.to_string(),
    })
}
