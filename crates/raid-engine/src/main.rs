//! Engine binary for the camp-raid environment.
//!
//! Wires configuration, agent spawning, the coordinator, a built-in
//! decision source and the run loop together, then prints the run summary
//! as JSON on stdout.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `CAMP_RAID_CONFIG` or `camp-raid-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the coordinator and spawn both teams
//! 4. Reset the first episode
//! 5. Build the configured decision source
//! 6. Install the Ctrl-C stop handler
//! 7. Run until a limit or a stop request
//! 8. Log and print the result

mod error;
mod spawner;
mod telemetry;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use raid_agents::AgentFactory;
use raid_core::{EnvironmentConfig, EnvironmentCoordinator, RunControl, build_policy, runner};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::telemetry::TelemetryCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = "camp-raid-config.yaml";

/// Environment variable overriding the configuration path.
const CONFIG_ENV_VAR: &str = "CAMP_RAID_CONFIG";

/// Ticks between progress log lines.
const PROGRESS_EVERY_TICKS: u64 = 500;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the run itself fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging depends on it, so report afterwards.
    let path = config_path(std::env::var(CONFIG_ENV_VAR).ok());
    let (config, loaded_from_file) = load_config(&path)?;

    // 2. Initialize structured logging.
    init_tracing(config.runtime.log_json);
    info!("raid-engine starting");
    if loaded_from_file {
        info!(path = %path.display(), "configuration loaded");
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
    }
    info!(
        seed = config.runtime.seed,
        policy = ?config.runtime.policy,
        agents_per_team = config.runtime.agents_per_team,
        max_steps = config.episode.max_steps,
        win_stock_threshold = config.episode.win_stock_threshold,
        "run configuration"
    );

    // 3. Build the coordinator and spawn both teams.
    let runtime = config.runtime.clone();
    let mut env = EnvironmentCoordinator::new(config)?;
    if let Some(margin) = env.config().arena.auto_bounds_margin {
        let bounds = env.layout().bounds();
        info!(margin, ?bounds, "arena bounds derived from anchors");
    }
    let mut factory = AgentFactory::new();
    let spawned = spawner::spawn_teams(&mut env, &mut factory, runtime.agents_per_team)?;
    if spawned.is_empty() {
        warn!("no agents spawned, every episode will end on the first tick");
    } else {
        info!(agents = spawned.len(), names = ?spawned.names, "agents spawned");
    }

    // 4. First episode.
    let episode = env.reset_episode()?;
    info!(episode, "first episode reset");

    // 5. Decision source.
    let mut policy = build_policy(runtime.policy, runtime.seed, env.layout());

    // 6. Run control and Ctrl-C.
    let control = Arc::new(RunControl::from_config(&runtime));
    let stopper = Arc::clone(&control);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after the current tick");
                stopper.request_stop();
            }
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });

    // 7. Run.
    let mut callback = TelemetryCallback::new(PROGRESS_EVERY_TICKS);
    let summary = runner::run(&mut env, policy.as_mut(), &control, &mut callback).await?;

    // 8. Report.
    runner::log_run_end(&summary);
    let totals = callback.totals();
    info!(
        red_deaths = totals.deaths.red,
        blue_deaths = totals.deaths.blue,
        red_camp_raided = totals.pickups.red,
        blue_camp_raided = totals.pickups.blue,
        red_deposits = totals.deposits.red,
        blue_deposits = totals.deposits.blue,
        "raid-engine shutdown complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the default `info`.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Resolve the configuration path from the override variable's value.
fn config_path(override_value: Option<String>) -> PathBuf {
    override_value
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(EnvironmentConfig, bool), EngineError> {
    if path.exists() {
        Ok((EnvironmentConfig::from_file(path)?, true))
    } else {
        Ok((EnvironmentConfig::default(), false))
    }
}
