//! `rewards` command: score a visit history against a catalog.

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::{Location, ProximityConfig, ProximityPolicy, User, UserReward, VisitedLocation};
use tourguide_rewards::{RewardEngine, TaskPool};

use crate::catalog::JsonCatalog;
use crate::{
    ARG_CATALOG, ARG_PROXIMITY_BUFFER, ARG_VISITS, CliError, ENV_REWARDS_CATALOG,
    ENV_REWARDS_VISITS, engine_runtime, files, write_json,
};

/// CLI arguments for the `rewards` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Replay a JSON list of visited locations against a JSON \
                 catalog and print the rewards earned. Each attraction is \
                 rewarded at most once.",
    about = "Compute rewards for a visit history"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct RewardsArgs {
    /// Path to the JSON attraction catalog.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Path to a JSON array of visited locations, oldest first.
    #[arg(long = ARG_VISITS, value_name = "path")]
    #[serde(default)]
    pub(crate) visits: Option<Utf8PathBuf>,
    /// Reward radius around each attraction in statute miles.
    #[arg(long = ARG_PROXIMITY_BUFFER, value_name = "miles")]
    #[serde(default)]
    pub(crate) proximity_buffer: Option<f64>,
}

impl RewardsArgs {
    fn into_config(self) -> Result<RewardsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RewardsConfig::try_from(merged)
    }
}

/// Resolved `rewards` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RewardsConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) visits: Utf8PathBuf,
    pub(crate) proximity: ProximityConfig,
}

impl TryFrom<RewardsArgs> for RewardsConfig {
    type Error = CliError;

    fn try_from(args: RewardsArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_REWARDS_CATALOG,
        })?;
        let visits = args.visits.ok_or(CliError::MissingArgument {
            field: ARG_VISITS,
            env: ENV_REWARDS_VISITS,
        })?;
        let mut proximity = ProximityConfig::default();
        if let Some(miles) = args.proximity_buffer {
            proximity = proximity.with_proximity_buffer(miles);
        }
        Ok(Self {
            catalog,
            visits,
            proximity: proximity.validate()?,
        })
    }
}

/// Rewards printed by the command.
#[derive(Debug, Serialize)]
pub(crate) struct RewardsReport {
    pub(crate) rewards: Vec<UserReward>,
    pub(crate) total_reward_points: i64,
}

pub(crate) fn run_rewards(args: RewardsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_rewards(&config)?;
    write_json(writer, &report)
}

pub(crate) fn execute_rewards(config: &RewardsConfig) -> Result<RewardsReport, CliError> {
    files::require_existing(&config.catalog, ARG_CATALOG)?;
    files::require_existing(&config.visits, ARG_VISITS)?;
    let catalog = Arc::new(JsonCatalog::load(&config.catalog)?);
    let user = Arc::new(User::new("cli"));
    for location in load_visits(&config.visits)? {
        user.add_visited_location(VisitedLocation::now(user.id(), location));
    }

    let runtime = engine_runtime()?;
    let points = Arc::clone(&catalog);
    let engine = RewardEngine::new(
        catalog,
        points,
        TaskPool::new("rewards", runtime.handle().clone(), 1),
    )
    .with_policy(ProximityPolicy::new(config.proximity));
    engine.calculate_rewards(Arc::clone(&user)).wait()?;

    Ok(RewardsReport {
        rewards: user.rewards(),
        total_reward_points: user.total_reward_points(),
    })
}

pub(crate) fn load_visits(path: &Utf8Path) -> Result<Vec<Location>, CliError> {
    files::read_json(path, ARG_VISITS)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RewardsConfig, CliError> {
    let merged = RewardsArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RewardsConfig::try_from(merged)
}
