//! Command-line interface for the tour guide reward engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

mod catalog;
mod error;
mod files;
mod nearby;
mod rewards;

pub use error::CliError;

use nearby::{NearbyArgs, run_nearby};
use rewards::{RewardsArgs, run_rewards};

pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_VISITS: &str = "visits";
pub(crate) const ARG_PROXIMITY_BUFFER: &str = "proximity-buffer";
pub(crate) const ENV_NEARBY_CATALOG: &str = "TOURGUIDE_CMDS_NEARBY_CATALOG";
pub(crate) const ENV_NEARBY_LATITUDE: &str = "TOURGUIDE_CMDS_NEARBY_LATITUDE";
pub(crate) const ENV_NEARBY_LONGITUDE: &str = "TOURGUIDE_CMDS_NEARBY_LONGITUDE";
pub(crate) const ENV_REWARDS_CATALOG: &str = "TOURGUIDE_CMDS_REWARDS_CATALOG";
pub(crate) const ENV_REWARDS_VISITS: &str = "TOURGUIDE_CMDS_REWARDS_VISITS";

/// Run the tour guide CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Nearby(args) => run_nearby(args, &mut stdout),
        Command::Rewards(args) => run_rewards(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tourguide",
    about = "Rank attractions and compute visit rewards from a JSON catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank catalog attractions around a location.
    Nearby(NearbyArgs),
    /// Compute the rewards earned by a visit history.
    Rewards(RewardsArgs),
}

fn engine_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .thread_name("tourguide-worker")
        .build()
        .map_err(CliError::Runtime)
}

fn write_json<T: serde::Serialize>(
    writer: &mut dyn std::io::Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
