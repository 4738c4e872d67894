//! `nearby` command: rank catalog attractions around a location.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::Location;
use tourguide_rewards::{AttractionRanker, DEFAULT_NEARBY_LIMIT, TaskPool};
use uuid::Uuid;

use crate::catalog::JsonCatalog;
use crate::{
    ARG_CATALOG, ARG_LATITUDE, ARG_LIMIT, ARG_LONGITUDE, CliError, ENV_NEARBY_CATALOG,
    ENV_NEARBY_LATITUDE, ENV_NEARBY_LONGITUDE, engine_runtime, files, write_json,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the attractions of a JSON catalog by great-circle \
                 distance from a location and print the result as JSON. \
                 Entries are listed farthest first.",
    about = "Rank attractions around a location"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct NearbyArgs {
    /// Path to the JSON attraction catalog.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Latitude of the reference location in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the reference location in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Maximum number of attractions to list.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl NearbyArgs {
    fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    pub(crate) catalog: Utf8PathBuf,
    pub(crate) location: Location,
    pub(crate) limit: usize,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_NEARBY_CATALOG,
        })?;
        let latitude = args.latitude.ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_NEARBY_LATITUDE,
        })?;
        let longitude = args.longitude.ok_or(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_NEARBY_LONGITUDE,
        })?;
        Ok(Self {
            catalog,
            location: Location::new(latitude, longitude),
            limit: args.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
        })
    }
}

pub(crate) fn run_nearby(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_nearby(&config, writer)
}

pub(crate) fn execute_nearby(config: &NearbyConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    files::require_existing(&config.catalog, ARG_CATALOG)?;
    let catalog = Arc::new(JsonCatalog::load(&config.catalog)?);
    log::debug!(
        "ranking {} attractions around {:?}",
        catalog.len(),
        config.location
    );

    let runtime = engine_runtime()?;
    let points = Arc::clone(&catalog);
    let ranker = AttractionRanker::new(
        catalog,
        points,
        TaskPool::new("ranking", runtime.handle().clone(), 1),
    );
    let entries = ranker
        .nearby_attractions(Uuid::nil(), config.location, config.limit)
        .wait()?;
    write_json(writer, &entries)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NearbyConfig, CliError> {
    let merged = NearbyArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NearbyConfig::try_from(merged)
}
