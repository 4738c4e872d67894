//! JSON attraction catalog serving both attractions and reward points.

use std::collections::HashMap;

use camino::Utf8Path;
use serde::Deserialize;
use tourguide_core::{
    Attraction, AttractionCatalog, AttractionId, Location, ProviderError, RewardPointOracle,
    UserId,
};
use uuid::Uuid;

use crate::{ARG_CATALOG, CliError, files};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    attractions: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default = "Uuid::new_v4")]
    id: AttractionId,
    name: String,
    latitude: f64,
    longitude: f64,
    reward_points: i32,
}

/// Attractions loaded from a catalog file.
///
/// Each attraction carries a fixed point value, so the same catalog answers
/// reward-point lookups for every user.
#[derive(Debug, Clone, Default)]
pub(crate) struct JsonCatalog {
    attractions: Vec<Attraction>,
    points: HashMap<AttractionId, i32>,
}

impl JsonCatalog {
    /// Load and decode the catalog at `path`.
    pub(crate) fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let document: CatalogDocument = files::read_json(path, ARG_CATALOG)?;
        Ok(Self::from_entries(document.attractions))
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.points.insert(entry.id, entry.reward_points);
            catalog.attractions.push(Attraction::new(
                entry.id,
                entry.name,
                Location::new(entry.latitude, entry.longitude),
            ));
        }
        catalog
    }

    pub(crate) fn len(&self) -> usize {
        self.attractions.len()
    }
}

impl AttractionCatalog for JsonCatalog {
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        Ok(self.attractions.clone())
    }
}

impl RewardPointOracle for JsonCatalog {
    fn reward_points(
        &self,
        attraction_id: AttractionId,
        _user_id: UserId,
    ) -> Result<i32, ProviderError> {
        self.points
            .get(&attraction_id)
            .copied()
            .ok_or(ProviderError::UnknownAttraction { attraction_id })
    }
}
