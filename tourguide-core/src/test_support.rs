//! Deterministic collaborator doubles used by unit, behaviour and benchmark
//! code.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{
    Attraction, AttractionCatalog, AttractionId, Location, LocationOracle, ProviderError,
    RewardPointOracle, UserId,
};

/// In-memory `AttractionCatalog` returning a copy of its attractions.
#[derive(Default, Debug, Clone)]
pub struct MemoryCatalog {
    attractions: Vec<Attraction>,
}

impl MemoryCatalog {
    /// Create a catalog from a collection of attractions.
    #[must_use]
    pub fn with_attractions<I>(attractions: I) -> Self
    where
        I: IntoIterator<Item = Attraction>,
    {
        Self {
            attractions: attractions.into_iter().collect(),
        }
    }

    /// Attractions held by the catalog.
    #[must_use]
    pub fn as_slice(&self) -> &[Attraction] {
        &self.attractions
    }
}

impl AttractionCatalog for MemoryCatalog {
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        Ok(self.attractions.clone())
    }
}

/// `AttractionCatalog` that always fails.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingCatalog;

impl AttractionCatalog for FailingCatalog {
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        Err(ProviderError::unavailable("catalog", "catalog offline"))
    }
}

/// `LocationOracle` that reports the same position for everyone, optionally
/// after a delay.
#[derive(Debug, Copy, Clone)]
pub struct FixedLocationOracle {
    location: Location,
    delay: Duration,
}

impl FixedLocationOracle {
    /// Report `location` immediately.
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            delay: Duration::ZERO,
        }
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl LocationOracle for FixedLocationOracle {
    fn current_location(&self, _user_id: UserId) -> Result<Location, ProviderError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(self.location)
    }
}

/// `LocationOracle` replaying a scripted sequence of positions.
///
/// Once the script is exhausted the last position repeats; an empty script
/// fails every call.
#[derive(Debug, Default)]
pub struct ScriptedLocationOracle {
    script: Mutex<(Vec<Location>, usize)>,
}

impl ScriptedLocationOracle {
    /// Replay `locations` in order.
    #[must_use]
    pub fn new<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = Location>,
    {
        Self {
            script: Mutex::new((locations.into_iter().collect(), 0)),
        }
    }
}

impl LocationOracle for ScriptedLocationOracle {
    fn current_location(&self, _user_id: UserId) -> Result<Location, ProviderError> {
        let mut guard = self.script.lock();
        let (locations, cursor) = &mut *guard;
        let location = locations
            .get(*cursor)
            .or_else(|| locations.last())
            .copied()
            .ok_or_else(|| ProviderError::unavailable("location oracle", "empty script"))?;
        *cursor = cursor.saturating_add(1);
        Ok(location)
    }
}

/// `LocationOracle` that always fails.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingLocationOracle;

impl LocationOracle for FailingLocationOracle {
    fn current_location(&self, _user_id: UserId) -> Result<Location, ProviderError> {
        Err(ProviderError::unavailable("location oracle", "gps offline"))
    }
}

/// `RewardPointOracle` granting the same points for every attraction.
#[derive(Debug, Copy, Clone)]
pub struct ConstantPointsOracle(pub i32);

impl RewardPointOracle for ConstantPointsOracle {
    fn reward_points(
        &self,
        _attraction_id: AttractionId,
        _user_id: UserId,
    ) -> Result<i32, ProviderError> {
        Ok(self.0)
    }
}

/// `RewardPointOracle` granting the same points after sleeping for a fixed
/// delay on every lookup.
#[derive(Debug, Copy, Clone)]
pub struct DelayedPointsOracle {
    points: i32,
    delay: Duration,
}

impl DelayedPointsOracle {
    /// Grant `points` for every attraction after sleeping for `delay`.
    #[must_use]
    pub const fn new(points: i32, delay: Duration) -> Self {
        Self { points, delay }
    }
}

impl RewardPointOracle for DelayedPointsOracle {
    fn reward_points(
        &self,
        _attraction_id: AttractionId,
        _user_id: UserId,
    ) -> Result<i32, ProviderError> {
        std::thread::sleep(self.delay);
        Ok(self.points)
    }
}

/// `RewardPointOracle` backed by a lookup table keyed by attraction.
///
/// Unknown attractions fail with [`ProviderError::UnknownAttraction`].
#[derive(Debug, Default, Clone)]
pub struct TablePointsOracle {
    points: HashMap<AttractionId, i32>,
}

impl TablePointsOracle {
    /// Build a table from `(attraction, points)` pairs.
    #[must_use]
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (AttractionId, i32)>,
    {
        Self {
            points: points.into_iter().collect(),
        }
    }
}

impl RewardPointOracle for TablePointsOracle {
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

/// `RewardPointOracle` that always fails.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingPointsOracle;

impl RewardPointOracle for FailingPointsOracle {
    fn reward_points(
        &self,
        _attraction_id: AttractionId,
        _user_id: UserId,
    ) -> Result<i32, ProviderError> {
        Err(ProviderError::unavailable("reward oracle", "rewards offline"))
    }
}
