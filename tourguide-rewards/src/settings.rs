//! Engine configuration.

use serde::{Deserialize, Serialize};
use tourguide_core::{ProximityConfig, ProximityConfigError};

use crate::{DEFAULT_NEARBY_LIMIT, REWARD_POOL_SIZE, TRACKING_POOL_SIZE};

/// Sizing and threshold settings for a [`TourGuide`](crate::TourGuide).
///
/// Missing fields fall back to their defaults when deserialising.
///
/// # Examples
/// ```
/// use tourguide_rewards::EngineSettings;
///
/// let settings: EngineSettings =
///     serde_json::from_str(r#"{ "nearby_limit": 3, "proximity": { "proximity_buffer": 2.5 } }"#)?;
/// assert_eq!(settings.nearby_limit, 3);
/// assert_eq!(settings.reward_pool_size, 1000);
/// assert_eq!(settings.proximity.attraction_proximity_range, 200.0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Concurrent reward scans.
    pub reward_pool_size: usize,
    /// Concurrent location lookups.
    pub tracking_pool_size: usize,
    /// Entries returned by nearby-attraction rankings.
    pub nearby_limit: usize,
    /// Proximity thresholds.
    pub proximity: ProximityConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reward_pool_size: REWARD_POOL_SIZE,
            tracking_pool_size: TRACKING_POOL_SIZE,
            nearby_limit: DEFAULT_NEARBY_LIMIT,
            proximity: ProximityConfig::default(),
        }
    }
}

impl EngineSettings {
    /// Check the proximity thresholds.
    ///
    /// Pool sizes of zero are accepted and raised to one by [`TaskPool`].
    ///
    /// # Errors
    /// Returns the [`ProximityConfigError`] for the first bad threshold.
    ///
    /// [`TaskPool`]: crate::TaskPool
    pub fn validate(self) -> Result<Self, ProximityConfigError> {
        self.proximity.validate()?;
        Ok(self)
    }
}
