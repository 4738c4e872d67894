//! Distance thresholds that classify a location as close to an attraction.
//!
//! Two independent thresholds exist. The *proximity buffer* is tight and
//! decides whether a visit earns a reward. The *attraction proximity range*
//! is wide and answers general "is this attraction nearby" questions for
//! callers. Changing one never affects the other.

use thiserror::Error;

use crate::{Attraction, Location, VisitedLocation, distance};

/// Default proximity buffer in statute miles.
pub const DEFAULT_PROXIMITY_BUFFER: f64 = 10.0;

/// Default attraction proximity range in statute miles.
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE: f64 = 200.0;

/// Proximity thresholds in statute miles.
///
/// # Examples
/// ```
/// use tourguide_core::ProximityConfig;
///
/// let config = ProximityConfig::default().with_proximity_buffer(25.0);
/// assert_eq!(config.proximity_buffer, 25.0);
/// assert_eq!(config.attraction_proximity_range, 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ProximityConfig {
    /// Maximum distance between a visit and an attraction that earns a reward.
    pub proximity_buffer: f64,
    /// Maximum distance at which an attraction counts as within range.
    pub attraction_proximity_range: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            proximity_buffer: DEFAULT_PROXIMITY_BUFFER,
            attraction_proximity_range: DEFAULT_ATTRACTION_PROXIMITY_RANGE,
        }
    }
}

/// Errors returned by [`ProximityConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProximityConfigError {
    /// A threshold was negative, infinite or NaN.
    #[error("{field} must be a finite, non-negative distance in miles (got {value})")]
    InvalidThreshold {
        /// Name of the offending threshold.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl ProximityConfig {
    /// Replace the proximity buffer.
    #[must_use]
    pub const fn with_proximity_buffer(mut self, miles: f64) -> Self {
        self.proximity_buffer = miles;
        self
    }

    /// Replace the attraction proximity range.
    #[must_use]
    pub const fn with_attraction_proximity_range(mut self, miles: f64) -> Self {
        self.attraction_proximity_range = miles;
        self
    }

    /// Check that both thresholds are usable distances.
    ///
    /// # Errors
    /// Returns [`ProximityConfigError::InvalidThreshold`] naming the first
    /// threshold that is negative or not finite.
    ///
    /// # Examples
    /// ```
    /// use tourguide_core::ProximityConfig;
    ///
    /// assert!(ProximityConfig::default().validate().is_ok());
    /// assert!(ProximityConfig::default().with_proximity_buffer(-1.0).validate().is_err());
    /// ```
    pub fn validate(self) -> Result<Self, ProximityConfigError> {
        check_threshold("proximity_buffer", self.proximity_buffer)?;
        check_threshold(
            "attraction_proximity_range",
            self.attraction_proximity_range,
        )?;
        Ok(self)
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ProximityConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProximityConfigError::InvalidThreshold { field, value })
    }
}

/// Classifies locations against the configured thresholds.
///
/// The policy owns its configuration value; there is no process-wide state.
/// [`ProximityPolicy::reset_proximity_buffer`] restores the buffer the policy
/// was constructed with, while [`ProximityPolicy::set_proximity_buffer`]
/// overrides it freely.
///
/// # Examples
/// ```
/// use tourguide_core::{Attraction, Location, ProximityConfig, ProximityPolicy, VisitedLocation};
/// use uuid::Uuid;
///
/// let mut policy = ProximityPolicy::new(ProximityConfig::default());
/// let attraction = Attraction::new(Uuid::nil(), "Origin", Location::new(0.0, 0.0));
/// let visit = VisitedLocation::now(Uuid::nil(), Location::new(1.0, 0.0));
///
/// assert!(!policy.is_near_attraction(&visit, &attraction));
/// policy.set_proximity_buffer(100.0);
/// assert!(policy.is_near_attraction(&visit, &attraction));
/// policy.reset_proximity_buffer();
/// assert_eq!(policy.proximity_buffer(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityPolicy {
    default_proximity_buffer: f64,
    config: ProximityConfig,
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        Self::new(ProximityConfig::default())
    }
}

impl ProximityPolicy {
    /// Build a policy whose reset target is `config.proximity_buffer`.
    #[must_use]
    pub const fn new(config: ProximityConfig) -> Self {
        Self {
            default_proximity_buffer: config.proximity_buffer,
            config,
        }
    }

    /// Current thresholds.
    #[must_use]
    pub const fn config(&self) -> ProximityConfig {
        self.config
    }

    /// Tight threshold used for reward eligibility.
    #[must_use]
    pub const fn proximity_buffer(&self) -> f64 {
        self.config.proximity_buffer
    }

    /// Wide threshold used for general proximity checks.
    #[must_use]
    pub const fn attraction_proximity_range(&self) -> f64 {
        self.config.attraction_proximity_range
    }

    /// Override the proximity buffer.
    pub const fn set_proximity_buffer(&mut self, miles: f64) {
        self.config.proximity_buffer = miles;
    }

    /// Restore the proximity buffer the policy was built with.
    pub const fn reset_proximity_buffer(&mut self) {
        self.config.proximity_buffer = self.default_proximity_buffer;
    }

    /// Override the attraction proximity range.
    pub const fn set_attraction_proximity_range(&mut self, miles: f64) {
        self.config.attraction_proximity_range = miles;
    }

    /// Whether `location` lies within the attraction proximity range.
    ///
    /// The boundary is inclusive. NaN distances are never within range.
    #[must_use]
    pub fn is_within_attraction_proximity(&self, attraction: &Attraction, location: &Location) -> bool {
        distance(&attraction.location, location) <= self.config.attraction_proximity_range
    }

    /// Whether a visit was close enough to `attraction` to earn a reward.
    ///
    /// The boundary is inclusive. NaN distances are never near.
    #[must_use]
    pub fn is_near_attraction(&self, visited: &VisitedLocation, attraction: &Attraction) -> bool {
        distance(&attraction.location, &visited.location) <= self.config.proximity_buffer
    }
}
