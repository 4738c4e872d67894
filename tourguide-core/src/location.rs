//! Geographic positions and timestamped visits.

use chrono::{DateTime, Utc};
use geo::Coord;

use crate::UserId;

/// A WGS84 position in decimal degrees.
///
/// Conversions to and from [`geo::Coord`] follow the `geo` axis order,
/// `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tourguide_core::Location;
///
/// let location = Location::new(51.5, -0.1);
/// let coord: Coord<f64> = location.into();
/// assert_eq!(coord, Coord { x: -0.1, y: 51.5 });
/// assert_eq!(Location::from(coord), location);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Degrees north of the equator.
    pub latitude: f64,
    /// Degrees east of the prime meridian.
    pub longitude: f64,
}

impl Location {
    /// Construct a location from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coord<f64>> for Location {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Location> for Coord<f64> {
    fn from(location: Location) -> Self {
        Self {
            x: location.longitude,
            y: location.latitude,
        }
    }
}

/// A position a user was observed at.
///
/// Visits are immutable once created and appended to the owning user's
/// history in chronological order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisitedLocation {
    /// The user that was observed.
    pub user_id: UserId,
    /// Where the user was.
    pub location: Location,
    /// When the observation was made.
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    /// Record a visit at an explicit time.
    #[must_use]
    pub const fn new(user_id: UserId, location: Location, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }

    /// Record a visit stamped with the current time.
    ///
    /// # Examples
    /// ```
    /// use tourguide_core::{Location, VisitedLocation};
    /// use uuid::Uuid;
    ///
    /// let user_id = Uuid::new_v4();
    /// let visit = VisitedLocation::now(user_id, Location::new(0.0, 0.0));
    /// assert_eq!(visit.user_id, user_id);
    /// ```
    #[must_use]
    pub fn now(user_id: UserId, location: Location) -> Self {
        Self::new(user_id, location, Utc::now())
    }
}
