//! Great-circle distance between two locations.
//!
//! Distances use the spherical law of cosines: the central angle between two
//! points is expressed in degrees of arc, converted to nautical miles (one
//! minute of arc per nautical mile) and finally to statute miles.

use crate::Location;

/// Statute miles in one nautical mile.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Nautical miles per degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Return the great-circle distance between `a` and `b` in statute miles.
///
/// Identical locations are exactly `0.0` apart. Malformed (NaN) coordinates
/// yield NaN, which compares false against every threshold.
///
/// # Examples
/// ```
/// use tourguide_core::{Location, distance};
///
/// let equator = Location::new(0.0, 0.0);
/// let one_degree_north = Location::new(1.0, 0.0);
/// let miles = distance(&equator, &one_degree_north);
/// assert!((miles - 69.05).abs() < 0.01);
/// assert_eq!(distance(&equator, &equator), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "great-circle distance is inherently floating-point"
)]
#[expect(
    clippy::float_cmp,
    reason = "identical inputs are detected exactly to avoid acos rounding"
)]
pub fn distance(a: &Location, b: &Location) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    // Rounding can push the cosine just past 1.0 for very close points.
    let cosine = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);
    let angle = cosine.acos();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}
