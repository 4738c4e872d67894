//! Attractions offered by a catalog.

use uuid::Uuid;

use crate::Location;

/// Identifier assigned to an attraction by the catalog.
pub type AttractionId = Uuid;

/// A point of interest that can earn a visitor reward points.
///
/// Attractions are supplied by an
/// [`AttractionCatalog`](crate::AttractionCatalog) and outlive the engine.
/// Names are unique within a catalog and act as the reward deduplication key.
///
/// # Examples
/// ```
/// use tourguide_core::{Attraction, Location};
/// use uuid::Uuid;
///
/// let attraction = Attraction::new(Uuid::nil(), "Disneyland", Location::new(33.817595, -117.922008));
/// assert_eq!(attraction.name, "Disneyland");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attraction {
    /// Catalog identifier, used as the reward-point lookup key.
    pub id: AttractionId,
    /// Display name; unique per catalog.
    pub name: String,
    /// Position of the attraction.
    pub location: Location,
}

impl Attraction {
    /// Construct an attraction.
    #[must_use]
    pub fn new(id: AttractionId, name: impl Into<String>, location: Location) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }

    /// Construct an attraction with a freshly generated identifier.
    ///
    /// # Examples
    /// ```
    /// use tourguide_core::{Attraction, Location};
    ///
    /// let a = Attraction::with_random_id("Museum", Location::new(0.0, 0.0));
    /// let b = Attraction::with_random_id("Museum", Location::new(0.0, 0.0));
    /// assert_ne!(a.id, b.id);
    /// ```
    #[must_use]
    pub fn with_random_id(name: impl Into<String>, location: Location) -> Self {
        Self::new(Uuid::new_v4(), name, location)
    }
}
