//! Collaborators consumed by the reward engine.
//!
//! The engine does not fetch live positions, catalog data or reward points
//! itself. Callers plug in implementations of the traits below. Every call may
//! block, so the engine only invokes them from worker threads set aside for
//! blocking work.

use thiserror::Error;

use crate::{Attraction, AttractionId, Location, UserId};

/// Failures reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The collaborator could not answer.
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        /// Name of the failing collaborator.
        provider: &'static str,
        /// Human-readable failure description.
        message: String,
    },
    /// The reward-point oracle does not know the attraction.
    #[error("no reward points known for attraction {attraction_id}")]
    UnknownAttraction {
        /// Identifier that was looked up.
        attraction_id: AttractionId,
    },
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Unavailable`].
    #[must_use]
    pub fn unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider,
            message: message.into(),
        }
    }
}

/// Source of the full attraction catalog.
///
/// The catalog is fetched once per reward scan or ranking call and may be
/// returned fresh on every call.
///
/// # Examples
/// ```
/// use tourguide_core::{Attraction, AttractionCatalog, Location, ProviderError};
///
/// struct Single(Attraction);
///
/// impl AttractionCatalog for Single {
///     fn attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
///         Ok(vec![self.0.clone()])
///     }
/// }
///
/// let catalog = Single(Attraction::with_random_id("Museum", Location::new(0.0, 0.0)));
/// assert_eq!(catalog.attractions()?.len(), 1);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait AttractionCatalog: Send + Sync {
    /// Return every known attraction.
    fn attractions(&self) -> Result<Vec<Attraction>, ProviderError>;
}

/// Source of a user's current position, such as a GPS service.
///
/// Calls may be slow.
pub trait LocationOracle: Send + Sync {
    /// Return where `user_id` is right now.
    fn current_location(&self, user_id: UserId) -> Result<Location, ProviderError>;
}

/// Source of the points an attraction is worth to a user.
pub trait RewardPointOracle: Send + Sync {
    /// Return the points `user_id` earns for visiting `attraction_id`.
    fn reward_points(&self, attraction_id: AttractionId, user_id: UserId)
    -> Result<i32, ProviderError>;
}
