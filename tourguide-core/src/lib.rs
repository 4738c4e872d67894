//! Core domain types for the tour guide reward engine.
//!
//! The crate holds the value types shared by every other component
//! ([`Location`], [`Attraction`], [`VisitedLocation`], [`UserReward`]), the
//! shared per-user state ([`User`]), great-circle distance maths, the
//! proximity thresholds that decide whether a visit earns a reward, and the
//! collaborator traits through which attraction catalogs and oracles are
//! plugged in.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attraction;
pub mod distance;
pub mod location;
pub mod provider;
pub mod proximity;
pub mod registry;
pub mod reward;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod user;

pub use attraction::{Attraction, AttractionId};
pub use distance::{STATUTE_MILES_PER_NAUTICAL_MILE, distance};
pub use location::{Location, VisitedLocation};
pub use provider::{AttractionCatalog, LocationOracle, ProviderError, RewardPointOracle};
pub use proximity::{
    DEFAULT_ATTRACTION_PROXIMITY_RANGE, DEFAULT_PROXIMITY_BUFFER, ProximityConfig,
    ProximityConfigError, ProximityPolicy,
};
pub use registry::UserRegistry;
pub use reward::UserReward;
pub use user::{RewardUpdate, User, UserId};
