//! Facade crate for the tour guide reward engine.
//!
//! This crate re-exports the core domain types and, behind the `rewards`
//! feature, the pooled reward engine, ranker and tracker.

#![forbid(unsafe_code)]

pub use tourguide_core::{
    Attraction, AttractionCatalog, AttractionId, Location, LocationOracle, ProviderError,
    ProximityConfig, ProximityConfigError, ProximityPolicy, RewardPointOracle, User, UserId,
    UserRegistry, UserReward, VisitedLocation, distance,
};

#[cfg(feature = "test-support")]
pub use tourguide_core::test_support;

#[cfg(feature = "rewards")]
pub use tourguide_rewards::{
    AttractionRankEntry, AttractionRanker, EngineError, EngineSettings, LocationTracker,
    RewardEngine, RewardReport, TaskHandle, TaskPool, TourGuide, TrackingPoller,
};
