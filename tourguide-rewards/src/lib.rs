//! Reward scanning, attraction ranking and location tracking.
//!
//! Work that calls collaborators runs on bounded [`TaskPool`]s backed by a
//! Tokio runtime. Each operation returns a [`TaskHandle`] that can be awaited
//! or waited on from synchronous code. [`TourGuide`] assembles the pieces from
//! [`EngineSettings`].

#![forbid(unsafe_code)]

mod engine;
mod error;
mod poller;
mod pool;
mod ranker;
mod service;
mod settings;
mod tracker;

pub use engine::RewardEngine;
pub use error::EngineError;
pub use poller::TrackingPoller;
pub use pool::{REWARD_POOL_SIZE, TRACKING_POOL_SIZE, TaskHandle, TaskPool};
pub use ranker::{AttractionRankEntry, AttractionRanker, DEFAULT_NEARBY_LIMIT};
pub use service::TourGuide;
pub use settings::EngineSettings;
pub use tracker::{LocationTracker, RewardReport};
