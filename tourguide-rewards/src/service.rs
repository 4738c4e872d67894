//! The assembled tour guide service.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tourguide_core::{
    AttractionCatalog, LocationOracle, ProximityConfigError, ProximityPolicy, RewardPointOracle,
    User, UserRegistry, UserReward, VisitedLocation,
};

use crate::{
    AttractionRankEntry, AttractionRanker, EngineError, EngineSettings, LocationTracker,
    RewardEngine, TaskHandle, TaskPool, TrackingPoller,
};

/// Registry, reward engine, ranker and tracker wired to one set of
/// collaborators.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tourguide_core::test_support::{ConstantPointsOracle, FixedLocationOracle, MemoryCatalog};
/// use tourguide_core::{Attraction, Location, User};
/// use tourguide_rewards::{EngineSettings, TourGuide};
///
/// let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
/// let guide = TourGuide::new(
///     EngineSettings::default(),
///     Arc::new(MemoryCatalog::with_attractions([
///         Attraction::with_random_id("Louvre", Location::new(48.86, 2.34)),
///     ])),
///     Arc::new(FixedLocationOracle::new(Location::new(48.86, 2.34))),
///     Arc::new(ConstantPointsOracle(50)),
///     runtime.handle().clone(),
/// )?;
///
/// let user = Arc::new(User::new("jon"));
/// guide.add_user(Arc::clone(&user));
/// let nearby = guide.nearby_attractions(&user)?;
/// assert_eq!(nearby[0].attraction.name, "Louvre");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct TourGuide {
    settings: EngineSettings,
    registry: UserRegistry,
    rewards: RewardEngine,
    ranker: AttractionRanker,
    tracker: LocationTracker,
}

impl TourGuide {
    /// Build the service on `runtime`.
    ///
    /// Reward scans and rankings share the reward pool; location lookups use
    /// the tracking pool.
    ///
    /// # Errors
    /// Returns [`ProximityConfigError`] when the configured thresholds are
    /// invalid.
    pub fn new(
        settings: EngineSettings,
        catalog: Arc<dyn AttractionCatalog>,
        locations: Arc<dyn LocationOracle>,
        points: Arc<dyn RewardPointOracle>,
        runtime: Handle,
    ) -> Result<Self, ProximityConfigError> {
        let settings = settings.validate()?;
        let reward_pool = TaskPool::new("rewards", runtime.clone(), settings.reward_pool_size);
        let tracking_pool = TaskPool::new("tracking", runtime, settings.tracking_pool_size);
        let rewards = RewardEngine::new(
            Arc::clone(&catalog),
            Arc::clone(&points),
            reward_pool.clone(),
        )
        .with_policy(ProximityPolicy::new(settings.proximity));
        let ranker = AttractionRanker::new(catalog, points, reward_pool);
        let tracker = LocationTracker::new(locations, rewards.clone(), tracking_pool);
        Ok(Self {
            settings,
            registry: UserRegistry::new(),
            rewards,
            ranker,
            tracker,
        })
    }

    /// Settings the service was built with.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Registered users.
    #[must_use]
    pub const fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Reward engine shared with the tracker.
    #[must_use]
    pub const fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    /// Location tracker.
    #[must_use]
    pub const fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    /// Register a user; returns `false` when the name is taken.
    pub fn add_user(&self, user: Arc<User>) -> bool {
        self.registry.add_user(user)
    }

    /// Look a registered user up by name.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<Arc<User>> {
        self.registry.user(name)
    }

    /// Every registered user.
    #[must_use]
    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.registry.all_users()
    }

    /// Last known location, tracking the user first when nothing is known.
    #[must_use]
    pub fn user_location(&self, user: &Arc<User>) -> Option<VisitedLocation> {
        self.tracker.user_location(user)
    }

    /// Rewards earned so far.
    #[must_use]
    pub fn user_rewards(&self, user: &User) -> Vec<UserReward> {
        user.rewards()
    }

    /// Record the user's current location and refresh their rewards.
    pub fn track_user(&self, user: Arc<User>) -> TaskHandle<VisitedLocation> {
        self.tracker.track(user)
    }

    /// Rank attractions around the user's location.
    ///
    /// A user without history is located first. Returns at most
    /// [`EngineSettings::nearby_limit`] entries, farthest first.
    ///
    /// # Errors
    /// Returns the tracking failure when the user cannot be located, or the
    /// ranking failure from the catalog or points oracle.
    pub fn nearby_attractions(
        &self,
        user: &Arc<User>,
    ) -> Result<Vec<AttractionRankEntry>, EngineError> {
        let visit = self.tracker.try_user_location(user)?;
        self.ranker
            .nearby_attractions(user.id(), visit.location, self.settings.nearby_limit)
            .wait()
    }

    /// Track every registered user every `interval` until the poller stops.
    ///
    /// The runtime behind the service must have its time driver enabled.
    /// Without it the loop fails at once and [`TrackingPoller::stop`]
    /// reports the failure.
    pub fn start_tracking(&self, interval: Duration) -> TrackingPoller {
        TrackingPoller::start(
            self.tracker.clone(),
            self.registry.clone(),
            interval,
            self.rewards.pool().runtime(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tokio::runtime::Runtime;
    use tourguide_core::test_support::{
        ConstantPointsOracle, FailingLocationOracle, FixedLocationOracle, MemoryCatalog,
    };
    use tourguide_core::{Attraction, Location, ProximityConfig};

    #[fixture]
    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .expect("build runtime")
    }

    fn catalog() -> Arc<MemoryCatalog> {
        Arc::new(MemoryCatalog::with_attractions([
            Attraction::with_random_id("Here", Location::new(0.0, 0.0)),
            Attraction::with_random_id("Near", Location::new(0.5, 0.0)),
            Attraction::with_random_id("Far", Location::new(3.0, 0.0)),
        ]))
    }

    fn guide(runtime: &Runtime, locations: impl LocationOracle + 'static) -> TourGuide {
        let settings = EngineSettings {
            nearby_limit: 2,
            ..EngineSettings::default()
        };
        TourGuide::new(
            settings,
            catalog(),
            Arc::new(locations),
            Arc::new(ConstantPointsOracle(10)),
            runtime.handle().clone(),
        )
        .expect("valid settings")
    }

    #[rstest]
    fn invalid_thresholds_are_rejected(runtime: Runtime) {
        let settings = EngineSettings {
            proximity: ProximityConfig::default().with_attraction_proximity_range(-5.0),
            ..EngineSettings::default()
        };
        let result = TourGuide::new(
            settings,
            catalog(),
            Arc::new(FailingLocationOracle),
            Arc::new(ConstantPointsOracle(1)),
            runtime.handle().clone(),
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn nearby_bootstraps_the_location(runtime: Runtime) {
        let guide = guide(&runtime, FixedLocationOracle::new(Location::new(0.0, 0.0)));
        let user = Arc::new(User::new("jon"));
        guide.add_user(Arc::clone(&user));

        let nearby = guide.nearby_attractions(&user).expect("ranking");

        let names: Vec<&str> = nearby.iter().map(|e| e.attraction.name.as_str()).collect();
        assert_eq!(names, vec!["Far", "Near"]);
        assert_eq!(user.visited_locations().len(), 1);
    }

    #[rstest]
    fn untrackable_users_cannot_be_ranked(runtime: Runtime) {
        let guide = guide(&runtime, FailingLocationOracle);
        let user = Arc::new(User::new("ghost"));
        assert!(guide.user_location(&user).is_none());
        assert!(matches!(
            guide.nearby_attractions(&user),
            Err(EngineError::Location { .. })
        ));
    }

    #[rstest]
    fn configured_proximity_drives_rewards(runtime: Runtime) {
        let settings = EngineSettings {
            proximity: ProximityConfig::default().with_proximity_buffer(50.0),
            ..EngineSettings::default()
        };
        let guide = TourGuide::new(
            settings,
            catalog(),
            Arc::new(FixedLocationOracle::new(Location::new(0.0, 0.0))),
            Arc::new(ConstantPointsOracle(10)),
            runtime.handle().clone(),
        )
        .expect("valid settings");
        let user = Arc::new(User::new("jon"));
        user.add_visited_location(VisitedLocation::now(user.id(), Location::new(0.0, 0.0)));

        guide
            .rewards()
            .calculate_rewards(Arc::clone(&user))
            .wait()
            .expect("scan");

        let names: Vec<String> = guide
            .user_rewards(&user)
            .into_iter()
            .map(|reward| reward.attraction.name)
            .collect();
        assert_eq!(names, vec!["Here".to_owned(), "Near".to_owned()]);
    }

    #[rstest]
    fn background_tracking_records_visits() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("build runtime");
        let guide = guide(&runtime, FixedLocationOracle::new(Location::new(0.0, 0.0)));
        let user = Arc::new(User::new("jon"));
        guide.add_user(Arc::clone(&user));

        let poller = guide.start_tracking(Duration::from_millis(10));
        runtime.block_on(async {
            while !user.has_visited_locations() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });

        runtime.block_on(poller.stop()).expect("clean shutdown");
        assert!(guide.user_location(&user).is_some());
    }

    #[rstest]
    fn users_are_registered_once(runtime: Runtime) {
        let guide = guide(&runtime, FailingLocationOracle);
        assert!(guide.add_user(Arc::new(User::new("jon"))));
        assert!(!guide.add_user(Arc::new(User::new("jon"))));
        assert!(guide.user("jon").is_some());
        assert_eq!(guide.all_users().len(), 1);
    }
}
