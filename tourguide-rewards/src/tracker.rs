//! Location tracking and supervised reward dispatch.
//!
//! Tracking asks the [`LocationOracle`] where a user is, appends the answer to
//! the user's history and then submits a reward scan for the same user. The
//! caller of [`LocationTracker::track`] does not wait for that scan. Instead a
//! watcher task logs failed scans and forwards every outcome to an optional
//! monitor channel.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tourguide_core::{LocationOracle, User, UserId, VisitedLocation};

use crate::{EngineError, RewardEngine, TaskHandle, TaskPool};

/// Outcome of a reward scan dispatched by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardReport {
    /// User whose rewards were scanned.
    pub user_id: UserId,
    /// Result of the scan.
    pub outcome: Result<(), EngineError>,
}

/// Records user locations and keeps their rewards up to date.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tourguide_core::test_support::{ConstantPointsOracle, FixedLocationOracle, MemoryCatalog};
/// use tourguide_core::{Location, User};
/// use tourguide_rewards::{LocationTracker, RewardEngine, TaskPool};
///
/// let runtime = tokio::runtime::Builder::new_multi_thread().build()?;
/// let rewards = RewardEngine::new(
///     Arc::new(MemoryCatalog::default()),
///     Arc::new(ConstantPointsOracle(1)),
///     TaskPool::new("rewards", runtime.handle().clone(), 4),
/// );
/// let tracker = LocationTracker::new(
///     Arc::new(FixedLocationOracle::new(Location::new(48.85, 2.35))),
///     rewards,
///     TaskPool::new("tracking", runtime.handle().clone(), 2),
/// );
///
/// let user = Arc::new(User::new("jon"));
/// let visit = tracker.user_location(&user).expect("bootstrap location");
/// assert_eq!(visit.location, Location::new(48.85, 2.35));
/// assert_eq!(user.visited_locations().len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct LocationTracker {
    locations: Arc<dyn LocationOracle>,
    rewards: RewardEngine,
    pool: TaskPool,
    monitor: Option<UnboundedSender<RewardReport>>,
}

impl std::fmt::Debug for LocationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationTracker")
            .field("rewards", &self.rewards)
            .field("pool", &self.pool)
            .field("monitored", &self.monitor.is_some())
            .finish_non_exhaustive()
    }
}

impl LocationTracker {
    /// Build a tracker submitting lookups to `pool` and scans to `rewards`.
    #[must_use]
    pub fn new(locations: Arc<dyn LocationOracle>, rewards: RewardEngine, pool: TaskPool) -> Self {
        Self {
            locations,
            rewards,
            pool,
            monitor: None,
        }
    }

    /// Forward the outcome of every dispatched reward scan to `monitor`.
    #[must_use]
    pub fn with_reward_monitor(mut self, monitor: UnboundedSender<RewardReport>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Reward engine fed by this tracker.
    #[must_use]
    pub const fn rewards(&self) -> &RewardEngine {
        &self.rewards
    }

    /// Look up and record the user's current location on the tracking pool.
    ///
    /// Once the visit is recorded a reward scan is dispatched for the user;
    /// the returned handle does not wait for it.
    pub fn track(&self, user: Arc<User>) -> TaskHandle<VisitedLocation> {
        let tracker = self.clone();
        self.pool.spawn(move || {
            let location = tracker
                .locations
                .current_location(user.id())
                .map_err(|source| EngineError::Location {
                    user_id: user.id(),
                    source,
                })?;
            let visit = VisitedLocation::now(user.id(), location);
            user.add_visited_location(visit.clone());
            tracker.dispatch_rewards(user);
            Ok(visit)
        })
    }

    /// Track every user concurrently and collect the results in input order.
    pub async fn track_all(&self, users: &[Arc<User>]) -> Vec<Result<VisitedLocation, EngineError>> {
        let handles: Vec<_> = users
            .iter()
            .map(|user| self.track(Arc::clone(user)))
            .collect();
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await);
        }
        results
    }

    /// Return the user's position, tracking them first if nothing is known.
    ///
    /// A user with history gets their last visit back without a lookup. A user
    /// without history blocks the calling thread on a fresh [`track`].
    ///
    /// # Errors
    /// Propagates the tracking failure from the bootstrap lookup.
    ///
    /// [`track`]: LocationTracker::track
    pub fn try_user_location(&self, user: &Arc<User>) -> Result<VisitedLocation, EngineError> {
        match user.last_visited_location() {
            Some(visit) => Ok(visit),
            None => self.track(Arc::clone(user)).wait(),
        }
    }

    /// Like [`LocationTracker::try_user_location`], but logs a failed
    /// bootstrap lookup and returns `None` instead of an error.
    #[must_use]
    pub fn user_location(&self, user: &Arc<User>) -> Option<VisitedLocation> {
        self.try_user_location(user)
            .inspect_err(|err| log::error!("failed to locate user {}: {err}", user.name()))
            .ok()
    }

    fn dispatch_rewards(&self, user: Arc<User>) {
        let user_id = user.id();
        let scan = self.rewards.calculate_rewards(user);
        let monitor = self.monitor.clone();
        // The watcher is detached; its outcome is reported through the monitor.
        drop(self.rewards.pool().runtime().spawn(async move {
            let outcome = scan.await;
            if let Err(err) = &outcome {
                log::warn!("reward scan for user {user_id} failed: {err}");
            }
            if let Some(monitor) = monitor
                && monitor.send(RewardReport { user_id, outcome }).is_err()
            {
                log::debug!("reward monitor closed; dropping report for user {user_id}");
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tokio::runtime::Runtime;
    use tokio::sync::mpsc;
    use tourguide_core::test_support::{
        ConstantPointsOracle, FailingLocationOracle, FailingPointsOracle, FixedLocationOracle,
        MemoryCatalog, ScriptedLocationOracle,
    };
    use tourguide_core::{Attraction, Location, RewardPointOracle};

    #[fixture]
    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .expect("build runtime")
    }

    fn tracker_with(
        runtime: &Runtime,
        locations: impl LocationOracle + 'static,
        points: impl RewardPointOracle + 'static,
    ) -> LocationTracker {
        let catalog = MemoryCatalog::with_attractions([Attraction::with_random_id(
            "Origin",
            Location::new(0.0, 0.0),
        )]);
        let rewards = RewardEngine::new(
            Arc::new(catalog),
            Arc::new(points),
            TaskPool::new("rewards", runtime.handle().clone(), 8),
        );
        LocationTracker::new(
            Arc::new(locations),
            rewards,
            TaskPool::new("tracking", runtime.handle().clone(), 2),
        )
    }

    #[rstest]
    fn tracking_appends_and_scans(runtime: Runtime) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tracker = tracker_with(
            &runtime,
            FixedLocationOracle::new(Location::new(0.0, 0.0)),
            ConstantPointsOracle(5),
        )
        .with_reward_monitor(tx);
        let user = Arc::new(User::new("jon"));

        let visit = tracker.track(Arc::clone(&user)).wait().expect("track");
        let report = rx.blocking_recv().expect("reward report");

        assert_eq!(user.last_visited_location(), Some(visit));
        assert_eq!(report, RewardReport { user_id: user.id(), outcome: Ok(()) });
        assert_eq!(user.total_reward_points(), 5);
    }

    #[rstest]
    fn failed_scans_are_reported(runtime: Runtime) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tracker = tracker_with(
            &runtime,
            FixedLocationOracle::new(Location::new(0.0, 0.0)),
            FailingPointsOracle,
        )
        .with_reward_monitor(tx);
        let user = Arc::new(User::new("jon"));

        tracker.track(Arc::clone(&user)).wait().expect("tracking succeeds");
        let report = rx.blocking_recv().expect("reward report");

        assert!(matches!(report.outcome, Err(EngineError::RewardPoints { .. })));
        assert!(user.rewards().is_empty());
    }

    #[rstest]
    fn known_users_are_not_tracked_again(runtime: Runtime) {
        let tracker = tracker_with(
            &runtime,
            ScriptedLocationOracle::new([Location::new(1.0, 1.0), Location::new(2.0, 2.0)]),
            ConstantPointsOracle(1),
        );
        let user = Arc::new(User::new("jon"));

        let first = tracker.user_location(&user).expect("bootstrap");
        let second = tracker.user_location(&user).expect("cached");

        assert_eq!(first, second);
        assert_eq!(user.visited_locations().len(), 1);
    }

    #[rstest]
    fn bootstrap_failure_degrades_to_none(runtime: Runtime) {
        let tracker = tracker_with(&runtime, FailingLocationOracle, ConstantPointsOracle(1));
        let user = Arc::new(User::new("jon"));

        assert!(tracker.user_location(&user).is_none());
        let err = tracker
            .try_user_location(&user)
            .expect_err("failure is visible through the fallible variant");
        assert!(matches!(err, EngineError::Location { user_id, .. } if user_id == user.id()));
        assert!(!user.has_visited_locations());
    }

    #[rstest]
    fn track_all_preserves_input_order(runtime: Runtime) {
        let tracker = tracker_with(
            &runtime,
            FixedLocationOracle::new(Location::new(10.0, 10.0)),
            ConstantPointsOracle(1),
        );
        let users: Vec<_> = (0..6)
            .map(|i| Arc::new(User::new(format!("user{i}"))))
            .collect();

        let results = runtime.block_on(tracker.track_all(&users));

        assert_eq!(results.len(), users.len());
        for (user, result) in users.iter().zip(results) {
            let visit = result.expect("tracked");
            assert_eq!(visit.user_id, user.id());
        }
    }
}
