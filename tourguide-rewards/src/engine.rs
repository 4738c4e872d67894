//! Reward scanning over a user's visit history.
//!
//! A scan pairs every recorded visit with every catalog attraction and grants
//! one reward per attraction name for the first visit that came within the
//! proximity buffer. Scans run on a bounded [`TaskPool`] because each one is
//! `O(visits × attractions)`.

use std::sync::Arc;

use parking_lot::RwLock;
use tourguide_core::{
    Attraction, AttractionCatalog, Location, ProximityPolicy, RewardPointOracle, User, UserReward,
};

use crate::{EngineError, TaskHandle, TaskPool};

/// Computes rewards for users from their visit history.
///
/// Cloning yields another handle onto the same collaborators, policy and pool.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tourguide_core::test_support::{ConstantPointsOracle, MemoryCatalog};
/// use tourguide_core::{Attraction, Location, User, VisitedLocation};
/// use tourguide_rewards::{RewardEngine, TaskPool};
///
/// let runtime = tokio::runtime::Builder::new_multi_thread().build()?;
/// let catalog = MemoryCatalog::with_attractions([
///     Attraction::with_random_id("Museum", Location::new(0.0, 0.0)),
/// ]);
/// let engine = RewardEngine::new(
///     Arc::new(catalog),
///     Arc::new(ConstantPointsOracle(100)),
///     TaskPool::new("rewards", runtime.handle().clone(), 4),
/// );
///
/// let user = Arc::new(User::new("jon"));
/// user.add_visited_location(VisitedLocation::now(user.id(), Location::new(0.0, 0.0)));
/// engine.calculate_rewards(Arc::clone(&user)).wait()?;
/// assert_eq!(user.total_reward_points(), 100);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct RewardEngine {
    catalog: Arc<dyn AttractionCatalog>,
    points: Arc<dyn RewardPointOracle>,
    policy: Arc<RwLock<ProximityPolicy>>,
    pool: TaskPool,
}

impl std::fmt::Debug for RewardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardEngine")
            .field("policy", &*self.policy.read())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl RewardEngine {
    /// Build an engine with the default proximity policy.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn AttractionCatalog>,
        points: Arc<dyn RewardPointOracle>,
        pool: TaskPool,
    ) -> Self {
        Self {
            catalog,
            points,
            policy: Arc::new(RwLock::new(ProximityPolicy::default())),
            pool,
        }
    }

    /// Replace the proximity policy.
    #[must_use]
    pub fn with_policy(self, policy: ProximityPolicy) -> Self {
        *self.policy.write() = policy;
        self
    }

    /// Copy of the current proximity policy.
    #[must_use]
    pub fn policy(&self) -> ProximityPolicy {
        *self.policy.read()
    }

    /// Override the proximity buffer for scans started from now on.
    pub fn set_proximity_buffer(&self, miles: f64) {
        self.policy.write().set_proximity_buffer(miles);
    }

    /// Restore the default proximity buffer for scans started from now on.
    pub fn reset_proximity_buffer(&self) {
        self.policy.write().reset_proximity_buffer();
    }

    /// Override the attraction proximity range.
    pub fn set_attraction_proximity_range(&self, miles: f64) {
        self.policy.write().set_attraction_proximity_range(miles);
    }

    /// Whether `location` lies within the attraction proximity range.
    #[must_use]
    pub fn is_within_attraction_proximity(&self, attraction: &Attraction, location: &Location) -> bool {
        self.policy
            .read()
            .is_within_attraction_proximity(attraction, location)
    }

    /// Pool that runs the scans.
    #[must_use]
    pub const fn pool(&self) -> &TaskPool {
        &self.pool
    }

    /// Scan `user` for new rewards on the reward pool.
    ///
    /// The handle resolves once the user's rewards have been replaced with
    /// the scan result. Scans for the same user run one after another.
    pub fn calculate_rewards(&self, user: Arc<User>) -> TaskHandle<()> {
        let engine = self.clone();
        self.pool.spawn(move || {
            let granted = engine.scan(&user)?;
            log::debug!("granted {granted} new rewards to user {}", user.id());
            Ok(())
        })
    }

    /// Run a reward scan on the current thread.
    ///
    /// Returns the number of rewards granted by this scan. The policy is read
    /// once up front; the visit history is read after the user's reward
    /// writer lock is taken, so the scan sees every visit recorded before it
    /// started.
    ///
    /// # Errors
    /// Returns [`EngineError::Catalog`] or [`EngineError::RewardPoints`] when a
    /// collaborator fails. The user's rewards are left untouched in that case.
    pub fn scan(&self, user: &User) -> Result<usize, EngineError> {
        let policy = self.policy();
        let mut update = user.begin_reward_update();
        let visits = user.visited_locations();
        let attractions = self.catalog.attractions().map_err(EngineError::Catalog)?;

        let mut rewards = update.current().to_vec();
        let before = rewards.len();
        for visit in &visits {
            for attraction in &attractions {
                let already_rewarded = rewards.iter().any(|reward| reward.is_for(&attraction.name));
                if already_rewarded || !policy.is_near_attraction(visit, attraction) {
                    continue;
                }
                let points = self
                    .points
                    .reward_points(attraction.id, user.id())
                    .map_err(|source| EngineError::RewardPoints {
                        attraction_id: attraction.id,
                        source,
                    })?;
                rewards.push(UserReward::new(visit.clone(), attraction.clone(), points));
            }
        }

        let granted = rewards.len().saturating_sub(before);
        update.commit(rewards);
        Ok(granted)
    }
}
