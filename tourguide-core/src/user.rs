//! Shared per-user state: visit history and earned rewards.
//!
//! A [`User`] is shared as `Arc<User>` between the location tracker, which
//! appends visits, and the reward engine, which reads visits and writes
//! rewards. Reward writes go through a [`RewardUpdate`] scope so that at most
//! one writer at a time runs the read-check-append sequence for a user.
//!
//! Visit history grows without bound for the lifetime of the process; long
//! lived users should be trimmed with [`User::clear_visited_locations`].

use std::collections::HashSet;

use parking_lot::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

use crate::{UserReward, VisitedLocation};

/// Identifier of a user.
pub type UserId = Uuid;

/// A tracked user.
///
/// # Examples
/// ```
/// use tourguide_core::{Location, User, VisitedLocation};
///
/// let user = User::new("jon");
/// assert!(user.last_visited_location().is_none());
///
/// user.add_visited_location(VisitedLocation::now(user.id(), Location::new(1.0, 2.0)));
/// assert_eq!(user.visited_locations().len(), 1);
/// ```
#[derive(Debug)]
pub struct User {
    id: UserId,
    name: String,
    visited_locations: RwLock<Vec<VisitedLocation>>,
    rewards: RwLock<Vec<UserReward>>,
    reward_writer: Mutex<()>,
}

impl User {
    /// Create a user with a freshly generated identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Create a user with a known identifier.
    #[must_use]
    pub fn with_id(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visited_locations: RwLock::new(Vec::new()),
            rewards: RwLock::new(Vec::new()),
            reward_writer: Mutex::new(()),
        }
    }

    /// The user's identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// The user's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a visit to the history.
    pub fn add_visited_location(&self, visit: VisitedLocation) {
        self.visited_locations.write().push(visit);
    }

    /// Copy of the visit history in chronological order.
    #[must_use]
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().clone()
    }

    /// The most recent visit, if any.
    #[must_use]
    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().last().cloned()
    }

    /// Whether any visit has been recorded.
    #[must_use]
    pub fn has_visited_locations(&self) -> bool {
        !self.visited_locations.read().is_empty()
    }

    /// Drop the whole visit history.
    pub fn clear_visited_locations(&self) {
        self.visited_locations.write().clear();
    }

    /// Copy of the earned rewards.
    #[must_use]
    pub fn rewards(&self) -> Vec<UserReward> {
        self.rewards.read().clone()
    }

    /// Sum of the points across all earned rewards.
    #[must_use]
    pub fn total_reward_points(&self) -> i64 {
        self.rewards
            .read()
            .iter()
            .map(|reward| i64::from(reward.reward_points))
            .sum()
    }

    /// Record `reward` unless one already exists for the same attraction name.
    ///
    /// Returns `true` when the reward was added.
    ///
    /// # Examples
    /// ```
    /// use tourguide_core::{Attraction, Location, User, UserReward, VisitedLocation};
    ///
    /// let user = User::new("jon");
    /// let visit = VisitedLocation::now(user.id(), Location::new(0.0, 0.0));
    /// let attraction = Attraction::with_random_id("Museum", Location::new(0.0, 0.0));
    /// let reward = UserReward::new(visit, attraction, 10);
    ///
    /// assert!(user.add_reward(reward.clone()));
    /// assert!(!user.add_reward(reward));
    /// assert_eq!(user.rewards().len(), 1);
    /// ```
    pub fn add_reward(&self, reward: UserReward) -> bool {
        let mut update = self.begin_reward_update();
        if update.has_reward_for(&reward.attraction.name) {
            return false;
        }
        let mut rewards = update.current().to_vec();
        rewards.push(reward);
        update.commit(rewards);
        true
    }

    /// Start an exclusive reward update for this user.
    ///
    /// The returned scope holds the user's reward-writer lock until dropped,
    /// so concurrent updates for the same user run one after another. Readers
    /// of [`User::rewards`] are not blocked and observe the previous list
    /// until [`RewardUpdate::commit`] is called.
    #[must_use]
    pub fn begin_reward_update(&self) -> RewardUpdate<'_> {
        let guard = self.reward_writer.lock();
        let snapshot = self.rewards.read().clone();
        RewardUpdate {
            user: self,
            snapshot,
            _writer: guard,
        }
    }
}

/// Exclusive write access to one user's rewards.
///
/// Created by [`User::begin_reward_update`].
#[derive(Debug)]
pub struct RewardUpdate<'a> {
    user: &'a User,
    snapshot: Vec<UserReward>,
    _writer: MutexGuard<'a, ()>,
}

impl RewardUpdate<'_> {
    /// Rewards as they were when the scope started or was last committed.
    #[must_use]
    pub fn current(&self) -> &[UserReward] {
        &self.snapshot
    }

    /// Whether a reward already references an attraction called `name`.
    #[must_use]
    pub fn has_reward_for(&self, name: &str) -> bool {
        self.snapshot.iter().any(|reward| reward.is_for(name))
    }

    /// Replace the user's rewards with `rewards`.
    ///
    /// Only the first reward for each attraction name is kept; later entries
    /// with a name already seen are dropped.
    pub fn commit(&mut self, mut rewards: Vec<UserReward>) {
        let mut seen = HashSet::with_capacity(rewards.len());
        rewards.retain(|reward| seen.insert(reward.attraction.name.clone()));
        self.snapshot.clone_from(&rewards);
        *self.user.rewards.write() = rewards;
    }
}
