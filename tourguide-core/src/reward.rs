//! Rewards granted for visiting attractions.

use crate::{Attraction, VisitedLocation};

/// Points awarded for a visit that came close enough to an attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserReward {
    /// The visit that triggered the reward.
    pub visited_location: VisitedLocation,
    /// The attraction that was visited.
    pub attraction: Attraction,
    /// Points granted by the reward-point oracle.
    pub reward_points: i32,
}

impl UserReward {
    /// Construct a reward record.
    #[must_use]
    pub const fn new(
        visited_location: VisitedLocation,
        attraction: Attraction,
        reward_points: i32,
    ) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }

    /// Whether this reward was granted for an attraction called `name`.
    #[must_use]
    pub fn is_for(&self, name: &str) -> bool {
        self.attraction.name == name
    }
}
