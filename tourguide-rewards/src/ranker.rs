//! Rank catalog attractions by distance from a reference location.
//!
//! Entries are ordered by distance *descending*, so the first entries are the
//! farthest attractions. Existing API consumers depend on this order.

use std::sync::Arc;

use serde::Serialize;
use tourguide_core::{
    Attraction, AttractionCatalog, Location, RewardPointOracle, User, UserId, distance,
};

use crate::{EngineError, TaskHandle, TaskPool};

/// Number of entries returned when no limit is configured.
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// An attraction annotated with its distance and reward value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionRankEntry {
    /// The ranked attraction.
    pub attraction: Attraction,
    /// Distance from the reference location in statute miles.
    pub distance_miles: f64,
    /// Points the requesting user would earn at this attraction.
    pub reward_points: i32,
}

/// Ranks attractions and attaches reward points to the top entries.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tourguide_core::test_support::{ConstantPointsOracle, MemoryCatalog};
/// use tourguide_core::{Attraction, Location};
/// use tourguide_rewards::{AttractionRanker, TaskPool};
/// use uuid::Uuid;
///
/// let runtime = tokio::runtime::Builder::new_multi_thread().build()?;
/// let catalog = MemoryCatalog::with_attractions([
///     Attraction::with_random_id("A", Location::new(0.0, 0.0)),
///     Attraction::with_random_id("B", Location::new(1.0, 0.0)),
///     Attraction::with_random_id("C", Location::new(2.0, 0.0)),
/// ]);
/// let ranker = AttractionRanker::new(
///     Arc::new(catalog),
///     Arc::new(ConstantPointsOracle(7)),
///     TaskPool::new("ranking", runtime.handle().clone(), 2),
/// );
///
/// let entries = ranker
///     .nearby_attractions(Uuid::new_v4(), Location::new(0.0, 0.0), 2)
///     .wait()?;
/// let names: Vec<_> = entries.iter().map(|e| e.attraction.name.as_str()).collect();
/// assert_eq!(names, ["C", "B"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct AttractionRanker {
    catalog: Arc<dyn AttractionCatalog>,
    points: Arc<dyn RewardPointOracle>,
    pool: TaskPool,
}

impl std::fmt::Debug for AttractionRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttractionRanker")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl AttractionRanker {
    /// Build a ranker submitting its work to `pool`.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn AttractionCatalog>,
        points: Arc<dyn RewardPointOracle>,
        pool: TaskPool,
    ) -> Self {
        Self {
            catalog,
            points,
            pool,
        }
    }

    /// Rank attractions around `reference` for `user_id` on the pool.
    ///
    /// At most `limit` entries are returned, fewer only when the catalog is
    /// smaller.
    pub fn nearby_attractions(
        &self,
        user_id: UserId,
        reference: Location,
        limit: usize,
    ) -> TaskHandle<Vec<AttractionRankEntry>> {
        let ranker = self.clone();
        self.pool
            .spawn(move || ranker.rank(user_id, &reference, limit))
    }

    /// Rank attractions around the user's last recorded visit.
    ///
    /// # Errors
    /// Returns [`EngineError::NoKnownLocation`] when the user has no visit.
    pub fn nearby_for_user(
        &self,
        user: &User,
        limit: usize,
    ) -> Result<TaskHandle<Vec<AttractionRankEntry>>, EngineError> {
        let last = user
            .last_visited_location()
            .ok_or(EngineError::NoKnownLocation { user_id: user.id() })?;
        Ok(self.nearby_attractions(user.id(), last.location, limit))
    }

    /// Rank attractions on the current thread.
    ///
    /// Attractions at equal distance keep their catalog order. Reward points
    /// are only looked up for the retained entries.
    ///
    /// # Errors
    /// Returns [`EngineError::Catalog`] or [`EngineError::RewardPoints`] when a
    /// collaborator fails; no partial ranking is returned.
    pub fn rank(
        &self,
        user_id: UserId,
        reference: &Location,
        limit: usize,
    ) -> Result<Vec<AttractionRankEntry>, EngineError> {
        let mut ranked: Vec<(Attraction, f64)> = self
            .catalog
            .attractions()
            .map_err(EngineError::Catalog)?
            .into_iter()
            .map(|attraction| {
                let miles = distance(&attraction.location, reference);
                (attraction, miles)
            })
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        ranked.truncate(limit);

        ranked
            .into_iter()
            .map(|(attraction, distance_miles)| {
                let reward_points = self
                    .points
                    .reward_points(attraction.id, user_id)
                    .map_err(|source| EngineError::RewardPoints {
                        attraction_id: attraction.id,
                        source,
                    })?;
                Ok(AttractionRankEntry {
                    attraction,
                    distance_miles,
                    reward_points,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tokio::runtime::Runtime;
    use tourguide_core::VisitedLocation;
    use tourguide_core::test_support::{
        ConstantPointsOracle, FailingPointsOracle, MemoryCatalog, TablePointsOracle,
    };
    use uuid::Uuid;

    #[fixture]
    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .expect("build runtime")
    }

    fn line_catalog(count: u128) -> MemoryCatalog {
        MemoryCatalog::with_attractions((0..count).map(|i| {
            let degrees = f64::from(u32::try_from(i).expect("small index"));
            Attraction::new(
                Uuid::from_u128(i),
                format!("Attraction {i}"),
                Location::new(degrees, 0.0),
            )
        }))
    }

    fn ranker_with(
        runtime: &Runtime,
        catalog: MemoryCatalog,
        points: impl RewardPointOracle + 'static,
    ) -> AttractionRanker {
        AttractionRanker::new(
            Arc::new(catalog),
            Arc::new(points),
            TaskPool::new("ranking", runtime.handle().clone(), 2),
        )
    }

    #[rstest]
    fn farthest_attractions_come_first(runtime: Runtime) {
        let points = TablePointsOracle::new([(Uuid::from_u128(1), 11), (Uuid::from_u128(2), 22)]);
        let ranker = ranker_with(&runtime, line_catalog(3), points);
        let entries = ranker
            .rank(Uuid::nil(), &Location::new(0.0, 0.0), 2)
            .expect("ranking");

        let ids: Vec<Uuid> = entries.iter().map(|entry| entry.attraction.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
        assert_eq!(entries[0].reward_points, 22);
        assert_eq!(entries[1].reward_points, 11);
        assert!(entries[0].distance_miles > entries[1].distance_miles);
    }

    #[rstest]
    #[case(10, 5, 5)]
    #[case(5, 5, 5)]
    #[case(3, 5, 3)]
    #[case(0, 5, 0)]
    fn limit_caps_the_result(
        runtime: Runtime,
        #[case] catalog_size: u128,
        #[case] limit: usize,
        #[case] expected: usize,
    ) {
        let ranker = ranker_with(&runtime, line_catalog(catalog_size), ConstantPointsOracle(1));
        let entries = ranker
            .nearby_attractions(Uuid::nil(), Location::new(0.0, 0.0), limit)
            .wait()
            .expect("ranking");
        assert_eq!(entries.len(), expected);
    }

    #[rstest]
    fn ties_keep_catalog_order(runtime: Runtime) {
        let catalog = MemoryCatalog::with_attractions([
            Attraction::new(Uuid::from_u128(1), "North", Location::new(1.0, 0.0)),
            Attraction::new(Uuid::from_u128(2), "South", Location::new(-1.0, 0.0)),
        ]);
        let ranker = ranker_with(&runtime, catalog, ConstantPointsOracle(1));
        let entries = ranker
            .rank(Uuid::nil(), &Location::new(0.0, 0.0), 2)
            .expect("ranking");
        let names: Vec<&str> = entries
            .iter()
            .map(|entry| entry.attraction.name.as_str())
            .collect();
        assert_eq!(names, vec!["North", "South"]);
    }

    #[rstest]
    fn oracle_failure_aborts_the_ranking(runtime: Runtime) {
        let ranker = ranker_with(&runtime, line_catalog(3), FailingPointsOracle);
        let err = ranker
            .rank(Uuid::nil(), &Location::new(0.0, 0.0), 5)
            .expect_err("oracle failure");
        assert!(matches!(err, EngineError::RewardPoints { .. }));
    }

    #[rstest]
    fn user_without_history_has_no_reference(runtime: Runtime) {
        let ranker = ranker_with(&runtime, line_catalog(3), ConstantPointsOracle(1));
        let user = User::new("newcomer");
        let err = ranker
            .nearby_for_user(&user, 5)
            .expect_err("no location recorded");
        assert_eq!(err, EngineError::NoKnownLocation { user_id: user.id() });
    }

    #[rstest]
    fn user_ranking_uses_the_last_visit(runtime: Runtime) {
        let ranker = ranker_with(&runtime, line_catalog(3), ConstantPointsOracle(1));
        let user = User::new("traveller");
        user.add_visited_location(VisitedLocation::now(user.id(), Location::new(0.0, 0.0)));
        user.add_visited_location(VisitedLocation::now(user.id(), Location::new(2.0, 0.0)));

        let entries = ranker
            .nearby_for_user(&user, 1)
            .expect("known location")
            .wait()
            .expect("ranking");
        assert_eq!(entries[0].attraction.id, Uuid::from_u128(0));
    }

    #[rstest]
    fn entries_serialise_for_api_consumers(runtime: Runtime) {
        let ranker = ranker_with(&runtime, line_catalog(1), ConstantPointsOracle(9));
        let entries = ranker
            .rank(Uuid::nil(), &Location::new(0.0, 0.0), 1)
            .expect("ranking");
        let json = serde_json::to_value(&entries).expect("serialise ranking");
        assert_eq!(json[0]["attraction"]["name"], "Attraction 0");
        assert_eq!(json[0]["distance_miles"], 0.0);
        assert_eq!(json[0]["reward_points"], 9);
    }
}
