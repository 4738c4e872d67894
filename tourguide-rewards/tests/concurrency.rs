//! Many users scanned and tracked at once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tourguide_core::test_support::{
    ConstantPointsOracle, DelayedPointsOracle, FixedLocationOracle, MemoryCatalog,
};
use tourguide_core::{Attraction, Location, User, VisitedLocation};
use tourguide_rewards::{LocationTracker, RewardEngine, TaskPool};

const USERS: usize = 60;

#[fixture]
fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .max_blocking_threads(64)
        .build()
        .expect("build runtime")
}

/// One attraction per user, each far from the others.
fn spread_catalog() -> MemoryCatalog {
    MemoryCatalog::with_attractions((0..USERS).map(|i| {
        let step = u32::try_from(i).expect("small index");
        Attraction::with_random_id(
            format!("Stop {i}"),
            Location::new(f64::from(step), f64::from(step * 2)),
        )
    }))
}

#[rstest]
fn users_only_earn_rewards_for_their_own_visits(runtime: Runtime) {
    let catalog = spread_catalog();
    let attractions = catalog.as_slice().to_vec();
    let engine = RewardEngine::new(
        Arc::new(catalog),
        Arc::new(ConstantPointsOracle(1)),
        TaskPool::new("rewards", runtime.handle().clone(), 16),
    );

    let users = users_at(&attractions);

    let handles: Vec<_> = users
        .iter()
        .map(|user| engine.calculate_rewards(Arc::clone(user)))
        .collect();
    for handle in handles {
        handle.wait().expect("scan should succeed");
    }

    for (user, attraction) in users.iter().zip(&attractions) {
        let rewards = user.rewards();
        assert_eq!(rewards.len(), 1, "{} should earn exactly one reward", user.name());
        assert_eq!(rewards[0].attraction.id, attraction.id);
        assert_eq!(rewards[0].visited_location.user_id, user.id());
    }
}

/// Each user has three visits at their own attraction.
fn users_at(attractions: &[Attraction]) -> Vec<Arc<User>> {
    attractions
        .iter()
        .enumerate()
        .map(|(i, attraction)| {
            let user = Arc::new(User::new(format!("user{i}")));
            for _ in 0..3 {
                user.add_visited_location(VisitedLocation::now(user.id(), attraction.location));
            }
            user
        })
        .collect()
}

#[rstest]
fn slow_reward_scans_run_in_parallel(runtime: Runtime) {
    let delay = Duration::from_millis(50);
    let catalog = spread_catalog();
    let users = users_at(catalog.as_slice());
    let engine = RewardEngine::new(
        Arc::new(catalog),
        Arc::new(DelayedPointsOracle::new(7, delay)),
        TaskPool::new("rewards", runtime.handle().clone(), 16),
    );

    let started = Instant::now();
    let handles: Vec<_> = users
        .iter()
        .map(|user| engine.calculate_rewards(Arc::clone(user)))
        .collect();
    for handle in handles {
        handle.wait().expect("scan should succeed");
    }
    let elapsed = started.elapsed();

    assert!(
        elapsed < delay * u32::try_from(USERS).expect("small count") / 4,
        "scanning {USERS} users took {elapsed:?}"
    );
    for user in &users {
        assert_eq!(user.total_reward_points(), 7, "{} earns one reward", user.name());
    }
}

#[rstest]
fn slow_lookups_run_in_parallel(runtime: Runtime) {
    let delay = Duration::from_millis(50);
    let rewards = RewardEngine::new(
        Arc::new(MemoryCatalog::default()),
        Arc::new(ConstantPointsOracle(1)),
        TaskPool::new("rewards", runtime.handle().clone(), 16),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    let tracker = LocationTracker::new(
        Arc::new(FixedLocationOracle::new(Location::new(10.0, 10.0)).with_delay(delay)),
        rewards,
        TaskPool::new("tracking", runtime.handle().clone(), 32),
    )
    .with_reward_monitor(tx);
    let users: Vec<_> = (0..USERS)
        .map(|i| Arc::new(User::new(format!("user{i}"))))
        .collect();

    let started = Instant::now();
    let results = runtime.block_on(tracker.track_all(&users));
    let elapsed = started.elapsed();

    assert!(results.iter().all(Result::is_ok));
    assert!(
        elapsed < delay * u32::try_from(USERS).expect("small count") / 4,
        "tracking {USERS} users took {elapsed:?}"
    );
    let reports = runtime.block_on(async {
        let mut reports = Vec::with_capacity(USERS);
        while reports.len() < USERS {
            reports.push(rx.recv().await.expect("monitor stays open"));
        }
        reports
    });
    assert!(reports.iter().all(|report| report.outcome.is_ok()));
}
