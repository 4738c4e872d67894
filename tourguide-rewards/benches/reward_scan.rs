//! Criterion benchmarks for reward scans.
//!
//! Measures a single scan over histories of increasing length against a
//! catalog of 26 attractions, the size of the reference catalog. Every
//! iteration scans a fresh user, so each one pays for granting rewards.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package tourguide-rewards
//! ```

#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::sync::Arc;

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tourguide_core::test_support::{ConstantPointsOracle, MemoryCatalog};
use tourguide_core::{Attraction, Location, User, VisitedLocation};
use tourguide_rewards::{RewardEngine, TaskPool};

const BENCHMARK_SEED: u64 = 42;
const CATALOG_SIZE: usize = 26;
const HISTORY_SIZES: &[usize] = &[10, 100, 1000];

fn random_location(rng: &mut ChaCha8Rng) -> Location {
    Location::new(rng.gen_range(-85.0..85.0), rng.gen_range(-180.0..180.0))
}

fn user_with_history(history: &[Location]) -> User {
    let user = User::new("bench");
    for &location in history {
        user.add_visited_location(VisitedLocation::now(user.id(), location));
    }
    user
}

fn bench_scan(c: &mut Criterion) {
    let runtime = match tokio::runtime::Builder::new_multi_thread().build() {
        Ok(runtime) => runtime,
        Err(err) => panic!("failed to build benchmark runtime: {err}"),
    };
    let mut rng = ChaCha8Rng::seed_from_u64(BENCHMARK_SEED);
    let catalog = MemoryCatalog::with_attractions(
        (0..CATALOG_SIZE)
            .map(|i| Attraction::with_random_id(format!("Attraction {i}"), random_location(&mut rng))),
    );
    let engine = RewardEngine::new(
        Arc::new(catalog),
        Arc::new(ConstantPointsOracle(1)),
        TaskPool::new("bench", runtime.handle().clone(), 1),
    );

    let mut group = c.benchmark_group("reward_scan");
    for &size in HISTORY_SIZES {
        let history: Vec<Location> = (0..size).map(|_| random_location(&mut rng)).collect();
        let visits = match u64::try_from(size) {
            Ok(visits) => visits,
            Err(err) => panic!("history size does not fit in u64: {err}"),
        };
        group.throughput(Throughput::Elements(visits));
        group.bench_with_input(BenchmarkId::new("visits", size), &history, |b, history| {
            b.iter_batched_ref(
                || user_with_history(history),
                |user| engine.scan(user),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
