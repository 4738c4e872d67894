//! Background tracking of every registered user.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tourguide_core::UserRegistry;

use crate::pool::task_error;
use crate::{EngineError, LocationTracker};

const POLLER_NAME: &str = "tracking poller";

/// Periodically tracks every user in a registry.
///
/// Dropping the poller without calling [`TrackingPoller::stop`] also ends the
/// loop, but does not wait for the current round.
///
/// The first round starts immediately. A round that overruns the interval
/// delays the next one instead of triggering a burst of catch-up rounds.
/// The runtime must have its time driver enabled; otherwise the loop fails on
/// its first tick, logs at `error` and [`TrackingPoller::stop`] returns the
/// failure.
#[derive(Debug)]
#[must_use = "dropping the poller ends the polling loop"]
pub struct TrackingPoller {
    stop: watch::Sender<bool>,
    task: JoinHandle<Result<(), EngineError>>,
}

impl TrackingPoller {
    /// Spawn the polling loop on `runtime`.
    pub fn start(
        tracker: LocationTracker,
        registry: UserRegistry,
        interval: Duration,
        runtime: &Handle,
    ) -> Self {
        let (stop, stopped) = watch::channel(false);
        let rounds = runtime.spawn(poll(tracker, registry, interval, stopped));
        let task = runtime.spawn(async move {
            rounds.await.map_err(|err| {
                let err = task_error(POLLER_NAME, &err);
                log::error!("{err}");
                err
            })
        });
        Self { stop, task }
    }

    /// Whether the polling loop has exited.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop polling and wait for the current round to finish.
    ///
    /// # Errors
    /// Returns [`EngineError::Task`] when the loop panicked or was cancelled
    /// before it could be stopped.
    pub async fn stop(self) -> Result<(), EngineError> {
        if self.stop.send(true).is_err() {
            log::debug!("tracking poller already exited");
        }
        self.task
            .await
            .unwrap_or_else(|err| Err(task_error(POLLER_NAME, &err)))
    }
}

async fn poll(
    tracker: LocationTracker,
    registry: UserRegistry,
    interval: Duration,
    mut stopped: watch::Receiver<bool>,
) {
    let mut ticks = tokio::time::interval(interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = stopped.changed() => break,
            _ = ticks.tick() => {
                let users = registry.all_users();
                let failures = tracker
                    .track_all(&users)
                    .await
                    .into_iter()
                    .filter(Result::is_err)
                    .count();
                log::debug!(
                    "tracked {} users, {failures} lookups failed",
                    users.len()
                );
            }
        }
    }
}
