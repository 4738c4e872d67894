//! Bounded pools for blocking engine work.
//!
//! Reward scans and location lookups call collaborators that may block, so
//! each job runs on the Tokio runtime's blocking threads. A pool caps how many
//! of its jobs run at once with a semaphore; surplus submissions queue on the
//! semaphore instead of failing or blocking the submitter.
//!
//! Pools should run on a multi-thread runtime. Jobs cannot be cancelled once
//! submitted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};

use crate::EngineError;

/// Permits in the pool dedicated to reward scans.
pub const REWARD_POOL_SIZE: usize = 1000;

/// Permits in the pool dedicated to location tracking.
pub const TRACKING_POOL_SIZE: usize = 2;

/// A named, bounded pool of blocking jobs.
///
/// Cloning yields another handle onto the same permits.
///
/// # Examples
/// ```
/// use tourguide_rewards::TaskPool;
///
/// let runtime = tokio::runtime::Builder::new_multi_thread().build()?;
/// let pool = TaskPool::new("example", runtime.handle().clone(), 2);
/// let answer = pool.spawn(|| Ok(21 * 2)).wait()?;
/// assert_eq!(answer, 42);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaskPool {
    name: Arc<str>,
    runtime: Handle,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl TaskPool {
    /// Create a pool running at most `capacity` jobs at once on `runtime`.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, runtime: Handle, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: name.into(),
            runtime,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Pool name, used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of concurrently running jobs.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by a running job.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Runtime the pool submits work to.
    #[must_use]
    pub const fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Submit a blocking job.
    ///
    /// The job starts once a permit is free. The returned handle resolves to
    /// the job's result, or to [`EngineError::Task`] when the job panics.
    pub fn spawn<T, F>(&self, job: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Result<T, EngineError> + Send + 'static,
        T: Send + 'static,
    {
        let name = Arc::clone(&self.name);
        let permits = Arc::clone(&self.permits);
        let inner = self.runtime.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| EngineError::PoolClosed {
                    pool: name.to_string(),
                })?;
            tokio::task::spawn_blocking(job)
                .await
                .unwrap_or_else(|err| Err(task_error(&name, &err)))
        });
        TaskHandle {
            pool: Arc::clone(&self.name),
            runtime: self.runtime.clone(),
            inner,
        }
    }
}

pub(crate) fn task_error(pool: &str, err: &JoinError) -> EngineError {
    let reason = if err.is_panic() {
        "job panicked".to_owned()
    } else {
        err.to_string()
    };
    EngineError::Task {
        pool: pool.to_owned(),
        reason,
    }
}

/// Completion handle for a pooled job.
///
/// Await it from async code, or call [`TaskHandle::wait`] from synchronous
/// code. Dropping the handle detaches the job; it still runs to completion.
#[derive(Debug)]
#[must_use = "dropping a TaskHandle discards the job's result"]
pub struct TaskHandle<T> {
    pool: Arc<str>,
    runtime: Handle,
    inner: JoinHandle<Result<T, EngineError>>,
}

impl<T> TaskHandle<T> {
    /// Whether the job has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Block the current thread until the job finishes.
    ///
    /// Outside any runtime this drives the pool's runtime handle. Inside a
    /// multi-thread runtime the worker is handed over with
    /// [`tokio::task::block_in_place`] first.
    ///
    /// # Errors
    /// Returns the job's error, [`EngineError::Task`] when it panicked, or
    /// [`EngineError::BlockingUnsupported`] when called from a
    /// current-thread runtime.
    pub fn wait(self) -> Result<T, EngineError> {
        match Handle::try_current() {
            Ok(current) if current.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| current.block_on(self))
            }
            Ok(_) => Err(EngineError::BlockingUnsupported),
            Err(_) => {
                let runtime = self.runtime.clone();
                runtime.block_on(self)
            }
        }
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, EngineError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) => Poll::Ready(Err(task_error(&self.pool, &err))),
            Poll::Pending => Poll::Pending,
        }
    }
}
