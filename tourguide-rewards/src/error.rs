use thiserror::Error;
use tourguide_core::{AttractionId, ProviderError, UserId};

/// Errors raised by reward scans, rankings and location tracking.
///
/// Collaborator failures abort the whole operation: nothing is retried and
/// no partial result is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The attraction catalog could not be read.
    #[error("failed to fetch the attraction catalog: {0}")]
    Catalog(#[source] ProviderError),
    /// The reward-point oracle failed for an attraction.
    #[error("failed to look up reward points for attraction {attraction_id}: {source}")]
    RewardPoints {
        /// Attraction whose points were requested.
        attraction_id: AttractionId,
        /// Underlying oracle failure.
        #[source]
        source: ProviderError,
    },
    /// The location oracle failed for a user.
    #[error("failed to locate user {user_id}: {source}")]
    Location {
        /// User whose location was requested.
        user_id: UserId,
        /// Underlying oracle failure.
        #[source]
        source: ProviderError,
    },
    /// A ranking was requested for a user without any recorded visit.
    #[error("user {user_id} has no known location")]
    NoKnownLocation {
        /// User without history.
        user_id: UserId,
    },
    /// A pooled task panicked or was cancelled before completing.
    #[error("task on pool {pool} did not complete: {reason}")]
    Task {
        /// Name of the pool that ran the task.
        pool: String,
        /// Panic or cancellation description.
        reason: String,
    },
    /// The pool's permits were closed, so no further work is accepted.
    #[error("pool {pool} is closed")]
    PoolClosed {
        /// Name of the closed pool.
        pool: String,
    },
    /// Waiting synchronously was attempted on a current-thread runtime.
    #[error("cannot block on a task from inside a current-thread runtime")]
    BlockingUnsupported,
}
