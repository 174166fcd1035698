use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    /// IO error, e.g. a worker thread could not be spawned.
    #[error("{}", _0)]
    Io(#[from] io::Error),
    /// The pool has begun shutting down and accepts no new jobs.
    #[error("thread pool is shutting down")]
    ShuttingDown,
    /// A pool cannot be created with zero workers.
    #[error("worker count must be at least one")]
    ZeroWorkers,
}

/// Result type for workpool.
pub type Result<T> = std::result::Result<T, PoolError>;
