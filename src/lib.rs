// #![deny(missing_docs)]
//! A fixed-size worker thread pool over a shared FIFO queue.

mod errors;
mod queue;
mod thread_pool;

pub use errors::{PoolError, Result};
pub use queue::{Job, TaskQueue};
pub use thread_pool::{SharedQueueThreadPool, ShutdownMode};
