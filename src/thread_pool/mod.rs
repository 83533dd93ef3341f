//! This module provides the thread pools used to dispatch work onto background
//! threads. The server serves each incoming connection on a thread from one of
//! these pools.
//!
//! Three implementations are provided: [`NaiveThreadPool`] starts a fresh thread
//! per job, [`SharedQueueThreadPool`] feeds a fixed set of worker threads from a
//! shared channel, and [`RayonThreadPool`] delegates to rayon's work stealing
//! scheduler.
//!
//! [`NaiveThreadPool`]: ./struct.NaiveThreadPool.html
//! [`SharedQueueThreadPool`]: ./struct.SharedQueueThreadPool.html
//! [`RayonThreadPool`]: ./struct.RayonThreadPool.html

use crate::Result;

/// A trait for the basic functionality of a pool of worker threads
pub trait ThreadPool {
    /// creates a new thread pool with `threads` worker threads
    ///
    /// # Errors
    /// returns an error if any of the worker threads could not be created
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// spawns a job onto the pool
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod naive;
mod rayon_pool;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::rayon_pool::RayonThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
