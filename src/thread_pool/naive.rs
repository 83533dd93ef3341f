use std::thread;

use super::ThreadPool;
use crate::Result;

/// a thread "pool" that is not actually a pool: it starts a new thread on every
/// spawn request
pub struct NaiveThreadPool;

impl ThreadPool for NaiveThreadPool {
    fn new(_threads: u32) -> Result<Self> {
        Ok(NaiveThreadPool)
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        thread::spawn(job);
    }
}
