//! Shared FIFO of pending detail-page jobs.
//!
//! Claiming and draining are synchronous and hold the lock only for the pop
//! itself, so two workers can never claim the same job and no lock is ever
//! held across an await point.

use leadscan_core::{ExtractionJob, ListingItem};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Jobs waiting for a worker, in enumeration order.
#[derive(Debug, Default)]
pub struct TaskQueue {
    jobs: Mutex<VecDeque<ExtractionJob>>,
}

impl TaskQueue {
    /// Queue holding `jobs` in order.
    pub fn new(jobs: impl IntoIterator<Item = ExtractionJob>) -> Self {
        Self {
            jobs: Mutex::new(jobs.into_iter().collect()),
        }
    }

    /// Queue every item in enumeration order.
    pub fn from_items(items: Vec<ListingItem>) -> Self {
        Self::new(ExtractionJob::from_items(items))
    }

    /// Take ownership of the job at the head of the queue.
    pub fn claim_next(&self) -> Option<ExtractionJob> {
        self.lock().pop_front()
    }

    /// Remove and return every job still pending.
    pub fn drain(&self) -> Vec<ExtractionJob> {
        self.lock().drain(..).collect()
    }

    /// Number of jobs still pending.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether every job has been claimed.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ExtractionJob>> {
        // Jobs are plain data; a panic elsewhere cannot leave them half-written.
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
