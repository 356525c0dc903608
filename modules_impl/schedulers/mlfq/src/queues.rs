//! # Ready Queue Set
//!
//! The three ready bands of the MLFQ, highest first:
//!
//! | Band | Priorities | Discipline                          |
//! |------|------------|-------------------------------------|
//! | L1   | 100..=149  | shortest remaining estimated burst  |
//! | L2   | 50..=99    | highest priority                    |
//! | L3   | 0..=49     | FIFO (round robin)                  |

use strata_execution::scheduler::{Band, BurstQueue, FifoQueue, PriorityQueue, RunQueue};
use strata_execution::thread::Thread;
use strata_execution::ThreadId;
use alloc::vec::Vec;

/// Outcome of admitting a thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Band the thread now sits in
    pub band: Band,
    /// Band recorded on the thread before admission
    pub previous: Option<Band>,
}

impl Admission {
    /// Whether the thread landed in a different band than before
    pub fn changed_band(&self) -> bool {
        self.previous != Some(self.band)
    }
}

/// The L1/L2/L3 ready queues
#[derive(Debug, Default)]
pub struct QueueSet {
    l1: BurstQueue,
    l2: PriorityQueue,
    l3: FifoQueue,
}

impl QueueSet {
    /// Create empty queues
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, band: Band) -> &dyn RunQueue {
        match band {
            Band::L1 => &self.l1,
            Band::L2 => &self.l2,
            Band::L3 => &self.l3,
        }
    }

    fn queue_mut(&mut self, band: Band) -> &mut dyn RunQueue {
        match band {
            Band::L1 => &mut self.l1,
            Band::L2 => &mut self.l2,
            Band::L3 => &mut self.l3,
        }
    }

    /// Insert `thread` into the band its priority selects and record the
    /// band on the thread
    pub fn admit(&mut self, thread: &mut Thread) -> Admission {
        let band = thread.priority().band();
        let previous = thread.queue_level();
        self.queue_mut(band).enqueue(thread);
        thread.set_queue_level(Some(band));
        Admission { band, previous }
    }

    /// Remove the head of the highest non-empty band
    pub fn remove_highest(&mut self) -> Option<(ThreadId, Band)> {
        Band::ALL
            .into_iter()
            .find_map(|band| self.queue_mut(band).dequeue().map(|id| (id, band)))
    }

    /// Head of the highest non-empty band, without removing it
    pub fn peek_highest(&self) -> Option<(ThreadId, Band)> {
        Band::ALL
            .into_iter()
            .find_map(|band| self.queue(band).peek().map(|id| (id, band)))
    }

    /// Empty every band, returning the ids highest band first and each band
    /// in dispatch order. Re-admitting them in that order keeps ties stable.
    pub fn drain_all(&mut self) -> Vec<ThreadId> {
        let mut ids = Vec::with_capacity(self.len());
        for band in Band::ALL {
            ids.extend(self.queue_mut(band).drain());
        }
        ids
    }

    /// Threads queued in `band`, in dispatch order
    pub fn ids(&self, band: Band) -> Vec<ThreadId> {
        self.queue(band).ids()
    }

    /// Every queued thread, highest band first, each band in dispatch order
    pub fn snapshot(&self) -> [Vec<ThreadId>; 3] {
        Band::ALL.map(|band| self.ids(band))
    }

    /// Check whether `id` is queued in any band
    pub fn contains(&self, id: ThreadId) -> bool {
        Band::ALL.into_iter().any(|band| self.ids(band).contains(&id))
    }

    /// Number of threads queued in `band`
    pub fn len_of(&self, band: Band) -> usize {
        self.queue(band).len()
    }

    /// Number of queued threads
    pub fn len(&self) -> usize {
        Band::ALL.into_iter().map(|band| self.len_of(band)).sum()
    }

    /// Check whether every band is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dump the queue contents to the log
    pub fn print(&self) {
        log::info!("Ready list contents:");
        for band in Band::ALL {
            log::info!("  {}: {:?}", band, self.ids(band));
        }
    }
}
