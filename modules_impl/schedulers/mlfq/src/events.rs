//! # Scheduler Events
//!
//! Every queue transition and dispatch is reported as a [`SchedEvent`].
//! The rendered form is the kernel's scheduling trace: one line per event,
//! tagged `[A]` (admitted), `[B]` (removed), `[C]` (priority changed) or
//! `[E]` (dispatched).

use strata_execution::scheduler::{Band, Priority};
use strata_execution::{ThreadId, Tick};
use alloc::vec::Vec;
use core::fmt;
use spin::Mutex;

/// A scheduling event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedEvent {
    /// Thread inserted into a ready queue
    Admitted {
        tick: Tick,
        id: ThreadId,
        band: Band,
    },
    /// Thread removed from a ready queue for dispatch
    Removed {
        tick: Tick,
        id: ThreadId,
        band: Band,
    },
    /// Aging changed a thread's priority
    PriorityChanged {
        tick: Tick,
        id: ThreadId,
        old: Priority,
        new: Priority,
    },
    /// The CPU moved from one thread to another
    Dispatched {
        tick: Tick,
        from: ThreadId,
        to: ThreadId,
        /// Ticks the outgoing thread ran since it was dispatched
        ticks_run: Tick,
    },
}

impl SchedEvent {
    /// Tick at which the event happened
    pub fn tick(&self) -> Tick {
        match *self {
            Self::Admitted { tick, .. }
            | Self::Removed { tick, .. }
            | Self::PriorityChanged { tick, .. }
            | Self::Dispatched { tick, .. } => tick,
        }
    }

    /// Trace tag letter
    pub fn tag(&self) -> char {
        match self {
            Self::Admitted { .. } => 'A',
            Self::Removed { .. } => 'B',
            Self::PriorityChanged { .. } => 'C',
            Self::Dispatched { .. } => 'E',
        }
    }
}

impl fmt::Display for SchedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Admitted { tick, id, band } => write!(
                f,
                "[A] Tick [{}]: Thread [{}] is inserted into queue L[{}]",
                tick,
                id,
                band.level()
            ),
            Self::Removed { tick, id, band } => write!(
                f,
                "[B] Tick [{}]: Thread [{}] is removed from queue L[{}]",
                tick,
                id,
                band.level()
            ),
            Self::PriorityChanged { tick, id, old, new } => write!(
                f,
                "[C] Tick [{}]: Thread [{}] changes its priority from [{}] to [{}]",
                tick, id, old, new
            ),
            Self::Dispatched { tick, from, to, ticks_run } => write!(
                f,
                "[E] Tick [{}]: Thread [{}] is now selected for execution, \
                 thread [{}] is replaced, and it has executed [{}] ticks",
                tick, to, from, ticks_run
            ),
        }
    }
}

/// Destination for scheduling events
pub trait EventSink: Send + Sync {
    /// Record one event
    fn record(&self, event: &SchedEvent);
}

/// Sink that writes the trace through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: &SchedEvent) {
        log::debug!(target: "mlfq", "{}", event);
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SchedEvent>>,
}

impl RecordingSink {
    /// Create an empty recorder
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the events recorded so far
    pub fn events(&self) -> Vec<SchedEvent> {
        self.events.lock().clone()
    }

    /// Remove and return the events recorded so far
    pub fn take(&self) -> Vec<SchedEvent> {
        core::mem::take(&mut *self.events.lock())
    }

    /// Number of events recorded
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &SchedEvent) {
        self.events.lock().push(*event);
    }
}
