//! # MLFQ Scheduler Module
//!
//! A three-band multi-level feedback queue scheduler for Strata.
//!
//! ## Features
//! - L1 (priority 100-149): shortest remaining burst first
//! - L2 (priority 50-99): highest priority first
//! - L3 (priority 0-49): round robin with a fixed quantum
//! - Aging: ready threads gain priority the longer they wait
//! - Preemption verdicts after every aging sweep
//! - Deferred destruction of finished threads
//!
//! ## Usage
//!
//! ```ignore
//! let mut sched = strata_scheduler_mlfq::create_scheduler();
//! let mut ctx = SchedContext::new(&mut threads, &mut current, now, &irq, &mut switcher);
//! sched.ready_to_run(&mut ctx, worker)?;
//! if let Some(next) = sched.find_next_to_run(&mut ctx) {
//!     sched.ready_to_run(&mut ctx, current_id)?;
//!     sched.run(&mut ctx, next, false)?;
//! }
//! ```
//!
//! Every entry point must be called with interrupts disabled.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod config;
mod dispatcher;
pub mod events;
pub mod queues;
mod scheduler;

mod tests;

pub use config::MlfqConfig;
pub use events::{EventSink, LogSink, RecordingSink, SchedEvent};
pub use queues::{Admission, QueueSet};
pub use scheduler::MlfqScheduler;

use strata_execution::ExecResult;

/// Create a scheduler with the default configuration
pub fn create_scheduler() -> MlfqScheduler {
    MlfqScheduler::default()
}

/// Create a scheduler with a custom configuration
pub fn create_scheduler_with_config(config: MlfqConfig) -> ExecResult<MlfqScheduler> {
    MlfqScheduler::new(config)
}
