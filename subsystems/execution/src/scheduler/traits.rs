//! # Scheduler Traits
//!
//! Defines the traits that scheduler implementations must implement, and
//! the context every scheduler entry point operates on.

use crate::{ExecResult, Tick, ThreadId};
use crate::context::ContextSwitch;
use crate::thread::{Thread, ThreadState, ThreadTable};
use strata_hal::InterruptControl;
use alloc::vec::Vec;

/// Kernel state handed to every scheduler call
///
/// There is no global "current thread" or tick counter; the caller passes
/// them in, together with the machine seams the scheduler needs.
pub struct SchedContext<'a> {
    /// Every thread record
    pub threads: &'a mut ThreadTable,
    /// The thread occupying the CPU
    pub current: &'a mut ThreadId,
    /// Current tick count
    pub now: Tick,
    /// Interrupt level control
    pub interrupts: &'a dyn InterruptControl,
    /// Context switch primitive
    pub switcher: &'a mut dyn ContextSwitch,
}

impl<'a> SchedContext<'a> {
    /// Bundle the kernel state for a scheduler call
    pub fn new(
        threads: &'a mut ThreadTable,
        current: &'a mut ThreadId,
        now: Tick,
        interrupts: &'a dyn InterruptControl,
        switcher: &'a mut dyn ContextSwitch,
    ) -> Self {
        Self {
            threads,
            current,
            now,
            interrupts,
            switcher,
        }
    }

    /// The running thread's record
    pub fn current_thread(&self) -> Option<&Thread> {
        self.threads.get(*self.current)
    }

    /// The running thread's record (mutable)
    pub fn current_thread_mut(&mut self) -> Option<&mut Thread> {
        self.threads.get_mut(*self.current)
    }
}

/// The core scheduler trait
///
/// Every method must be called with interrupts disabled.
pub trait Scheduler {
    /// Get the scheduler name
    fn name(&self) -> &'static str;

    /// Mark a thread ready and admit it to the ready queues
    fn ready_to_run(&mut self, ctx: &mut SchedContext<'_>, id: ThreadId) -> ExecResult<()>;

    /// Remove and return the next thread to run, or `None` to idle
    fn find_next_to_run(&mut self, ctx: &mut SchedContext<'_>) -> Option<ThreadId>;

    /// Dispatch the CPU to `next`.
    ///
    /// If `finishing` is set, the outgoing thread is destroyed once the CPU
    /// no longer runs on its stack.
    fn run(&mut self, ctx: &mut SchedContext<'_>, next: ThreadId, finishing: bool) -> ExecResult<()>;

    /// Re-evaluate the ready threads and decide whether the running thread
    /// must be preempted
    fn age(&mut self, ctx: &mut SchedContext<'_>) -> bool;

    /// Verdict of the most recent [`Scheduler::age`] call
    fn needs_reschedule(&self) -> bool;

    /// Get scheduler statistics
    fn stats(&self) -> SchedulerStats;

    /// Relinquish the CPU if another thread is ready.
    ///
    /// The running thread goes back on the ready queues. Returns the thread
    /// that was dispatched, or `None` if nothing else was ready.
    fn yield_current(&mut self, ctx: &mut SchedContext<'_>) -> ExecResult<Option<ThreadId>> {
        let Some(next) = self.find_next_to_run(ctx) else {
            return Ok(None);
        };
        let current = *ctx.current;
        self.ready_to_run(ctx, current)?;
        self.run(ctx, next, false)?;
        Ok(Some(next))
    }

    /// Give up the CPU because the running thread blocks or finishes.
    ///
    /// Returns `None` when no thread is ready; the caller then idles the CPU
    /// and retries once an interrupt readies a thread.
    fn sleep_current(
        &mut self,
        ctx: &mut SchedContext<'_>,
        finishing: bool,
    ) -> ExecResult<Option<ThreadId>> {
        let target = if finishing { ThreadState::Zombie } else { ThreadState::Blocked };
        if let Some(thread) = ctx.current_thread_mut() {
            if thread.state() != target {
                thread.transition(target)?;
            }
        }
        let Some(next) = self.find_next_to_run(ctx) else {
            return Ok(None);
        };
        self.run(ctx, next, finishing)?;
        Ok(Some(next))
    }
}

/// Scheduler statistics
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    /// Total number of context switches
    pub context_switches: u64,
    /// Ready threads per band, highest band first
    pub ready_threads: [usize; 3],
    /// Aging sweeps performed
    pub aging_sweeps: u64,
    /// Priority boosts granted by aging
    pub priority_boosts: u64,
    /// Sweeps that decided to preempt
    pub preemption_verdicts: u64,
    /// Dispatch attempts that found nothing ready
    pub idle_picks: u64,
}

impl SchedulerStats {
    /// Total number of ready threads
    pub fn total_ready(&self) -> usize {
        self.ready_threads.iter().sum()
    }
}

/// Run queue trait
pub trait RunQueue: Send {
    /// Add a thread to the queue, capturing its sort key
    fn enqueue(&mut self, thread: &Thread);

    /// Remove and return the next thread
    fn dequeue(&mut self) -> Option<ThreadId>;

    /// Peek at the next thread without removing
    fn peek(&self) -> Option<ThreadId>;

    /// Check if the queue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of threads in the queue
    fn len(&self) -> usize;

    /// Remove every thread, in dispatch order
    fn drain(&mut self) -> Vec<ThreadId>;

    /// Threads in dispatch order, without removing them
    fn ids(&self) -> Vec<ThreadId>;
}
