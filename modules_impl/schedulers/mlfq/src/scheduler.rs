//! # MLFQ Scheduler Implementation

use strata_execution::scheduler::{Band, SchedContext, Scheduler, SchedulerMetrics, SchedulerStats};
use strata_execution::thread::{Thread, ThreadState};
use strata_execution::{ExecError, ExecResult, ThreadId, Tick};
use crate::events::{EventSink, LogSink, SchedEvent};
use crate::queues::QueueSet;
use crate::MlfqConfig;
use alloc::sync::Arc;
use core::fmt;

/// Multi-level feedback queue scheduler
pub struct MlfqScheduler {
    /// Configuration
    pub(crate) config: MlfqConfig,
    /// Ready queues
    pub(crate) queues: QueueSet,
    /// Verdict of the last aging sweep
    pub(crate) preempting: bool,
    /// Finished thread waiting to be destroyed off its own stack
    pub(crate) to_be_destroyed: Option<ThreadId>,
    /// Event destination
    pub(crate) sink: Arc<dyn EventSink>,
    /// Statistics
    pub(crate) metrics: SchedulerMetrics,
}

impl MlfqScheduler {
    /// Create a new scheduler
    pub fn new(config: MlfqConfig) -> ExecResult<Self> {
        config.validate()?;
        log::info!(
            "Initializing MLFQ scheduler: +{} priority per {} waiting ticks, ceiling {}, L3 quantum {}",
            config.aging_boost,
            config.aging_threshold,
            config.priority_ceiling,
            config.round_robin_quantum
        );
        Ok(Self::build(config))
    }

    fn build(config: MlfqConfig) -> Self {
        Self {
            config,
            queues: QueueSet::new(),
            preempting: false,
            to_be_destroyed: None,
            sink: Arc::new(LogSink),
            metrics: SchedulerMetrics::new(),
        }
    }

    /// Send events to `sink` instead of the log
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get configuration
    pub fn config(&self) -> &MlfqConfig {
        &self.config
    }

    /// Get the ready queues
    pub fn queues(&self) -> &QueueSet {
        &self.queues
    }

    /// Get metrics
    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// Finished thread not yet destroyed, if any
    pub fn pending_destruction(&self) -> Option<ThreadId> {
        self.to_be_destroyed
    }

    /// Dump the ready queues to the log
    pub fn print(&self) {
        self.queues.print();
    }

    /// Ready a woken thread and re-run the aging sweep.
    ///
    /// Returns the sweep's preemption verdict, so an interrupt handler can
    /// request a yield when the woken thread outranks the running one.
    pub fn wake(&mut self, ctx: &mut SchedContext<'_>, id: ThreadId) -> ExecResult<bool> {
        self.ready_to_run(ctx, id)?;
        Ok(self.age(ctx))
    }

    pub(crate) fn emit(&self, event: SchedEvent) {
        self.sink.record(&event);
    }

    /// Fold the ticks `thread` waited into its credit and spend one
    /// threshold's worth on a priority boost
    fn credit_wait(&self, thread: &mut Thread, now: Tick) {
        thread.accrue_wait(now);
        if thread.waiting_time() <= self.config.aging_threshold {
            return;
        }
        thread.consume_wait_credit(self.config.aging_threshold);

        let old = thread.priority();
        let new = old.boosted(self.config.aging_boost, self.config.priority_ceiling);
        if new == old {
            return;
        }
        thread.set_priority(new);
        self.metrics.record_priority_boost();
        self.emit(SchedEvent::PriorityChanged {
            tick: now,
            id: thread.id(),
            old,
            new,
        });
    }
}

impl fmt::Debug for MlfqScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MlfqScheduler")
            .field("config", &self.config)
            .field("queues", &self.queues)
            .field("preempting", &self.preempting)
            .field("to_be_destroyed", &self.to_be_destroyed)
            .finish_non_exhaustive()
    }
}

impl Default for MlfqScheduler {
    fn default() -> Self {
        Self::build(MlfqConfig::default())
    }
}

impl Scheduler for MlfqScheduler {
    fn name(&self) -> &'static str {
        "MLFQ"
    }

    fn ready_to_run(&mut self, ctx: &mut SchedContext<'_>, id: ThreadId) -> ExecResult<()> {
        ctx.interrupts.assert_disabled("ready_to_run");
        let now = ctx.now;
        let thread = ctx.threads.get_mut(id).ok_or(ExecError::ThreadNotFound)?;

        if let Some(band) = thread.queue_level() {
            log::warn!("[mlfq] thread {} is already queued in {}", id, band);
            return Err(ExecError::AlreadyExists);
        }
        thread.transition(ThreadState::Ready)?;
        thread.stamp_wait(now);

        log::trace!("[mlfq] putting thread {} ({}) on the ready list", id, thread.name());
        let admission = self.queues.admit(thread);
        self.metrics.record_admission();
        self.emit(SchedEvent::Admitted {
            tick: now,
            id,
            band: admission.band,
        });
        Ok(())
    }

    fn find_next_to_run(&mut self, ctx: &mut SchedContext<'_>) -> Option<ThreadId> {
        ctx.interrupts.assert_disabled("find_next_to_run");
        let Some((id, band)) = self.queues.remove_highest() else {
            self.metrics.record_idle_pick();
            return None;
        };

        let Some(thread) = ctx.threads.get_mut(id) else {
            panic!("ready queue {} holds unknown thread {}", band, id);
        };
        thread.accrue_wait(ctx.now);
        thread.set_queue_level(None);

        self.metrics.record_removal();
        self.emit(SchedEvent::Removed {
            tick: ctx.now,
            id,
            band,
        });
        Some(id)
    }

    fn run(&mut self, ctx: &mut SchedContext<'_>, next: ThreadId, finishing: bool) -> ExecResult<()> {
        self.dispatch(ctx, next, finishing)
    }

    /// Credit waiting time to every ready thread, re-sort the bands and
    /// decide whether the running thread must give up the CPU.
    ///
    /// Preemption is requested when an L1 thread has a shorter remaining
    /// burst than the running thread, or when any ready thread sits in a
    /// higher band than the running thread's priority selects. With no
    /// thread running, neither applies.
    fn age(&mut self, ctx: &mut SchedContext<'_>) -> bool {
        ctx.interrupts.assert_disabled("age");
        let now = ctx.now;
        // An idle CPU still names the thread that blocked or finished last
        let running = ctx
            .current_thread()
            .filter(|t| t.state() == ThreadState::Running)
            .map(|t| (t.priority().band(), t.remaining_burst()));

        let mut shortest_l1: Option<i64> = None;
        let mut outranked = false;

        for id in self.queues.drain_all() {
            let Some(thread) = ctx.threads.get_mut(id) else {
                panic!("ready queue holds unknown thread {}", id);
            };
            self.credit_wait(thread, now);

            let admission = self.queues.admit(thread);
            if admission.changed_band() {
                self.metrics.record_band_migration();
                self.emit(SchedEvent::Admitted {
                    tick: now,
                    id,
                    band: admission.band,
                });
            }

            if admission.band == Band::L1 {
                let remaining = thread.remaining_burst();
                shortest_l1 = Some(shortest_l1.map_or(remaining, |s| s.min(remaining)));
            }
            if let Some((running_band, _)) = running {
                outranked |= admission.band.is_higher_than(running_band);
            }
        }

        let shorter_burst = matches!(
            (shortest_l1, running),
            (Some(shortest), Some((_, remaining))) if shortest < remaining
        );
        self.preempting = shorter_burst || outranked;

        self.metrics.record_aging_sweep();
        if self.preempting {
            self.metrics.record_preemption_verdict();
        }
        log::trace!(
            "[mlfq] aging at tick {}: shortest L1 burst {:?}, outranked {}, preempt {}",
            now,
            shortest_l1,
            outranked,
            self.preempting
        );
        self.preempting
    }

    fn needs_reschedule(&self) -> bool {
        self.preempting
    }

    fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            context_switches: self.metrics.context_switches(),
            ready_threads: Band::ALL.map(|band| self.queues.len_of(band)),
            aging_sweeps: self.metrics.aging_sweeps(),
            priority_boosts: self.metrics.priority_boosts(),
            preemption_verdicts: self.metrics.preemption_verdicts(),
            idle_picks: self.metrics.idle_picks(),
        }
    }
}
