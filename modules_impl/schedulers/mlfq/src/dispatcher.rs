//! # Dispatcher
//!
//! Hands the CPU from the running thread to the next one. A finishing
//! thread cannot free the stack it is still running on, so it is parked in
//! a single slot and destroyed by whichever thread runs after the switch.

use strata_execution::scheduler::{Band, SchedContext, Scheduler};
use strata_execution::thread::{Thread, ThreadState, ThreadTable};
use strata_execution::{ExecError, ExecResult, ThreadId};
use crate::events::SchedEvent;
use crate::MlfqScheduler;

impl MlfqScheduler {
    pub(crate) fn dispatch(
        &mut self,
        ctx: &mut SchedContext<'_>,
        next: ThreadId,
        finishing: bool,
    ) -> ExecResult<()> {
        ctx.interrupts.assert_disabled("run");
        let old = *ctx.current;

        let incoming = ctx.threads.get(next).ok_or(ExecError::ThreadNotFound)?;
        if next != old && incoming.state() != ThreadState::Ready {
            log::warn!(
                "[mlfq] cannot dispatch thread {} in state {}",
                next,
                incoming.state()
            );
            return Err(ExecError::InvalidState);
        }
        if let Some(band) = incoming.queue_level().filter(|_| next != old) {
            log::warn!("[mlfq] cannot dispatch thread {} while it is queued in {}", next, band);
            return Err(ExecError::InvalidState);
        }
        if finishing && next == old {
            log::warn!("[mlfq] finishing thread {} cannot dispatch itself", old);
            return Err(ExecError::InvalidArgument);
        }

        let outgoing = ctx.threads.get_mut(old).ok_or(ExecError::ThreadNotFound)?;
        if let Some(user) = outgoing.user_context_mut() {
            user.save_state();
        }
        outgoing.check_overflow();
        let ticks_run = outgoing.ticks_run();
        if finishing {
            self.mark_for_destruction(old);
        }

        if next != old {
            let incoming = ctx.threads.get_mut(next).ok_or(ExecError::ThreadNotFound)?;
            incoming.set_state(ThreadState::Running);
            incoming.reset_ticks_run();
            *ctx.current = next;

            log::trace!("[mlfq] switching from thread {} to thread {}", old, next);
            self.metrics.record_context_switch();
            self.emit(SchedEvent::Dispatched {
                tick: ctx.now,
                from: old,
                to: next,
                ticks_run,
            });
        }

        ctx.switcher.switch_to(old, next);

        // Back on the CPU, possibly much later.
        ctx.interrupts.assert_disabled("run (resumed)");
        self.check_to_be_destroyed(ctx.threads);

        if let Some(user) = ctx.current_thread_mut().and_then(Thread::user_context_mut) {
            user.restore_state();
        }
        Ok(())
    }

    /// Park a finished thread until it is off the CPU
    pub(crate) fn mark_for_destruction(&mut self, id: ThreadId) {
        if let Some(pending) = self.to_be_destroyed {
            panic!(
                "thread {} marked for destruction while thread {} is still pending",
                id, pending
            );
        }
        self.to_be_destroyed = Some(id);
    }

    /// Destroy the parked thread, if any
    pub fn check_to_be_destroyed(&mut self, threads: &mut ThreadTable) {
        let Some(id) = self.to_be_destroyed.take() else {
            return;
        };
        match threads.remove(id) {
            Ok(thread) => log::debug!("[mlfq] destroyed finished thread {} ({})", id, thread.name()),
            Err(err) => log::warn!("[mlfq] finished thread {} vanished before destruction: {}", id, err),
        }
    }

    /// Timer interrupt hook.
    ///
    /// Runs the aging sweep and checks the round-robin quantum of an L3
    /// thread. Returns true if the running thread should yield.
    pub fn on_tick(&mut self, ctx: &mut SchedContext<'_>) -> bool {
        let preempt = self.age(ctx);
        let expired = ctx
            .current_thread()
            .filter(|thread| thread.state() == ThreadState::Running)
            .is_some_and(|thread| self.quantum_expired(thread));
        if expired {
            self.metrics.record_quantum_expiry();
            log::trace!("[mlfq] thread {} used up its quantum", ctx.current);
        }
        preempt || expired
    }

    /// Whether `thread`, running in L3, has used up its quantum
    pub fn quantum_expired(&self, thread: &Thread) -> bool {
        thread.priority().band() == Band::L3 && thread.ticks_run() >= self.config.round_robin_quantum
    }
}
