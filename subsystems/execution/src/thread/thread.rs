//! # Thread Structure
//!
//! Core thread record. The scheduler mutates the scheduling attributes in
//! place; everything else belongs to the broader kernel.

use crate::{ExecError, ExecResult, Tick, ThreadId};
use super::ThreadState;
use crate::scheduler::{Band, Priority};
use strata_hal::VirtAddr;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use core::fmt;

/// Thread flags
pub mod flags {
    use bitflags::bitflags;

    bitflags! {
        /// Thread flags
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct ThreadFlags: u32 {
            /// Thread only ever runs kernel code
            const KERNEL = 1 << 0;
            /// Thread owns a user-mode execution context
            const USER = 1 << 1;
            /// Thread is the boot thread the kernel started on
            const MAIN = 1 << 2;
        }
    }
}

pub use flags::ThreadFlags;

/// User-mode execution state of a thread
///
/// Implemented by the user-program subsystem. The dispatcher saves this
/// state before switching away from a thread and restores it once the
/// thread runs again.
pub trait UserContext {
    /// Save the user CPU registers and the address-space state
    fn save_state(&mut self);

    /// Restore the user CPU registers and the address-space state
    fn restore_state(&mut self);
}

/// Thread structure
pub struct Thread {
    /// Unique identifier
    id: ThreadId,
    /// Thread name
    name: String,
    /// Current state
    state: ThreadState,
    /// Flags
    flags: ThreadFlags,
    /// Priority (0-149)
    priority: Priority,
    /// Ready queue holding this thread, `None` when running or unqueued
    queue_level: Option<Band>,
    /// Ready ticks accrued since the last aging credit
    waiting_time: Tick,
    /// Tick at which `waiting_time` was last brought up to date
    last_wait: Tick,
    /// Predicted length of the current CPU burst
    predicted_burst: Tick,
    /// Ticks already consumed in the current CPU burst
    consumed_burst: Tick,
    /// Ticks executed since the thread was last dispatched
    ticks_run: Tick,
    /// Kernel stack
    kernel_stack: KernelStack,
    /// User-mode context, for user programs
    user_context: Option<Box<dyn UserContext>>,
}

impl Thread {
    /// Create a new kernel thread
    pub fn new(id: ThreadId, name: impl Into<String>, priority: Priority) -> Self {
        Self {
            id,
            name: name.into(),
            state: ThreadState::Creating,
            flags: ThreadFlags::KERNEL,
            priority,
            queue_level: None,
            waiting_time: 0,
            last_wait: 0,
            predicted_burst: 0,
            consumed_burst: 0,
            ticks_run: 0,
            kernel_stack: KernelStack::allocate(KernelStack::DEFAULT_SIZE),
            user_context: None,
        }
    }

    /// Attach a user-mode context, turning this into a user program thread
    pub fn with_user_context(mut self, context: Box<dyn UserContext>) -> Self {
        self.user_context = Some(context);
        self.flags.remove(ThreadFlags::KERNEL);
        self.flags.insert(ThreadFlags::USER);
        self
    }

    /// Set the predicted burst of the first CPU burst
    pub fn with_predicted_burst(mut self, ticks: Tick) -> Self {
        self.predicted_burst = ticks;
        self
    }

    /// Get thread ID
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Get thread name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current state
    pub fn state(&self) -> ThreadState {
        self.state
    }

    /// Set thread state without checking the transition.
    ///
    /// Used by the kernel to bootstrap threads (the boot thread starts out
    /// running without ever being dispatched).
    pub fn set_state(&mut self, state: ThreadState) {
        self.state = state;
    }

    /// Move to `next`, rejecting transitions the state machine forbids
    pub fn transition(&mut self, next: ThreadState) -> ExecResult<()> {
        if !self.state.can_transition_to(next) {
            log::warn!(
                "thread {} ({}): illegal transition {} -> {}",
                self.id, self.name, self.state, next
            );
            return Err(ExecError::InvalidState);
        }
        self.state = next;
        Ok(())
    }

    /// Get flags
    pub fn flags(&self) -> ThreadFlags {
        self.flags
    }

    /// Set a flag
    pub fn set_flag(&mut self, flag: ThreadFlags) {
        self.flags.insert(flag);
    }

    /// Check if this thread runs a user program
    pub fn is_user_program(&self) -> bool {
        self.flags.contains(ThreadFlags::USER)
    }

    /// Get priority
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Set priority
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Ready queue currently holding this thread
    pub fn queue_level(&self) -> Option<Band> {
        self.queue_level
    }

    /// Record the ready queue holding this thread
    pub fn set_queue_level(&mut self, level: Option<Band>) {
        self.queue_level = level;
    }

    /// Ready ticks accrued since the last aging credit
    pub fn waiting_time(&self) -> Tick {
        self.waiting_time
    }

    /// Tick at which the waiting time was last updated
    pub fn last_wait(&self) -> Tick {
        self.last_wait
    }

    /// Start the wait clock at `now` (the thread just became ready)
    pub fn stamp_wait(&mut self, now: Tick) {
        self.last_wait = now;
    }

    /// Add the ticks waited since the last update and move the clock to `now`
    pub fn accrue_wait(&mut self, now: Tick) {
        self.waiting_time += now.saturating_sub(self.last_wait);
        self.last_wait = now;
    }

    /// Spend `amount` ticks of wait credit, keeping the remainder
    pub fn consume_wait_credit(&mut self, amount: Tick) {
        self.waiting_time = self.waiting_time.saturating_sub(amount);
    }

    /// Predicted length of the current CPU burst
    pub fn predicted_burst(&self) -> Tick {
        self.predicted_burst
    }

    /// Ticks consumed in the current CPU burst
    pub fn consumed_burst(&self) -> Tick {
        self.consumed_burst
    }

    /// Remaining estimated burst (predicted minus consumed).
    ///
    /// Negative once the thread outruns its prediction.
    pub fn remaining_burst(&self) -> i64 {
        self.predicted_burst as i64 - self.consumed_burst as i64
    }

    /// Start a new CPU burst with the given prediction
    pub fn start_burst(&mut self, predicted: Tick) {
        self.predicted_burst = predicted;
        self.consumed_burst = 0;
    }

    /// Account one tick of CPU time to this thread
    pub fn record_cpu_tick(&mut self) {
        self.consumed_burst += 1;
        self.ticks_run += 1;
    }

    /// Ticks executed since the thread was last dispatched
    pub fn ticks_run(&self) -> Tick {
        self.ticks_run
    }

    /// Restart the per-dispatch tick counter
    pub fn reset_ticks_run(&mut self) {
        self.ticks_run = 0;
    }

    /// Get the kernel stack
    pub fn kernel_stack(&self) -> &KernelStack {
        &self.kernel_stack
    }

    /// Get the kernel stack (mutable)
    pub fn kernel_stack_mut(&mut self) -> &mut KernelStack {
        &mut self.kernel_stack
    }

    /// Abort if this thread overflowed its kernel stack
    #[track_caller]
    pub fn check_overflow(&self) {
        assert!(
            self.kernel_stack.is_intact(),
            "thread {} ({}) overflowed its kernel stack",
            self.id,
            self.name
        );
    }

    /// Get the user-mode context, if this thread runs a user program
    pub fn user_context_mut(&mut self) -> Option<&mut (dyn UserContext + 'static)> {
        self.user_context.as_deref_mut()
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("flags", &self.flags)
            .field("priority", &self.priority)
            .field("queue_level", &self.queue_level)
            .field("waiting_time", &self.waiting_time)
            .field("remaining_burst", &self.remaining_burst())
            .finish_non_exhaustive()
    }
}

/// Kernel stack
///
/// The lowest word holds a fence-post value. A thread that runs off the
/// bottom of its stack overwrites it, which [`Thread::check_overflow`]
/// detects at the next context switch.
pub struct KernelStack {
    /// Stack memory, lowest address first
    words: Box<[u64]>,
}

impl KernelStack {
    /// Default kernel stack size (16 KiB)
    pub const DEFAULT_SIZE: usize = 16 * 1024;

    /// Value guarding the bottom of every stack
    pub const FENCEPOST: u64 = 0xdedb_eef0_dedb_eef0;

    /// Allocate a kernel stack of `size` bytes
    pub fn allocate(size: usize) -> Self {
        let count = (size / core::mem::size_of::<u64>()).max(1);
        let mut words = vec![0u64; count].into_boxed_slice();
        words[0] = Self::FENCEPOST;
        Self { words }
    }

    /// Get stack top (highest address)
    pub fn top(&self) -> VirtAddr {
        self.base().add(self.size() as u64)
    }

    /// Get stack base (lowest address)
    pub fn base(&self) -> VirtAddr {
        VirtAddr::from_ptr(self.words.as_ptr())
    }

    /// Get stack size in bytes
    pub fn size(&self) -> usize {
        self.words.len() * core::mem::size_of::<u64>()
    }

    /// Raw stack memory
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Check that the fence-post is untouched
    pub fn is_intact(&self) -> bool {
        self.words[0] == Self::FENCEPOST
    }
}
