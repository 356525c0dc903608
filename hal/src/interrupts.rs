//! # Interrupt Level Control
//!
//! On a uniprocessor the scheduler's only mutual-exclusion mechanism is
//! running with interrupts disabled. This module defines the trait through
//! which the core observes and changes the interrupt level.

use core::fmt;

/// Processor interrupt level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptLevel {
    /// Interrupts are masked
    Off,
    /// Interrupts are delivered
    On,
}

impl InterruptLevel {
    /// Check if interrupts are masked at this level
    pub const fn is_off(self) -> bool {
        matches!(self, InterruptLevel::Off)
    }
}

impl fmt::Display for InterruptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptLevel::Off => f.write_str("IntOff"),
            InterruptLevel::On => f.write_str("IntOn"),
        }
    }
}

/// Interrupt level controller
///
/// Implemented by the architecture port (e.g. `cli`/`sti` on x86_64) or by
/// a simulated machine.
pub trait InterruptControl {
    /// Get the current interrupt level
    fn level(&self) -> InterruptLevel;

    /// Set the interrupt level, returning the previous one
    fn set_level(&self, level: InterruptLevel) -> InterruptLevel;

    /// Check if interrupts are currently enabled
    fn interrupts_enabled(&self) -> bool {
        !self.level().is_off()
    }

    /// Abort unless interrupts are disabled.
    ///
    /// Every scheduler entry point calls this first; running the core with
    /// interrupts enabled would corrupt the ready queues, so there is no
    /// recovery path.
    #[track_caller]
    fn assert_disabled(&self, operation: &str) {
        let level = self.level();
        assert!(
            level.is_off(),
            "{} called with interrupts enabled (level {})",
            operation,
            level
        );
    }
}

/// Execute `f` with interrupts disabled, restoring the previous level after.
pub fn without_interrupts<C, F, R>(controller: &C, f: F) -> R
where
    C: InterruptControl + ?Sized,
    F: FnOnce() -> R,
{
    let previous = controller.set_level(InterruptLevel::Off);
    let result = f();
    controller.set_level(previous);
    result
}
