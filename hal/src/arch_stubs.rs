//! # Stub Implementations
//!
//! Host-side stand-ins for the hardware seams, used by simulated machines
//! and by the test suites of the crates above the HAL.

use crate::interrupts::{InterruptControl, InterruptLevel};
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Architecture name constant
pub const ARCH_NAME: &str = {
    #[cfg(target_arch = "x86_64")]
    { "x86_64" }
    #[cfg(target_arch = "aarch64")]
    { "aarch64" }
    #[cfg(target_arch = "riscv64")]
    { "riscv64" }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "riscv64")))]
    { "unknown" }
};

/// Simulated interrupt controller
///
/// Tracks the level in an atomic flag so it can be shared by reference with
/// the scheduler context while the test still observes it.
#[derive(Debug)]
pub struct StubInterrupts {
    enabled: AtomicBool,
    transitions: AtomicU64,
}

impl StubInterrupts {
    /// Create a controller at the given level
    pub const fn new(level: InterruptLevel) -> Self {
        Self {
            enabled: AtomicBool::new(matches!(level, InterruptLevel::On)),
            transitions: AtomicU64::new(0),
        }
    }

    /// Create a controller with interrupts disabled
    pub const fn disabled() -> Self {
        Self::new(InterruptLevel::Off)
    }

    /// Create a controller with interrupts enabled
    pub const fn enabled() -> Self {
        Self::new(InterruptLevel::On)
    }

    /// Number of level changes performed so far
    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::Relaxed)
    }
}

impl Default for StubInterrupts {
    fn default() -> Self {
        Self::disabled()
    }
}

impl InterruptControl for StubInterrupts {
    fn level(&self) -> InterruptLevel {
        if self.enabled.load(Ordering::SeqCst) {
            InterruptLevel::On
        } else {
            InterruptLevel::Off
        }
    }

    fn set_level(&self, level: InterruptLevel) -> InterruptLevel {
        let was_enabled = self
            .enabled
            .swap(matches!(level, InterruptLevel::On), Ordering::SeqCst);
        let previous = if was_enabled { InterruptLevel::On } else { InterruptLevel::Off };
        if previous != level {
            self.transitions.fetch_add(1, Ordering::Relaxed);
            log::trace!("[{}] interrupt level {} -> {}", ARCH_NAME, previous, level);
        }
        previous
    }
}
