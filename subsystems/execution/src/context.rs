//! # Context Switching
//!
//! The register/stack swap itself is architecture-specific and lives
//! outside the scheduler core. The core only sees this seam.

use crate::ThreadId;
use alloc::vec::Vec;

/// Context switch primitive
///
/// `switch_to` saves all but the floating-point registers of `from`,
/// restores those of `to` and starts running `to`. The call returns only
/// when some later switch resumes `from`. It must be invoked with
/// interrupts disabled, and interrupts are disabled again when it returns.
pub trait ContextSwitch {
    /// Transfer the CPU from `from` to `to`
    fn switch_to(&mut self, from: ThreadId, to: ThreadId);
}

/// Recording switch for host builds
///
/// Returns immediately, as if the outgoing thread were resumed at once,
/// and remembers every hand-off it was asked to perform.
#[derive(Debug, Default)]
pub struct StubSwitch {
    switches: Vec<(ThreadId, ThreadId)>,
}

impl StubSwitch {
    /// Create a new recording switch
    pub const fn new() -> Self {
        Self { switches: Vec::new() }
    }

    /// Hand-offs performed so far, oldest first
    pub fn switches(&self) -> &[(ThreadId, ThreadId)] {
        &self.switches
    }

    /// Number of hand-offs performed so far
    pub fn count(&self) -> usize {
        self.switches.len()
    }
}

impl ContextSwitch for StubSwitch {
    fn switch_to(&mut self, from: ThreadId, to: ThreadId) {
        log::trace!("stub switch {} -> {}", from, to);
        self.switches.push((from, to));
    }
}
