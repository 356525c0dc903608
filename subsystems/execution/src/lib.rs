//! # Strata Execution Subsystem
//!
//! The execution subsystem manages:
//! - Thread records and their scheduling attributes
//! - The thread table (an arena the run queues index into)
//! - Run queue disciplines and the scheduler framework traits
//! - The context switch seam
//!
//! ## Key Principle
//!
//! This subsystem provides FRAMEWORKS, not policies.
//! The actual scheduler is a module that implements [`scheduler::Scheduler`].

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

pub mod scheduler;
pub mod context;
pub mod thread;

use core::fmt;

/// Kernel time, in timer ticks since boot
pub type Tick = u64;

/// Unique identifier for threads
///
/// Identifiers are handed out by the [`thread::ThreadTable`] and stay stable
/// for the thread's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(u64);

impl ThreadId {
    /// Create a thread ID from its raw value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw ID value
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution result type
pub type ExecResult<T> = Result<T, ExecError>;

/// Execution errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
    /// Thread not found
    ThreadNotFound,
    /// Invalid state
    InvalidState,
    /// Already exists
    AlreadyExists,
    /// Invalid argument
    InvalidArgument,
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::ThreadNotFound => f.write_str("thread not found"),
            ExecError::InvalidState => f.write_str("invalid thread state"),
            ExecError::AlreadyExists => f.write_str("already exists"),
            ExecError::InvalidArgument => f.write_str("invalid argument"),
        }
    }
}
