//! # Strata HAL - Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the scheduler core depends on.
//! Architecture ports implement these traits; the core never touches the
//! hardware directly.
//!
//! ## Design Philosophy
//!
//! The HAL is designed to be:
//! - **Minimal**: Only exposes what the scheduler needs
//! - **Safe**: Encapsulates all unsafe operations behind the trait
//! - **Replaceable**: Host stubs stand in for real hardware in tests

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod interrupts;

// Stub implementations (for host builds and tests)
pub mod arch_stubs;

pub use interrupts::{InterruptControl, InterruptLevel};

/// Virtual address type (architecture-independent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct VirtAddr(u64);

impl VirtAddr {
    /// Create a new virtual address
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Create a virtual address from a pointer
    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as u64)
    }

    /// Get the raw address value
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Offset the address by `offset` bytes
    #[inline]
    pub const fn add(self, offset: u64) -> Self {
        Self(self.0 + offset)
    }
}

impl core::fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
