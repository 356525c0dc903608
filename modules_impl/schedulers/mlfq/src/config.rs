//! # MLFQ Scheduler Configuration

use strata_execution::scheduler::{Priority, L1_MIN};
use strata_execution::{ExecError, ExecResult, Tick};

/// Configuration for the MLFQ scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlfqConfig {
    /// Wait ticks a ready thread must exceed to earn a priority boost
    pub aging_threshold: Tick,
    /// Priority added per boost
    pub aging_boost: u8,
    /// Priority that aging never raises a thread beyond
    pub priority_ceiling: Priority,
    /// Ticks an L3 thread may run before the timer forces it to yield
    pub round_robin_quantum: Tick,
}

impl MlfqConfig {
    /// Default aging threshold: 1500 ticks
    pub const DEFAULT_AGING_THRESHOLD: Tick = 1500;
    /// Default aging boost: 10 priority levels
    pub const DEFAULT_AGING_BOOST: u8 = 10;
    /// Default round-robin quantum: 100 ticks
    pub const DEFAULT_QUANTUM: Tick = 100;

    /// Create default configuration
    pub fn new() -> Self {
        Self {
            aging_threshold: Self::DEFAULT_AGING_THRESHOLD,
            aging_boost: Self::DEFAULT_AGING_BOOST,
            priority_ceiling: Priority::MAX,
            round_robin_quantum: Self::DEFAULT_QUANTUM,
        }
    }

    /// Override the aging threshold and boost
    pub fn with_aging(mut self, threshold: Tick, boost: u8) -> Self {
        self.aging_threshold = threshold;
        self.aging_boost = boost;
        self
    }

    /// Override the round-robin quantum
    pub fn with_quantum(mut self, ticks: Tick) -> Self {
        self.round_robin_quantum = ticks;
        self
    }

    /// Check the configuration for values the scheduler cannot honour.
    ///
    /// The ceiling must sit inside L1, otherwise aging could never lift a
    /// starving thread into the top band.
    pub fn validate(&self) -> ExecResult<()> {
        if self.aging_threshold == 0 {
            log::warn!("[mlfq] aging threshold must be positive");
            return Err(ExecError::InvalidArgument);
        }
        if self.aging_boost == 0 {
            log::warn!("[mlfq] aging boost must be positive");
            return Err(ExecError::InvalidArgument);
        }
        if self.priority_ceiling.value() < L1_MIN {
            log::warn!(
                "[mlfq] priority ceiling {} is below the L1 band ({})",
                self.priority_ceiling,
                L1_MIN
            );
            return Err(ExecError::InvalidArgument);
        }
        if self.round_robin_quantum == 0 {
            log::warn!("[mlfq] round-robin quantum must be positive");
            return Err(ExecError::InvalidArgument);
        }
        Ok(())
    }
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self::new()
    }
}
