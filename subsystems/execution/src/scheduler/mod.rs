//! # Scheduler Framework
//!
//! This module defines the scheduler FRAMEWORK, not a specific scheduler:
//! priorities and bands, run queue disciplines, the [`Scheduler`] trait
//! and its metrics. Scheduling policies are provided as modules.

pub mod traits;
pub mod queue;
pub mod priority;
pub mod metrics;

pub use traits::*;
pub use priority::*;
pub use queue::{BurstQueue, FifoQueue, PriorityQueue};
pub use metrics::SchedulerMetrics;
