//! # Scheduler Metrics
//!
//! Counters for scheduler activity. Atomics keep the counters readable
//! from a diagnostics path that only holds a shared reference.

use core::sync::atomic::{AtomicU64, Ordering};

/// Scheduler metrics
#[derive(Debug)]
pub struct SchedulerMetrics {
    /// Threads admitted to a ready queue
    admissions: AtomicU64,
    /// Threads removed from a ready queue for dispatch
    removals: AtomicU64,
    /// Total context switches
    context_switches: AtomicU64,
    /// Dispatch attempts that found nothing ready
    idle_picks: AtomicU64,
    /// Aging sweeps performed
    aging_sweeps: AtomicU64,
    /// Priority boosts granted by aging
    priority_boosts: AtomicU64,
    /// Threads moved to a different band by aging
    band_migrations: AtomicU64,
    /// Sweeps that decided to preempt
    preemption_verdicts: AtomicU64,
    /// Round-robin quanta that expired
    quantum_expiries: AtomicU64,
}

impl SchedulerMetrics {
    /// Create new metrics
    pub const fn new() -> Self {
        Self {
            admissions: AtomicU64::new(0),
            removals: AtomicU64::new(0),
            context_switches: AtomicU64::new(0),
            idle_picks: AtomicU64::new(0),
            aging_sweeps: AtomicU64::new(0),
            priority_boosts: AtomicU64::new(0),
            band_migrations: AtomicU64::new(0),
            preemption_verdicts: AtomicU64::new(0),
            quantum_expiries: AtomicU64::new(0),
        }
    }

    /// Record an admission
    pub fn record_admission(&self) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removal for dispatch
    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a context switch
    pub fn record_context_switch(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an idle pick
    pub fn record_idle_pick(&self) {
        self.idle_picks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an aging sweep
    pub fn record_aging_sweep(&self) {
        self.aging_sweeps.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a priority boost
    pub fn record_priority_boost(&self) {
        self.priority_boosts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a band migration
    pub fn record_band_migration(&self) {
        self.band_migrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a preemption verdict
    pub fn record_preemption_verdict(&self) {
        self.preemption_verdicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a quantum expiry
    pub fn record_quantum_expiry(&self) {
        self.quantum_expiries.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total admissions
    pub fn admissions(&self) -> u64 {
        self.admissions.load(Ordering::Relaxed)
    }

    /// Get total removals
    pub fn removals(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    /// Get total context switches
    pub fn context_switches(&self) -> u64 {
        self.context_switches.load(Ordering::Relaxed)
    }

    /// Get idle picks
    pub fn idle_picks(&self) -> u64 {
        self.idle_picks.load(Ordering::Relaxed)
    }

    /// Get aging sweeps
    pub fn aging_sweeps(&self) -> u64 {
        self.aging_sweeps.load(Ordering::Relaxed)
    }

    /// Get priority boosts
    pub fn priority_boosts(&self) -> u64 {
        self.priority_boosts.load(Ordering::Relaxed)
    }

    /// Get band migrations
    pub fn band_migrations(&self) -> u64 {
        self.band_migrations.load(Ordering::Relaxed)
    }

    /// Get preemption verdicts
    pub fn preemption_verdicts(&self) -> u64 {
        self.preemption_verdicts.load(Ordering::Relaxed)
    }

    /// Get quantum expiries
    pub fn quantum_expiries(&self) -> u64 {
        self.quantum_expiries.load(Ordering::Relaxed)
    }
}

impl Default for SchedulerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
