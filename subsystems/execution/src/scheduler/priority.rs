//! # Priority Management
//!
//! Defines thread priorities and the fixed priority bands they classify
//! into. Larger numbers mean higher priority.
//!
//! | Band | Priorities | Discipline |
//! |------|-----------|------------|
//! | L1   | 100-149   | shortest remaining estimated burst first |
//! | L2   | 50-99     | highest priority first |
//! | L3   | 0-49      | first-in first-out |

use core::cmp::Ordering;
use core::fmt;
use static_assertions::const_assert;

/// Thread priority (0-149)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Priority(u8);

impl Priority {
    /// Lowest priority
    pub const MIN: Self = Self(0);

    /// Highest priority; every mutation saturates here
    pub const MAX: Self = Self(149);

    /// Create a new priority, clamped to [`Priority::MAX`]
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Get the raw priority value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Raise the priority by `amount`, saturating at `ceiling`.
    ///
    /// A ceiling above [`Priority::MAX`] is treated as `MAX`.
    pub fn boosted(self, amount: u8, ceiling: Priority) -> Self {
        let ceiling = ceiling.0.min(Self::MAX.0);
        if self.0 >= ceiling {
            return self;
        }
        Self(self.0.saturating_add(amount).min(ceiling))
    }

    /// Band this priority classifies into
    pub const fn band(self) -> Band {
        Band::for_priority(self)
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First priority of the L1 band
pub const L1_MIN: u8 = 100;
/// First priority of the L2 band
pub const L2_MIN: u8 = 50;
/// Last priority of the L2 band
pub const L2_MAX: u8 = L1_MIN - 1;
/// Last priority of the L3 band
pub const L3_MAX: u8 = L2_MIN - 1;

const_assert!(L2_MIN < L1_MIN);
const_assert!(L1_MIN <= 149);
const_assert!(L3_MAX < L2_MIN && L2_MAX < L1_MIN);

/// Ready queue band
///
/// `L1` is the highest band. Declaration order follows the queue-level
/// index, so the derived ordering puts higher bands first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    /// Priorities 100-149, shortest remaining burst first
    L1,
    /// Priorities 50-99, highest priority first
    L2,
    /// Priorities 0-49, round robin
    L3,
}

impl Band {
    /// All bands, highest first
    pub const ALL: [Band; 3] = [Band::L1, Band::L2, Band::L3];

    /// Classify a priority into its band
    pub const fn for_priority(priority: Priority) -> Self {
        let p = priority.value();
        if p >= L1_MIN {
            Band::L1
        } else if p >= L2_MIN {
            Band::L2
        } else {
            Band::L3
        }
    }

    /// Queue-level index (1 for L1, 3 for L3)
    pub const fn level(self) -> u8 {
        match self {
            Band::L1 => 1,
            Band::L2 => 2,
            Band::L3 => 3,
        }
    }

    /// Position of this band in [`Band::ALL`]
    pub const fn index(self) -> usize {
        self.level() as usize - 1
    }

    /// Check if this band strictly outranks `other`
    pub fn is_higher_than(self, other: Band) -> bool {
        self.level() < other.level()
    }

    /// Inclusive priority range covered by this band
    pub const fn range(self) -> (u8, u8) {
        match self {
            Band::L1 => (L1_MIN, Priority::MAX.value()),
            Band::L2 => (L2_MIN, L2_MAX),
            Band::L3 => (Priority::MIN.value(), L3_MAX),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.level())
    }
}
