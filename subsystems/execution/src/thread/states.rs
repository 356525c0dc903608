//! # Thread States
//!
//! Thread state machine definition.
//!
//! ```text
//! Creating -> Ready -> Running -> { Ready, Blocked, Zombie }
//! Blocked  -> Ready
//! Zombie   -> Dead
//! ```

use core::fmt;

/// Thread scheduling status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadState {
    /// Thread is being created
    #[default]
    Creating,
    /// Thread is ready to run
    Ready,
    /// Thread is currently running
    Running,
    /// Thread is blocked waiting for something
    Blocked,
    /// Thread has finished and is waiting to be destroyed
    Zombie,
    /// Thread has been destroyed
    Dead,
}

impl ThreadState {
    /// Valid transitions from this state
    pub fn valid_transitions(&self) -> &'static [ThreadState] {
        match self {
            ThreadState::Creating => &[ThreadState::Ready, ThreadState::Dead],
            ThreadState::Ready => &[ThreadState::Running],
            ThreadState::Running => &[
                ThreadState::Ready,
                ThreadState::Blocked,
                ThreadState::Zombie,
            ],
            ThreadState::Blocked => &[ThreadState::Ready, ThreadState::Dead],
            ThreadState::Zombie => &[ThreadState::Dead],
            ThreadState::Dead => &[],
        }
    }

    /// Check if moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: ThreadState) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThreadState::Creating => "JUST_CREATED",
            ThreadState::Ready => "READY",
            ThreadState::Running => "RUNNING",
            ThreadState::Blocked => "BLOCKED",
            ThreadState::Zombie => "ZOMBIE",
            ThreadState::Dead => "DEAD",
        };
        f.write_str(name)
    }
}
