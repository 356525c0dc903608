//! # Thread Table
//!
//! Arena owning every thread record. Run queues hold only [`ThreadId`]
//! handles into this table, so removing a thread from a queue never touches
//! the record itself.

use crate::{ExecError, ExecResult, ThreadId};
use crate::scheduler::Priority;
use super::{Thread, ThreadState};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Thread table
#[derive(Debug)]
pub struct ThreadTable {
    /// All threads by ID
    threads: BTreeMap<ThreadId, Thread>,
    /// Next identifier to hand out
    next_id: u64,
}

impl ThreadTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            threads: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve a fresh thread identifier
    pub fn allocate_id(&mut self) -> ThreadId {
        let id = ThreadId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create and register a kernel thread
    pub fn spawn(&mut self, name: impl Into<String>, priority: Priority) -> ThreadId {
        let id = self.allocate_id();
        self.threads.insert(id, Thread::new(id, name, priority));
        id
    }

    /// Register an already-built thread
    pub fn insert(&mut self, thread: Thread) -> ExecResult<ThreadId> {
        let id = thread.id();
        if self.threads.contains_key(&id) {
            return Err(ExecError::AlreadyExists);
        }
        if id.as_u64() >= self.next_id {
            self.next_id = id.as_u64() + 1;
        }
        self.threads.insert(id, thread);
        Ok(id)
    }

    /// Destroy a thread, handing back its record
    pub fn remove(&mut self, id: ThreadId) -> ExecResult<Thread> {
        let mut thread = self.threads.remove(&id).ok_or(ExecError::ThreadNotFound)?;
        thread.set_state(ThreadState::Dead);
        Ok(thread)
    }

    /// Get a thread by ID
    pub fn get(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.get(&id)
    }

    /// Get a thread by ID (mutable)
    pub fn get_mut(&mut self, id: ThreadId) -> Option<&mut Thread> {
        self.threads.get_mut(&id)
    }

    /// Check if a thread is registered
    pub fn contains(&self, id: ThreadId) -> bool {
        self.threads.contains_key(&id)
    }

    /// Get all threads in a state
    pub fn ids_in_state(&self, state: ThreadState) -> Vec<ThreadId> {
        self.threads
            .values()
            .filter(|t| t.state() == state)
            .map(Thread::id)
            .collect()
    }

    /// Get thread count
    pub fn count(&self) -> usize {
        self.threads.len()
    }

    /// Iterate over all threads
    pub fn iter(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values()
    }
}

impl Default for ThreadTable {
    fn default() -> Self {
        Self::new()
    }
}
