//! # Scheduler Run Queues
//!
//! Run queue disciplines used by the ready-queue bands. Sort keys are
//! captured when a thread is enqueued; later changes to the thread record
//! do not reorder a queue until the thread is re-enqueued.

use crate::ThreadId;
use crate::thread::Thread;
use super::Priority;
use super::traits::RunQueue;
use alloc::collections::{BinaryHeap, VecDeque};
use alloc::vec::Vec;
use core::cmp::{Ordering, Reverse};

/// Thread entry in an ordered queue
#[derive(Debug, Clone)]
pub struct QueueEntry<K> {
    /// Thread ID
    pub id: ThreadId,
    /// Sort key captured at enqueue time
    pub key: K,
    /// Enqueue sequence number
    pub seq: u64,
}

impl<K: Ord> PartialEq for QueueEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord> Eq for QueueEntry<K> {}

impl<K: Ord> PartialOrd for QueueEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for QueueEntry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Greater key first, then earlier enqueue
        match self.key.cmp(&other.key) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// Heap ordered by key, greatest first, FIFO among equal keys
#[derive(Debug)]
pub struct OrderedQueue<K> {
    heap: BinaryHeap<QueueEntry<K>>,
    seq: u64,
}

impl<K: Ord> OrderedQueue<K> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Insert `id` under `key`
    pub fn push(&mut self, id: ThreadId, key: K) {
        self.seq += 1;
        self.heap.push(QueueEntry { id, key, seq: self.seq });
    }

    fn pop(&mut self) -> Option<ThreadId> {
        self.heap.pop().map(|e| e.id)
    }

    fn peek(&self) -> Option<ThreadId> {
        self.heap.peek().map(|e| e.id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn drain(&mut self) -> Vec<ThreadId> {
        let mut entries = core::mem::take(&mut self.heap).into_sorted_vec();
        entries.reverse();
        entries.into_iter().map(|e| e.id).collect()
    }

    fn ids(&self) -> Vec<ThreadId> {
        let mut entries: Vec<&QueueEntry<K>> = self.heap.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|e| e.id).collect()
    }
}

impl<K: Ord> Default for OrderedQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple FIFO run queue
#[derive(Debug, Default)]
pub struct FifoQueue {
    queue: VecDeque<ThreadId>,
}

impl FifoQueue {
    /// Create a new FIFO queue
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl RunQueue for FifoQueue {
    fn enqueue(&mut self, thread: &Thread) {
        self.queue.push_back(thread.id());
    }

    fn dequeue(&mut self) -> Option<ThreadId> {
        self.queue.pop_front()
    }

    fn peek(&self) -> Option<ThreadId> {
        self.queue.front().copied()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn drain(&mut self) -> Vec<ThreadId> {
        self.queue.drain(..).collect()
    }

    fn ids(&self) -> Vec<ThreadId> {
        self.queue.iter().copied().collect()
    }
}

/// Priority run queue: highest priority first
#[derive(Debug, Default)]
pub struct PriorityQueue {
    inner: OrderedQueue<Priority>,
}

impl PriorityQueue {
    /// Create a new priority queue
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunQueue for PriorityQueue {
    fn enqueue(&mut self, thread: &Thread) {
        self.inner.push(thread.id(), thread.priority());
    }

    fn dequeue(&mut self) -> Option<ThreadId> {
        self.inner.pop()
    }

    fn peek(&self) -> Option<ThreadId> {
        self.inner.peek()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn drain(&mut self) -> Vec<ThreadId> {
        self.inner.drain()
    }

    fn ids(&self) -> Vec<ThreadId> {
        self.inner.ids()
    }
}

/// Burst run queue: shortest remaining estimated burst first
///
/// Approximates shortest-remaining-time-first using the thread's predicted
/// burst minus the ticks it already consumed.
#[derive(Debug, Default)]
pub struct BurstQueue {
    inner: OrderedQueue<Reverse<i64>>,
}

impl BurstQueue {
    /// Create a new burst queue
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunQueue for BurstQueue {
    fn enqueue(&mut self, thread: &Thread) {
        self.inner.push(thread.id(), Reverse(thread.remaining_burst()));
    }

    fn dequeue(&mut self) -> Option<ThreadId> {
        self.inner.pop()
    }

    fn peek(&self) -> Option<ThreadId> {
        self.inner.peek()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn drain(&mut self) -> Vec<ThreadId> {
        self.inner.drain()
    }

    fn ids(&self) -> Vec<ThreadId> {
        self.inner.ids()
    }
}
