//! In-memory timer queue.

use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};

/// Handle for a scheduled timer. Used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Heap entry.
///
/// We use Reverse ordering so BinaryHeap acts as a min-heap (earliest first).
/// Timers with the same deadline fire in scheduling order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledTimer {
    due_at: DateTime<Utc>,
    timer_id: TimerId,
}

impl PartialOrd for ScheduledTimer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTimer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .due_at
            .cmp(&self.due_at)
            .then_with(|| other.timer_id.cmp(&self.timer_id))
    }
}

/// Pending timers.
///
/// Design:
/// - `pending` is the single source of truth for which timers are live.
/// - The heap holds ids only; cancelled entries are dropped lazily when they
///   reach the top.
pub struct TimerQueue<A> {
    heap: BinaryHeap<ScheduledTimer>,
    pending: HashMap<TimerId, A>,
    next_id: u64,
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pending: HashMap::new(),
            next_id: 1,
        }
    }

    /// Schedule `action` to fire once `due_at` is reached.
    pub fn schedule(&mut self, due_at: DateTime<Utc>, action: A) -> TimerId {
        let timer_id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert(timer_id, action);
        self.heap.push(ScheduledTimer { due_at, timer_id });
        timer_id
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// already cancelled; calling it twice is harmless.
    pub fn cancel(&mut self, timer_id: TimerId) -> bool {
        self.pending.remove(&timer_id).is_some()
    }

    pub fn is_pending(&self, timer_id: TimerId) -> bool {
        self.pending.contains_key(&timer_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among live timers.
    pub fn next_deadline(&mut self) -> Option<DateTime<Utc>> {
        self.discard_cancelled();
        self.heap.peek().map(|entry| entry.due_at)
    }

    /// Remove and return every live timer with `due_at <= now`, earliest
    /// first.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<(TimerId, A)> {
        let mut fired = Vec::new();
        while let Some(entry) = self.heap.peek() {
            if entry.due_at > now {
                break; // Heap is sorted, so we can stop
            }
            let timer_id = entry.timer_id;
            self.heap.pop();
            if let Some(action) = self.pending.remove(&timer_id) {
                fired.push((timer_id, action));
            }
        }
        fired
    }

    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.heap.peek() {
            if self.pending.contains_key(&entry.timer_id) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}
