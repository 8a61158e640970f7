use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use hla_shared::{Callback, LogicalTime, MessageRetractionHandle};

// ScheduledCallback
/// A timestamp-order callback waiting for its release time to be granted
pub struct ScheduledCallback {
    pub release_time: LogicalTime,
    sequence: u64,
    pub payload: Callback,
}

impl PartialEq for ScheduledCallback {
    fn eq(&self, other: &Self) -> bool {
        self.release_time == other.release_time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledCallback {}

impl PartialOrd for ScheduledCallback {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equal release times keep arrival order
impl Ord for ScheduledCallback {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release_time
            .cmp(&other.release_time)
            .then(self.sequence.cmp(&other.sequence))
    }
}

// ScheduledCallbacks
/// Min-priority structure of timestamp-order callbacks
pub struct ScheduledCallbacks {
    heap: BinaryHeap<Reverse<ScheduledCallback>>,
    next_sequence: u64,
}

impl ScheduledCallbacks {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn push(&mut self, release_time: LogicalTime, payload: Callback) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap.push(Reverse(ScheduledCallback {
            release_time,
            sequence,
            payload,
        }));
    }

    /// Pops every entry with release time ≤ `time`, earliest first
    pub fn pop_up_to(&mut self, time: LogicalTime) -> Vec<ScheduledCallback> {
        let mut released = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.release_time > time {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                released.push(entry);
            }
        }
        released
    }

    pub fn pop_all(&mut self) -> Vec<ScheduledCallback> {
        self.pop_up_to(LogicalTime::FINAL)
    }

    /// Withdraws the entry carrying `retraction`. Returns whether one was found.
    pub fn remove(&mut self, retraction: MessageRetractionHandle) -> bool {
        let before = self.heap.len();
        self.heap
            .retain(|Reverse(entry)| entry.payload.retraction() != Some(retraction));
        self.heap.len() != before
    }

    pub fn earliest(&self) -> Option<LogicalTime> {
        self.heap.peek().map(|Reverse(entry)| entry.release_time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl Default for ScheduledCallbacks {
    fn default() -> Self {
        Self::new()
    }
}
