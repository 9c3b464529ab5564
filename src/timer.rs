//! A queue of one-shot timers ordered by fire time.
//!
//! Defines a `TimerQueue<T>` that stores actions of type `T`, each due at an `f64` wall-clock
//! time in seconds. The simulation keeps its deferred work here (the delayed index case and each
//! particle's recovery) and drains due timers from its own execution context, so no timer ever
//! runs concurrently with a frame. Scheduling and popping are *O*(log(*n*)).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::hashing::HashMap;

/// A priority queue of one-shot timers.
///
/// Timers are ordered by fire time. Timers due at the same time fire in the order they were
/// scheduled (lowest id first). The time and id live in a binary heap; the action lives in a
/// hash map keyed by id.
pub struct TimerQueue<T> {
    queue: BinaryHeap<Entry>,
    actions: HashMap<u64, T>,
    timer_counter: u64,
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> TimerQueue<T> {
        TimerQueue {
            queue: BinaryHeap::new(),
            actions: HashMap::default(),
            timer_counter: 0,
        }
    }

    /// Schedules `action` to fire at `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is NaN or infinite.
    pub fn schedule(&mut self, time: f64, action: T) {
        assert!(time.is_finite(), "Invalid time value");
        let id = self.timer_counter;
        trace!("scheduling timer {id} at {time}");
        self.queue.push(Entry { time, id });
        self.actions.insert(id, action);
        self.timer_counter += 1;
    }

    /// Drops every pending timer without firing it.
    pub fn clear(&mut self) {
        if !self.actions.is_empty() {
            trace!("cancelling {} pending timers", self.actions.len());
        }
        self.queue.clear();
        self.actions.clear();
    }

    /// Removes and returns the earliest timer due at or before `now`, or `None` if nothing is
    /// due yet.
    pub fn pop_due(&mut self, now: f64) -> Option<Timer<T>> {
        if self.queue.peek()?.time > now {
            return None;
        }
        let entry = self.queue.pop()?;
        let action = self.actions.remove(&entry.id)?;
        trace!("firing timer {} due at {}", entry.id, entry.time);
        Some(Timer {
            time: entry.time,
            action,
        })
    }

    /// Fire time of the earliest pending timer.
    #[must_use]
    pub fn next_fire_time(&self) -> Option<f64> {
        self.queue.peek().map(|entry| entry.time)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A time and id used to order timers in the `TimerQueue<T>`
///
/// `Entry` objects are sorted in increasing order of time and then timer id. `BinaryHeap` is a
/// max-heap, so the comparison is reversed.
#[derive(PartialEq, Debug)]
struct Entry {
    time: f64,
    id: u64,
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.total_cmp(&other.time).reverse() {
            Ordering::Equal => self.id.cmp(&other.id).reverse(),
            time_ordering => time_ordering,
        }
    }
}

/// A fired timer: the action and the time it was due.
pub struct Timer<T> {
    pub time: f64,
    pub action: T,
}
