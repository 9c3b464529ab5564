//! Push notifications of the particle roster.
//!
//! Observers register a callback and get back a [`SubscriptionId`]. After every simulated frame
//! the simulation calls each callback, in subscription order, with the full roster. Callbacks
//! derive whatever they need (counts, chart data) from that snapshot themselves.
use indexmap::IndexMap;
use log::trace;

use crate::particle::Particle;

type Observer = dyn FnMut(&[Particle]);

/// Handle returned by [`ObserverRegistry::subscribe`]; pass it back to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct ObserverRegistry {
    observers: IndexMap<SubscriptionId, Box<Observer>>,
    next_id: u64,
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&[Particle]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        trace!("adding observer {id:?}");
        self.observers.insert(id, Box::new(observer));
        id
    }

    /// Removes an observer. Returns `false` if the handle was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        trace!("removing observer {id:?}");
        self.observers.shift_remove(&id).is_some()
    }

    pub fn notify(&mut self, particles: &[Particle]) {
        for observer in self.observers.values_mut() {
            observer(particles);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
