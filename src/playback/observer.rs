use crate::playback::Snapshot;
use std::fmt;

/// Handle returned by [`Observers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Snapshot) + Send>;

/// Registered snapshot observers, notified in subscription order
#[derive(Default)]
pub struct Observers {
    entries: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, snapshot: &Snapshot) {
        for (_, callback) in self.entries.iter_mut() {
            callback(snapshot);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use std::sync::{Arc, Mutex};

    fn snapshot(index: usize) -> Snapshot {
        Snapshot {
            current_index: index,
            progress: 0.0,
            paused: false,
            state: PlaybackState::Playing,
        }
    }

    #[test]
    fn test_notify_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::new();

        let first = log.clone();
        observers.subscribe(move |s| first.lock().unwrap().push(("first", s.current_index)));
        let second = log.clone();
        observers.subscribe(move |s| second.lock().unwrap().push(("second", s.current_index)));

        observers.notify(&snapshot(4));
        assert_eq!(*log.lock().unwrap(), vec![("first", 4), ("second", 4)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut observers = Observers::new();

        let counter = count.clone();
        let id = observers.subscribe(move |_| *counter.lock().unwrap() += 1);
        observers.notify(&snapshot(0));

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&snapshot(1));

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(observers.is_empty());
    }
}
