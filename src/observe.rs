//! Single-value publish/subscribe primitive.
//!
//! An [`ObservableProperty`] holds one current value and a set of
//! subscribers. Replacing the value synchronously notifies every subscriber
//! with the new value; intermediate values are never buffered, so a reader
//! that misses a `set` only ever sees the latest value.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// Process-unique identity for an [`Observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ObserverId(u64);

impl ObserverId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback<T> = Mutex<Box<dyn FnMut(&T) + Send>>;

/// Errors raised by the subscription API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ObserveError {
    /// The observer is already attached to another observable property.
    #[display("observer is already attached to an observable property")]
    AlreadyObserving,
}

impl std::error::Error for ObserveError {}

/// A callback handle that can watch one [`ObservableProperty`] at a time.
///
/// Identity is per-instance: subscribing the same observer twice to one
/// property is a no-op, while attaching it to a second property is a usage
/// error.
pub struct Observer<T> {
    id: ObserverId,
    callback: Arc<Callback<T>>,
    attached: Arc<AtomicBool>,
}

impl<T> Observer<T> {
    /// Wraps a callback to be invoked with each published value.
    pub fn new(callback: impl FnMut(&T) + Send + 'static) -> Self {
        Self {
            id: ObserverId::next(),
            callback: Arc::new(Mutex::new(Box::new(callback))),
            attached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether this observer is currently attached to a property.
    pub fn is_observing(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id)
            .field("attached", &self.is_observing())
            .finish_non_exhaustive()
    }
}

struct Entry<T> {
    id: ObserverId,
    callback: Arc<Callback<T>>,
}

struct Shared<T> {
    value: T,
    entries: Vec<Entry<T>>,
}

/// A single current value plus a dynamic set of subscribers.
///
/// Cloning the property yields another handle to the same underlying value
/// and subscriber set, which is how owners hand out read/subscribe access to
/// channels they keep behind their own locks.
pub struct ObservableProperty<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for ObservableProperty<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty").finish_non_exhaustive()
    }
}

impl<T: Clone + Send + 'static> ObservableProperty<T> {
    /// Creates a property holding `initial` with no subscribers.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                value: initial,
                entries: Vec::new(),
            })),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.shared.lock().unwrap().value.clone()
    }

    /// Replaces the current value and notifies every subscriber with it.
    pub fn set(&self, value: T) {
        let (value, snapshot) = {
            let mut shared = self.shared.lock().unwrap();
            shared.value = value;
            (shared.value.clone(), Self::snapshot(&shared))
        };
        Self::deliver(&value, &snapshot);
    }

    /// Replaces the current value without notifying subscribers.
    pub fn set_silent(&self, value: T) {
        self.shared.lock().unwrap().value = value;
    }

    /// Re-delivers the current value to every subscriber.
    pub fn notify(&self) {
        let (value, snapshot) = {
            let shared = self.shared.lock().unwrap();
            (shared.value.clone(), Self::snapshot(&shared))
        };
        Self::deliver(&value, &snapshot);
    }

    /// Registers `observer` and returns the handle that undoes it.
    ///
    /// Subscribing an observer already registered on this property is a
    /// no-op. When `notify_on_subscribe` is true the current value is
    /// delivered to the new subscriber immediately.
    ///
    /// # Errors
    ///
    /// [`ObserveError::AlreadyObserving`] if the observer is attached to a
    /// different property.
    pub fn subscribe(
        &self,
        observer: &Observer<T>,
        notify_on_subscribe: bool,
    ) -> Result<Subscription<T>, ObserveError> {
        let current = {
            let mut shared = self.shared.lock().unwrap();
            if shared.entries.iter().any(|entry| entry.id == observer.id) {
                None
            } else {
                if observer.attached.swap(true, Ordering::AcqRel) {
                    return Err(ObserveError::AlreadyObserving);
                }
                shared.entries.push(Entry {
                    id: observer.id,
                    callback: Arc::clone(&observer.callback),
                });
                notify_on_subscribe.then(|| shared.value.clone())
            }
        };
        if let Some(value) = current {
            (observer.callback.lock().unwrap())(&value);
        }
        Ok(Subscription {
            shared: Arc::downgrade(&self.shared),
            id: observer.id,
            attached: Arc::clone(&observer.attached),
        })
    }

    // Snapshot of the subscriber set: callbacks registered or removed during
    // a notification pass do not affect the pass already in flight.
    fn snapshot(shared: &Shared<T>) -> Vec<Arc<Callback<T>>> {
        shared
            .entries
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect()
    }

    fn deliver(value: &T, snapshot: &[Arc<Callback<T>>]) {
        for callback in snapshot {
            (callback.lock().unwrap())(value);
        }
    }
}

/// Undo handle for a subscription; dropping it removes the subscriber.
pub struct Subscription<T> {
    shared: Weak<Mutex<Shared<T>>>,
    id: ObserverId,
    attached: Arc<AtomicBool>,
}

impl<T> Subscription<T> {
    /// Removes the subscriber now rather than at drop time.
    pub fn unsubscribe(self) {}
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut shared = shared.lock().unwrap();
            shared.entries.retain(|entry| entry.id != self.id);
        }
        self.attached.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_observer(log: &Arc<Mutex<Vec<i32>>>) -> Observer<i32> {
        let log = Arc::clone(log);
        Observer::new(move |value: &i32| log.lock().unwrap().push(*value))
    }

    #[test]
    fn test_set_notifies_subscriber() {
        let property = ObservableProperty::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let observer = recording_observer(&log);
        let _sub = property.subscribe(&observer, false).unwrap();

        property.set(1);
        property.set(2);

        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
        assert_eq!(property.get(), 2);
    }

    #[test]
    fn test_notify_on_subscribe_delivers_current_value() {
        let property = ObservableProperty::new(7);
        let log = Arc::new(Mutex::new(Vec::new()));
        let observer = recording_observer(&log);
        let _sub = property.subscribe(&observer, true).unwrap();

        assert_eq!(*log.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_subscribe_without_notify_stays_silent() {
        let property = ObservableProperty::new(7);
        let log = Arc::new(Mutex::new(Vec::new()));
        let observer = recording_observer(&log);
        let _sub = property.subscribe(&observer, false).unwrap();

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_subscribe_is_noop() {
        let property = ObservableProperty::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let observer = recording_observer(&log);
        let _first = property.subscribe(&observer, false).unwrap();
        let _second = property.subscribe(&observer, false).unwrap();

        property.set(1);

        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_attaching_elsewhere_fails() {
        let first = ObservableProperty::new(0);
        let second = ObservableProperty::new(0);
        let observer = Observer::new(|_: &i32| {});
        let _sub = first.subscribe(&observer, false).unwrap();

        let result = second.subscribe(&observer, false);
        assert_eq!(result.err(), Some(ObserveError::AlreadyObserving));
        assert!(observer.is_observing());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let property = ObservableProperty::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let observer = recording_observer(&log);
        let sub = property.subscribe(&observer, false).unwrap();

        property.set(1);
        sub.unsubscribe();
        property.set(2);

        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert!(!observer.is_observing());
    }

    #[test]
    fn test_set_silent_skips_subscribers() {
        let property = ObservableProperty::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let observer = recording_observer(&log);
        let _sub = property.subscribe(&observer, false).unwrap();

        property.set_silent(5);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(property.get(), 5);

        property.notify();
        assert_eq!(*log.lock().unwrap(), vec![5]);
    }

    #[test]
    fn test_subscriber_added_mid_pass_misses_inflight_value() {
        let property = ObservableProperty::new(0);
        let late_log = Arc::new(Mutex::new(Vec::new()));

        // First subscriber registers a second one from inside its callback.
        let inner_property = property.clone();
        let inner_log = Arc::clone(&late_log);
        let holder: Arc<Mutex<Vec<Subscription<i32>>>> = Arc::new(Mutex::new(Vec::new()));
        let inner_holder = Arc::clone(&holder);
        let recruiter = Observer::new(move |_: &i32| {
            let late = recording_observer(&inner_log);
            let sub = inner_property.subscribe(&late, false).unwrap();
            inner_holder.lock().unwrap().push(sub);
        });
        let _sub = property.subscribe(&recruiter, false).unwrap();

        property.set(1);

        // The recruit was added during the pass for 1, so it sees nothing yet.
        assert!(late_log.lock().unwrap().is_empty());
    }
}
