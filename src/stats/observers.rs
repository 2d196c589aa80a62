//! Stats change notification

use std::sync::{Arc, Mutex};

/// Token handed out by `subscribe`; passing it back unregisters the
/// observer. Tokens are never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Registry of stats observers.
///
/// Cloned handles share one observer list; the tracker keeps one clone and
/// its flush task keeps another so completed saves can notify subscribers.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    observers: Vec<(SubscriberId, Callback)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` to run on every stats change. Registration order
    /// is notification order.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> SubscriberId {
        let mut inner = self.inner.lock().unwrap();
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.observers.push((id, Arc::new(callback)));
        id
    }

    /// Unregister `id`. Unknown or already removed tokens are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner
            .lock()
            .unwrap()
            .observers
            .retain(|(sid, _)| *sid != id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every observer. The list is snapshotted before any callback
    /// runs, so callbacks may subscribe or unsubscribe freely.
    pub fn notify_all(&self) {
        let callbacks: Vec<Callback> = {
            let inner = self.inner.lock().unwrap();
            inner.observers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in callbacks {
            callback();
        }
    }
}
