//! # Change Notification
//!
//! Observers register interest in a target and are told when it changes.
//! A notification carries nothing but the changed target; observers re-query.
//!
//! ## Delivery
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     notify(Target::Item(7))                             │
//! │                                                                         │
//! │  1. Snapshot matching observers under the read lock                    │
//! │       observer(Collection) ✓   observer(Item 7) ✓   observer(Item 8) ✗ │
//! │  2. Release the lock                                                   │
//! │  3. Call each callback in registration order, on the writing task      │
//! │  4. Publish on the broadcast channel (dropped if nobody listens)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callbacks run outside the lock, so a callback may subscribe or
//! unsubscribe without deadlocking.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use inventory_core::Target;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Signal that the data behind `target` changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub target: Target,
}

/// Callback invoked for each relevant notification.
pub type Observer = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct Subscription {
    id: SubscriptionId,
    target: Target,
    observer: Observer,
}

struct Registry {
    subscriptions: RwLock<Vec<Subscription>>,
    broadcast_tx: broadcast::Sender<Notification>,
}

/// Observer registry shared by all clones of a store.
#[derive(Clone)]
pub struct ChangeNotifier {
    inner: Arc<Registry>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl ChangeNotifier {
    /// Creates a registry whose broadcast channel holds `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(capacity.max(1));
        ChangeNotifier {
            inner: Arc::new(Registry {
                subscriptions: RwLock::new(Vec::new()),
                broadcast_tx,
            }),
        }
    }

    /// Registers `observer` for changes relevant to `target`.
    pub fn subscribe<F>(&self, target: Target, observer: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                id,
                target,
                observer: Arc::new(observer),
            });
        debug!(%id, %target, "Observer subscribed");
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self
            .inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|s| s.id != id);
        let removed = subs.len() != before;
        if removed {
            debug!(%id, "Observer unsubscribed");
        }
        removed
    }

    /// Receiver for every notification, for async consumers.
    ///
    /// A receiver that falls more than the channel capacity behind gets
    /// `RecvError::Lagged` and should re-query everything it shows.
    pub fn changes(&self) -> broadcast::Receiver<Notification> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Number of registered callbacks.
    pub fn observer_count(&self) -> usize {
        self.inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Tells observers of `target` that it changed.
    pub fn notify(&self, target: Target) {
        let notification = Notification { target };

        let observers: Vec<Observer> = self
            .inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.target.observes(&target))
            .map(|s| Arc::clone(&s.observer))
            .collect();

        debug!(%target, observers = observers.len(), "Notifying change");

        for observer in observers {
            observer(&notification);
        }

        // No receivers is fine
        let _ = self.inner.broadcast_tx.send(notification);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
