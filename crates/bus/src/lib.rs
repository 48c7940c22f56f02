// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! A typed, fan-out publish/subscribe bus.
//!
//! Each subscriber gets its own bounded channel. A slow or wedged
//! subscriber cannot block publication to the others: `publish` gives
//! each subscriber up to `publish_timeout` to accept a clone of the
//! message, and silently drops the message for any subscriber that
//! doesn't drain in time. The subscriber itself is not removed — it
//! simply misses that one message and keeps receiving subsequent ones.
//!
//! This is infrastructure, not a GUI-facing channel: a frontend-visible
//! signal (progress, detour, completion, fuel warning) is one [`Bus<T>`]
//! instantiated at a concrete `T`, owned and named by the daemon that
//! wires it up.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Per-subscriber channel capacity and the cross-subscriber fairness
/// timeout, bundled since both are tuned together.
#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    pub subscriber_capacity: usize,
    pub publish_timeout: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: 32,
            publish_timeout: Duration::from_millis(250),
        }
    }
}

struct Inner<T> {
    subscribers: HashMap<u64, mpsc::Sender<T>>,
    next_id: u64,
    closed: bool,
}

/// A fan-out bus for messages of type `T`.
///
/// Cheap to clone; clones share the same subscriber set.
pub struct Bus<T> {
    inner: Arc<Mutex<Inner<T>>>,
    config: BusConfig,
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config,
        }
    }
}

/// A live subscription. Dropping it unsubscribes automatically.
pub struct Subscription<T> {
    id: u64,
    rx: mpsc::Receiver<T>,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Subscription<T> {
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.inner.lock().subscribers.remove(&self.id);
    }
}

impl<T> Bus<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                subscribers: HashMap::new(),
                next_id: 0,
                closed: false,
            })),
            config,
        }
    }

    /// Register a new subscriber and return its receive handle.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(self.config.subscriber_capacity);
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        if !inner.closed {
            inner.subscribers.insert(id, tx);
        }
        Subscription {
            id,
            rx,
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Deliver `value` to every current subscriber.
    ///
    /// Subscribers are snapshotted under the lock and sent to
    /// concurrently outside it, so one subscriber's backpressure cannot
    /// delay delivery to the others beyond `publish_timeout`.
    pub async fn publish(&self, value: T) {
        let senders: Vec<(u64, mpsc::Sender<T>)> = {
            let inner = self.inner.lock();
            if inner.closed {
                return;
            }
            inner
                .subscribers
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let deadline = self.config.publish_timeout;
        let mut sends = tokio::task::JoinSet::new();
        for (id, tx) in senders {
            let value = value.clone();
            sends.spawn(async move {
                if timeout(deadline, tx.send(value)).await.is_err() {
                    tracing::warn!(subscriber = id, "publish timed out, dropping for this subscriber");
                }
            });
        }
        while sends.join_next().await.is_some() {}
    }

    /// Close the bus: new subscribers are rejected and existing ones see
    /// their channel end after draining what's already queued.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.subscribers.clear();
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
