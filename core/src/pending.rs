//!
//! [`PendingRequests`] queues multiple async requests for the same key
//! into a group of receivers that all resolve once the first request
//! for that key completes.
//!
//! The first request for a key is reported as [`RequestType::New`] and
//! is expected to perform the actual work, then call
//! [`PendingRequests::complete()`]. Every other request issued before
//! completion is reported as [`RequestType::Pending`] and simply waits.
//!

use crate::channel::*;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::Mutex;

/// Result delivered to every request queued under the same key.
pub type PendingResult<V, E> = std::result::Result<V, E>;

/// List of channel senders awaiting the same key.
pub type SenderList<V, E> = Vec<Sender<PendingResult<V, E>>>;

pub enum RequestType<V, E> {
    /// No other request for the key is in flight; the caller owns the work.
    New(Receiver<PendingResult<V, E>>),
    /// The request joined an in-flight request for the same key.
    Pending(Receiver<PendingResult<V, E>>),
}

/// Table of in-flight requests keyed by `K`.
///
/// Example:
/// ```no_run
/// async fn fetch(&self, url: &String) -> Result<Value> {
///     match self.pending.queue(url) {
///         RequestType::New(receiver) => {
///             let response = self.fetch_impl(url).await;
///             self.pending.complete(url, response);
///             receiver.recv().await?
///         }
///         RequestType::Pending(receiver) => receiver.recv().await?,
///     }
/// }
/// ```
pub struct PendingRequests<K, V, E> {
    map: Arc<Mutex<HashMap<K, SenderList<V, E>>>>,
}

impl<K, V, E> Default for PendingRequests<K, V, E>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
    V: Clone,
    E: Clone,
{
    fn default() -> Self {
        PendingRequests::new()
    }
}

impl<K, V, E> PendingRequests<K, V, E>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
    V: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        PendingRequests {
            map: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys with requests in flight
    pub fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.lock().unwrap().is_empty()
    }

    /// Returns `true` if requests are queued for `key`
    pub fn contains(&self, key: &K) -> bool {
        self.map.lock().unwrap().contains_key(key)
    }

    /// Number of requests queued for `key`
    pub fn waiters(&self, key: &K) -> usize {
        self.map
            .lock()
            .unwrap()
            .get(key)
            .map(|list| list.len())
            .unwrap_or_default()
    }

    /// Queue a request for `key`. Returns [`RequestType::New`] if no other
    /// requests for the same key are queued and [`RequestType::Pending`]
    /// otherwise. Both carry a receiver that yields the result passed
    /// to [`PendingRequests::complete()`].
    pub fn queue(&self, key: &K) -> RequestType<V, E> {
        let mut map = self.map.lock().unwrap();
        let (sender, receiver) = oneshot::<PendingResult<V, E>>();

        if let Some(list) = map.get_mut(key) {
            list.push(sender);
            RequestType::Pending(receiver)
        } else {
            map.insert(key.clone(), vec![sender]);
            RequestType::New(receiver)
        }
    }

    /// Remove the entry for `key` and deliver `result` to every request
    /// queued under it. Returns the number of requests notified; `0` if
    /// nothing was queued for `key` (the key was already completed).
    pub fn complete(&self, key: &K, result: PendingResult<V, E>) -> usize {
        let list = { self.map.lock().unwrap().remove(key) };

        match list {
            Some(list) => {
                let count = list.len();
                for sender in list {
                    // oneshot senders are used exactly once, the only
                    // failure is a receiver that has been dropped
                    sender.try_send(result.clone()).ok();
                }
                count
            }
            None => 0,
        }
    }
}
