use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

type Flight<T> = Shared<BoxFuture<'static, T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightRole {
    /// Started the work; responsible for acting on its outcome.
    Leader,
    /// Attached to work another caller started.
    Follower,
}

/// At most one in-progress future per key; late callers await the same outcome.
pub struct SingleFlight<T: Clone> {
    pending: Mutex<HashMap<String, Flight<T>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `start()` unless a flight for `key` is already pending, in which
    /// case the caller awaits that flight instead. `start` is only invoked by
    /// the leader.
    pub async fn run<F>(&self, key: &str, start: F) -> (T, FlightRole)
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let (flight, role) = {
            let mut pending = self.lock();
            match pending.get(key) {
                Some(existing) => (existing.clone(), FlightRole::Follower),
                None => {
                    let flight = start().shared();
                    pending.insert(key.to_string(), flight.clone());
                    (flight, FlightRole::Leader)
                }
            }
        };

        // Dropping the guard clears the entry even if the leader is cancelled.
        let _guard = (role == FlightRole::Leader).then(|| LeaderGuard {
            flights: self,
            key: key.to_string(),
        });

        (flight.await, role)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Flight<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

struct LeaderGuard<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    flights: &'a SingleFlight<T>,
    key: String,
}

impl<T> Drop for LeaderGuard<'_, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.flights.lock().remove(&self.key);
    }
}
