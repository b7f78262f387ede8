//! Connection admission control.
//!
//! # Responsibilities
//! - Bound how many tasks may concurrently wait to accept a connection
//! - Hand out RAII permits backed by a counting semaphore
//! - Expose capacity/availability for logs and tests

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting-permit pool gating the accept cycle.
///
/// Capacity is fixed at construction and never resized. `acquire` waits
/// until a permit is free; the returned guard releases its permit on drop,
/// so acquire/release pair 1:1 by construction.
#[derive(Debug, Clone)]
pub struct ConnectionAdmission {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ConnectionAdmission {
    /// Create a pool with the given capacity.
    ///
    /// # Panics
    /// Panics when `capacity` is zero; config validation rejects that before
    /// the listener starts.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "admission capacity must be positive");
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait until a permit is available.
    pub async fn acquire(&self) -> AdmissionPermit {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .expect("admission semaphore closed unexpectedly");
        AdmissionPermit { _permit: permit }
    }

    /// Configured maximum number of simultaneous permit holders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Currently available permits.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// A held admission slot.
///
/// Dropping the permit returns the slot to the pool. This keeps the
/// admission ceiling intact even if the holding task panics.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn capacity_and_availability_track_permits() {
        let admission = ConnectionAdmission::new(2);
        assert_eq!(admission.capacity(), 2);
        assert_eq!(admission.available(), 2);

        let p1 = admission.acquire().await;
        assert_eq!(admission.available(), 1);
        let p2 = admission.acquire().await;
        assert_eq!(admission.available(), 0);

        drop(p1);
        assert_eq!(admission.available(), 1);
        drop(p2);
        assert_eq!(admission.available(), 2);
    }

    /// Under load of many more waiters than permits, the number of tasks
    /// simultaneously between acquire and release never exceeds capacity,
    /// and every waiter is eventually served.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn peak_concurrency_never_exceeds_capacity() {
        const CAPACITY: usize = 4;
        const WAITERS: usize = 64;

        let admission = ConnectionAdmission::new(CAPACITY);
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::with_capacity(WAITERS);
        for _ in 0..WAITERS {
            let admission = admission.clone();
            let current = current.clone();
            let peak = peak.clone();
            tasks.push(tokio::spawn(async move {
                let permit = admission.acquire().await;
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                drop(permit);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= CAPACITY);
        assert_eq!(current.load(Ordering::SeqCst), 0);
        assert_eq!(admission.available(), CAPACITY);
    }

    #[test]
    #[should_panic(expected = "admission capacity must be positive")]
    fn zero_capacity_is_rejected() {
        let _ = ConnectionAdmission::new(0);
    }
}
