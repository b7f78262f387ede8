//! Per-client session state.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Per-client state container.
///
/// Holds creation and last-activity times plus an open string-keyed value
/// bag (used, e.g., for the anti-forgery token). Shared between concurrent
/// requests from the same client via `Arc`; interior locks keep individual
/// reads and writes consistent, but concurrent requests racing on session
/// state is an accepted risk, not a serialized guarantee.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    client: IpAddr,
    created_at: Instant,
    last_activity: RwLock<Instant>,
    values: RwLock<HashMap<String, String>>,
}

impl Session {
    pub(crate) fn new(client: IpAddr) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            client,
            created_at: now,
            last_activity: RwLock::new(now),
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Stable identifier for logs; not the session key.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Client network identity this session is keyed by.
    pub fn client(&self) -> IpAddr {
        self.client
    }

    /// Time since the session was created.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Time since the last completed request.
    pub fn idle_for(&self) -> Duration {
        self.last_activity
            .read()
            .expect("session lock poisoned")
            .elapsed()
    }

    /// Refresh last-activity to now.
    pub fn touch(&self) {
        *self.last_activity.write().expect("session lock poisoned") = Instant::now();
    }

    /// Look up a named value, cloned out of the bag.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("session lock poisoned")
            .get(key)
            .cloned()
    }

    /// Store a named value, replacing any previous one.
    pub fn set_value(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .expect("session lock poisoned")
            .insert(key.into(), value.into());
    }

    /// Remove a named value, returning it when present.
    pub fn remove_value(&self, key: &str) -> Option<String> {
        self.values
            .write()
            .expect("session lock poisoned")
            .remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_bag_roundtrip() {
        let session = Session::new("127.0.0.1".parse().unwrap());
        assert_eq!(session.value("user"), None);

        session.set_value("user", "abc");
        assert_eq!(session.value("user").as_deref(), Some("abc"));

        session.set_value("user", "def");
        assert_eq!(session.value("user").as_deref(), Some("def"));

        assert_eq!(session.remove_value("user").as_deref(), Some("def"));
        assert_eq!(session.value("user"), None);
    }

    #[test]
    fn touch_resets_idle_time() {
        let session = Session::new("127.0.0.1".parse().unwrap());
        std::thread::sleep(Duration::from_millis(20));
        assert!(session.idle_for() >= Duration::from_millis(20));

        session.touch();
        assert!(session.idle_for() < Duration::from_millis(20));
    }
}
