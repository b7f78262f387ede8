//! Session store: lookup-or-create with expiration tracking.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::session::Session;

/// Owns the set of live sessions keyed by client network identity.
///
/// The backing map is shared by every concurrent request handler; `resolve`
/// is atomic per key, so racing requests from the same client still see a
/// single live session.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<IpAddr, Arc<Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store with the given idle TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Return the existing session for this client, or create one.
    ///
    /// An expired session is returned as-is so the dispatcher can observe
    /// its pre-request state; removal is the sweeper's job.
    pub fn resolve(&self, client: IpAddr) -> Arc<Session> {
        self.sessions
            .entry(client)
            .or_insert_with(|| {
                let session = Arc::new(Session::new(client));
                tracing::debug!(
                    session_id = %session.id(),
                    client = %client,
                    "Session created"
                );
                session
            })
            .value()
            .clone()
    }

    /// Refresh the session's last-activity timestamp.
    pub fn touch(&self, session: &Session) {
        session.touch();
    }

    /// True when the session has been idle longer than the configured TTL.
    pub fn is_expired(&self, session: &Session) -> bool {
        session.idle_for() > self.ttl
    }

    /// Configured idle TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove every session idle beyond the TTL; returns how many.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.idle_for() <= self.ttl);
        // Concurrent resolves may add entries mid-sweep; clamp instead of
        // underflowing.
        let removed = before.saturating_sub(self.sessions.len());
        crate::observability::metrics::record_live_sessions(self.sessions.len());
        removed
    }

    /// Spawn the periodic expiration sweep.
    ///
    /// Runs until the shutdown signal fires. Sweep interval is half the TTL,
    /// floored at one second.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let period = std::cmp::max(self.ttl / 2, Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // first tick is immediate
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = self.sweep();
                        if removed > 0 {
                            tracing::debug!(removed, live = self.len(), "Expired sessions swept");
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(last_octet: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last_octet])
    }

    #[test]
    fn resolve_creates_once_per_client() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.resolve(client(1));
        let b = store.resolve(client(1));
        let c = store.resolve(client(2));

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn concurrent_resolve_same_key_yields_one_session() {
        let store = Arc::new(SessionStore::new(Duration::from_secs(60)));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || store.resolve(client(7)).id()));
        }
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(store.len(), 1);
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn expiry_follows_touch() {
        let store = SessionStore::new(Duration::from_millis(30));
        let session = store.resolve(client(1));

        store.touch(&session);
        assert!(!store.is_expired(&session));

        std::thread::sleep(Duration::from_millis(40));
        assert!(store.is_expired(&session));

        store.touch(&session);
        assert!(!store.is_expired(&session));
    }

    #[test]
    fn sweep_removes_only_stale_sessions() {
        let store = SessionStore::new(Duration::from_millis(30));
        let stale = store.resolve(client(1));
        std::thread::sleep(Duration::from_millis(40));
        let fresh = store.resolve(client(2));

        assert_eq!(store.sweep(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.is_expired(&stale));
        assert!(!store.is_expired(&fresh));

        // The stale identity gets a brand-new session on next contact.
        let replacement = store.resolve(client(1));
        assert_ne!(replacement.id(), stale.id());
    }
}
