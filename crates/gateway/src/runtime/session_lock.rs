//! Per-session turn serialization.
//!
//! The session context mutex in `iv-sessions` is synchronous and never held
//! across an await. A full evaluate turn (render digest, await the model,
//! record both exchanges) spans an await, so turns on the same session are
//! queued here instead. Different sessions never contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use iv_domain::error::{Error, Result};

/// Maps each session id to a `Semaphore(1)`.
///
/// Holding the permit grants exclusive use of the session for one turn; it
/// releases on drop.
pub struct SessionLockMap {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionLockMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until no other turn is running on `session_id`.
    pub async fn acquire(&self, session_id: &str) -> Result<OwnedSemaphorePermit> {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        sem.acquire_owned()
            .await
            .map_err(|_| Error::Other(format!("turn lock for session {session_id} was closed")))
    }

    /// Drop the lock entry for a deleted session.
    ///
    /// An entry whose permit is still held stays in place, so a turn on a
    /// re-created session with the same id queues behind the running one.
    pub fn forget(&self, session_id: &str) {
        let mut locks = self.locks.lock();
        if locks
            .get(session_id)
            .is_some_and(|sem| sem.available_permits() == 1)
        {
            locks.remove(session_id);
        }
    }

    /// Number of tracked sessions.
    pub fn session_count(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn sequential_access() {
        let map = SessionLockMap::new();
        drop(map.acquire("s1").await.unwrap());
        drop(map.acquire("s1").await.unwrap());
        assert_eq!(map.session_count(), 1);
    }

    #[tokio::test]
    async fn different_sessions_do_not_contend() {
        let map = SessionLockMap::new();
        let p1 = map.acquire("s1").await.unwrap();
        let p2 = map.acquire("s2").await.unwrap();
        assert_eq!(map.session_count(), 2);
        drop((p1, p2));
    }

    #[tokio::test]
    async fn same_session_waits_for_release() {
        let map = Arc::new(SessionLockMap::new());
        let p1 = map.acquire("s1").await.unwrap();

        let map2 = map.clone();
        let waiter = tokio::spawn(async move {
            let _p2 = map2.acquire("s1").await.unwrap();
            42
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(p1);
        assert_eq!(waiter.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn forget_removes_entry() {
        let map = SessionLockMap::new();
        drop(map.acquire("s1").await.unwrap());
        map.forget("s1");
        map.forget("never-seen");
        assert_eq!(map.session_count(), 0);
    }

    #[tokio::test]
    async fn forget_keeps_entry_while_turn_is_running() {
        let map = Arc::new(SessionLockMap::new());
        let running = map.acquire("s1").await.unwrap();
        map.forget("s1");
        assert_eq!(map.session_count(), 1);

        let map2 = map.clone();
        let next_turn = tokio::spawn(async move {
            let _p = map2.acquire("s1").await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!next_turn.is_finished());

        drop(running);
        next_turn.await.unwrap();
        map.forget("s1");
        assert_eq!(map.session_count(), 0);
    }
}
