//! Process-local session registry.
//!
//! Locking discipline: the map sits behind a `RwLock`, each context behind
//! its own `Mutex`. A session mutex is never acquired while the map lock is
//! held, so map and session locks cannot deadlock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use iv_contextpack::{ContextStats, SessionContext};
use iv_domain::config::ContextConfig;
use iv_domain::error::{Error, Result};
use iv_domain::trace::TraceEvent;

/// A session context shared between the registry and in-flight requests.
pub type SharedContext = Arc<Mutex<SessionContext>>;

/// Read-only snapshot of every live session.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub active_sessions: usize,
    pub sessions: BTreeMap<String, ContextStats>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionRegistry {
    limits: ContextConfig,
    sessions: RwLock<HashMap<String, SharedContext>>,
}

impl SessionRegistry {
    pub fn new(limits: ContextConfig) -> Self {
        Self {
            limits,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a session, creating it on first reference.
    ///
    /// Concurrent first calls for the same id create exactly one context;
    /// every caller gets the same `Arc`.
    pub fn get_or_create(&self, session_id: &str) -> Result<SharedContext> {
        if session_id.is_empty() {
            return Err(Error::InvalidInput("session id must not be empty".into()));
        }

        // Fast path: session already exists.
        if let Some(ctx) = self.sessions.read().get(session_id) {
            return Ok(ctx.clone());
        }

        // Slow path: re-check under the write lock so a racing creator wins
        // at most once.
        let mut created = false;
        let ctx = {
            let mut sessions = self.sessions.write();
            sessions
                .entry(session_id.to_owned())
                .or_insert_with(|| {
                    created = true;
                    Arc::new(Mutex::new(SessionContext::new(session_id, self.limits)))
                })
                .clone()
        };

        if created {
            TraceEvent::SessionCreated {
                session_id: session_id.to_owned(),
            }
            .emit();
        }
        Ok(ctx)
    }

    /// Look up a session without creating it.
    pub fn get(&self, session_id: &str) -> Option<SharedContext> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Drop a session. Removing an unknown id is a no-op; returns whether
    /// anything was removed.
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id);
        let Some(ctx) = removed else {
            return false;
        };

        let stats = ctx.lock().stats();
        TraceEvent::SessionRemoved {
            session_id: session_id.to_owned(),
            exchanges: stats.recent_exchanges,
            summaries: stats.compressed_summaries,
        }
        .emit();
        true
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let snapshot: Vec<(String, SharedContext)> = self
            .sessions
            .read()
            .iter()
            .map(|(id, ctx)| (id.clone(), ctx.clone()))
            .collect();

        let sessions: BTreeMap<String, ContextStats> = snapshot
            .into_iter()
            .map(|(id, ctx)| {
                let stats = ctx.lock().stats();
                (id, stats)
            })
            .collect();

        RegistryStats {
            active_sessions: sessions.len(),
            sessions,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
