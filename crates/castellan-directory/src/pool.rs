//! Reusable directory session pool.
//!
//! Sessions are created lazily by a [`SessionFactory`] and probed on
//! release, not on acquisition: a freshly dialed session is trusted, and
//! an idle one already passed its probe when it was returned. A session
//! that fails its release probe is discarded, never re-pooled.
//!
//! The pool's mutex guards bookkeeping only; dialing, probing and
//! discarding all happen outside of it, so no lock is held across a
//! directory round-trip.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{DirectoryError, DirectoryResult};

/// Creates, probes and disposes of directory sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Send + 'static;

    /// Dial and administratively bind a fresh session.
    async fn dial(&self) -> DirectoryResult<Self::Session>;

    /// Cheap health probe, run when a session is released.
    async fn probe(&self, session: &mut Self::Session) -> bool;

    /// Close a session that is leaving the pool.
    async fn discard(&self, session: Self::Session);
}

struct IdleState<S> {
    sessions: Vec<S>,
    closed: bool,
}

/// Pool of reusable sessions.
///
/// Every caller must pair each [`get`](SessionPool::get) with exactly one
/// [`put`](SessionPool::put) per logical operation, on every exit path;
/// a session is owned by exactly one caller in between.
pub struct SessionPool<F: SessionFactory> {
    factory: F,
    idle: Mutex<IdleState<F::Session>>,
}

impl<F: SessionFactory> SessionPool<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            idle: Mutex::new(IdleState {
                sessions: Vec::new(),
                closed: false,
            }),
        }
    }

    /// Acquire a session: an idle one when available, freshly dialed
    /// otherwise. Fails with [`DirectoryError::PoolClosed`] after
    /// [`close`](SessionPool::close).
    pub async fn get(&self) -> DirectoryResult<F::Session> {
        {
            let mut idle = self.idle.lock().await;
            if idle.closed {
                return Err(DirectoryError::PoolClosed);
            }
            if let Some(session) = idle.sessions.pop() {
                return Ok(session);
            }
        }
        self.factory.dial().await
    }

    /// Release a session back to the pool.
    ///
    /// The session is probed first; on failure it is discarded so the
    /// next acquisition dials fresh.
    pub async fn put(&self, mut session: F::Session) {
        if !self.factory.probe(&mut session).await {
            debug!("discarding session that failed its release probe");
            self.factory.discard(session).await;
            return;
        }
        let rejected = {
            let mut idle = self.idle.lock().await;
            if idle.closed {
                Some(session)
            } else {
                idle.sessions.push(session);
                None
            }
        };
        if let Some(session) = rejected {
            self.factory.discard(session).await;
        }
    }

    /// Drain and close every idle session; subsequent `get` calls fail.
    pub async fn close(&self) {
        let drained = {
            let mut idle = self.idle.lock().await;
            idle.closed = true;
            std::mem::take(&mut idle.sessions)
        };
        for session in drained {
            self.factory.discard(session).await;
        }
    }

    /// Number of idle sessions currently pooled.
    pub async fn idle_count(&self) -> usize {
        self.idle.lock().await.sessions.len()
    }
}
