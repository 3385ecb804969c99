//! Per-token session managers

use crate::authz::{
    ActorDirectory, DecisionEngine, InMemoryRoleStore, ResolutionOutcome, RoleChange,
    SessionManager, TokenAuthenticator, TokenVerifier,
};
use crate::utils::error::Result;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A resolved session and the `exp` of the token it was resolved from
#[derive(Debug, Clone)]
struct CachedSession {
    manager: Arc<SessionManager>,
    expires_at: u64,
}

impl CachedSession {
    fn is_expired(&self, now: u64) -> bool {
        self.expires_at <= now
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Maps session tokens to their resolved [`SessionManager`]
#[derive(Debug)]
pub struct SessionRegistry {
    engine: Arc<DecisionEngine>,
    verifier: Arc<TokenVerifier>,
    directory: Arc<ActorDirectory>,
    roles: Arc<InMemoryRoleStore>,
    sessions: DashMap<String, CachedSession>,
}

impl SessionRegistry {
    pub fn new(
        engine: Arc<DecisionEngine>,
        verifier: Arc<TokenVerifier>,
        directory: Arc<ActorDirectory>,
        roles: Arc<InMemoryRoleStore>,
    ) -> Self {
        Self {
            engine,
            verifier,
            directory,
            roles,
            sessions: DashMap::new(),
        }
    }

    pub fn directory(&self) -> &Arc<ActorDirectory> {
        &self.directory
    }

    pub fn roles(&self) -> &Arc<InMemoryRoleStore> {
        &self.roles
    }

    fn authenticator(&self, token: &str) -> TokenAuthenticator {
        TokenAuthenticator::new(token, Arc::clone(&self.verifier), Arc::clone(&self.directory))
    }

    /// Session for `token`, resolving it on first use.
    ///
    /// Returns `Ok(None)` when the token does not identify an actor or has
    /// expired. A cached session is dropped once its token's `exp` passes.
    pub async fn get_or_resolve(&self, token: &str) -> Result<Option<Arc<SessionManager>>> {
        let cached = self.sessions.get(token).map(|entry| entry.value().clone());
        if let Some(cached) = cached {
            if cached.is_expired(unix_now()) {
                debug!("Cached session token expired");
                self.end(token);
                return Ok(None);
            }
            if cached.manager.snapshot().is_some() {
                return Ok(Some(cached.manager));
            }
        }

        let expires_at = match self.verifier.verify(token) {
            Ok(claims) => claims.exp,
            Err(e) => {
                debug!("Session token rejected: {}", e);
                self.end(token);
                return Ok(None);
            }
        };
        if expires_at <= unix_now() {
            debug!("Session token expired");
            return Ok(None);
        }

        let manager = Arc::new(SessionManager::new(Arc::clone(&self.engine)));
        let outcome = manager
            .refresh(&self.authenticator(token), self.roles.as_ref())
            .await?;

        match outcome {
            ResolutionOutcome::Applied(_) | ResolutionOutcome::Superseded => {
                self.sessions.insert(
                    token.to_string(),
                    CachedSession {
                        manager: Arc::clone(&manager),
                        expires_at,
                    },
                );
                Ok(Some(manager))
            }
            ResolutionOutcome::Unauthenticated => {
                self.sessions.remove(token);
                Ok(None)
            }
        }
    }

    /// Drop the session for `token`; returns whether one existed
    pub fn end(&self, token: &str) -> bool {
        match self.sessions.remove(token) {
            Some((_, cached)) => {
                cached.manager.clear();
                debug!("Session ended");
                true
            }
            None => false,
        }
    }

    /// Re-resolve every session whose actor holds the changed role
    pub async fn on_role_change(&self, change: &RoleChange) -> usize {
        let affected: Vec<(String, Arc<SessionManager>)> = self
            .sessions
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .manager
                    .snapshot()
                    .is_some_and(|session| session.roles().contains(change.role_id()))
            })
            .map(|entry| (entry.key().clone(), Arc::clone(&entry.value().manager)))
            .collect();

        self.refresh_all(affected).await
    }

    /// Re-resolve every session of one actor, e.g. after a role reassignment
    pub async fn refresh_actor(&self, actor_id: &str) -> usize {
        let affected: Vec<(String, Arc<SessionManager>)> = self
            .sessions
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .manager
                    .snapshot()
                    .is_some_and(|session| session.actor_id() == Some(actor_id))
            })
            .map(|entry| (entry.key().clone(), Arc::clone(&entry.value().manager)))
            .collect();

        self.refresh_all(affected).await
    }

    async fn refresh_all(&self, affected: Vec<(String, Arc<SessionManager>)>) -> usize {
        let count = affected.len();
        for (token, manager) in affected {
            match manager
                .refresh(&self.authenticator(&token), self.roles.as_ref())
                .await
            {
                Ok(ResolutionOutcome::Unauthenticated) => {
                    self.sessions.remove(&token);
                }
                Ok(_) => {}
                Err(e) => warn!("Session refresh failed: {}", e),
            }
        }
        count
    }

    /// Follow role store changes until the store is dropped
    pub fn spawn_role_watcher(self: Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.roles.subscribe();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        let refreshed = self.on_role_change(&change).await;
                        info!(role = change.role_id(), refreshed, "Role changed");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Role change notifications lagged; refreshing all sessions");
                        let all: Vec<_> = self
                            .sessions
                            .iter()
                            .map(|entry| (entry.key().clone(), Arc::clone(&entry.value().manager)))
                            .collect();
                        self.refresh_all(all).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Drop every session whose token has expired; returns how many were dropped
    pub fn evict_expired(&self) -> usize {
        let now = unix_now();
        let mut evicted = Vec::new();
        self.sessions.retain(|_, cached| {
            if cached.is_expired(now) {
                evicted.push(Arc::clone(&cached.manager));
                false
            } else {
                true
            }
        });
        for manager in &evicted {
            manager.clear();
        }
        evicted.len()
    }

    /// Periodically evict expired sessions
    pub fn spawn_expiry_sweeper(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = self.evict_expired();
                if evicted > 0 {
                    debug!(evicted, remaining = self.len(), "Expired sessions evicted");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
