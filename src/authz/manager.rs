//! Session manager
//!
//! Owns the current [`ActorSession`] of one authenticated context. The
//! snapshot is swapped atomically, so readers see either the old or the new
//! permission set and never a mix. Resolutions are numbered; a result is
//! applied only if no newer resolution has started since.

use super::decision::{Decision, DecisionEngine, Requirement};
use super::identity::Authenticator;
use super::session::ActorSession;
use super::store::RoleStore;
use super::types::Action;
use crate::utils::error::Result;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Change notification published to session subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A resolution started; checks now return `Pending`
    Pending { generation: u64 },
    /// A resolution completed and its session is current
    Resolved { generation: u64 },
    /// A resolution failed; the session grants nothing
    Failed { generation: u64, reason: String },
    /// The session ended
    Cleared,
}

/// Handle for one in-flight resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
}

impl ResolutionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed resolution
#[derive(Debug, Clone)]
pub enum ResolutionOutcome {
    /// The session was installed
    Applied(Arc<ActorSession>),
    /// A newer resolution started first; this result was discarded
    Superseded,
    /// No actor is authenticated; the session was cleared
    Unauthenticated,
}

/// Current session of one authenticated context
#[derive(Debug)]
pub struct SessionManager {
    engine: Arc<DecisionEngine>,
    current: ArcSwapOption<ActorSession>,
    /// Latest issued generation. Held while installing a snapshot so a stale
    /// result cannot interleave with a newer one.
    sequence: Mutex<u64>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(engine: Arc<DecisionEngine>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            engine,
            current: ArcSwapOption::empty(),
            sequence: Mutex::new(0),
            events,
        }
    }

    pub fn engine(&self) -> &Arc<DecisionEngine> {
        &self.engine
    }

    /// Subscribe to session changes; re-evaluate decisions on every event
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current snapshot, `None` before the first resolution or after `clear`
    pub fn snapshot(&self) -> Option<Arc<ActorSession>> {
        self.current.load_full()
    }

    /// Start a resolution and install a pending session for it
    pub fn begin_resolution(&self) -> ResolutionTicket {
        let mut sequence = self.sequence.lock();
        *sequence += 1;
        let generation = *sequence;

        self.current
            .store(Some(Arc::new(ActorSession::pending(generation))));
        self.publish(SessionEvent::Pending { generation });

        debug!(generation, "Session resolution started");
        ResolutionTicket { generation }
    }

    /// Apply the result of a resolution if it is still the latest one.
    ///
    /// A failed resolution installs a session that grants nothing, then
    /// returns the error so configuration problems reach the caller.
    pub fn complete_resolution(
        &self,
        ticket: ResolutionTicket,
        result: Result<ActorSession>,
    ) -> Result<ResolutionOutcome> {
        let sequence = self.sequence.lock();
        if *sequence != ticket.generation {
            warn!(
                generation = ticket.generation,
                latest = *sequence,
                "Discarding superseded session resolution"
            );
            return Ok(ResolutionOutcome::Superseded);
        }

        match result {
            Ok(session) => {
                let session = Arc::new(session.with_generation(ticket.generation));
                self.current.store(Some(Arc::clone(&session)));
                self.publish(SessionEvent::Resolved {
                    generation: ticket.generation,
                });
                info!(
                    actor = session.actor_id().unwrap_or("-"),
                    generation = ticket.generation,
                    permissions = session.permissions().len(),
                    "Session resolved"
                );
                Ok(ResolutionOutcome::Applied(session))
            }
            Err(e) => {
                let reason = e.to_string();
                self.current.store(Some(Arc::new(ActorSession::failed(
                    ticket.generation,
                    reason.clone(),
                ))));
                self.publish(SessionEvent::Failed {
                    generation: ticket.generation,
                    reason,
                });
                warn!(generation = ticket.generation, "Session resolution failed: {}", e);
                Err(e)
            }
        }
    }

    /// Close a resolution that found no authenticated actor
    pub fn complete_unauthenticated(&self, ticket: ResolutionTicket) -> ResolutionOutcome {
        let sequence = self.sequence.lock();
        if *sequence != ticket.generation {
            return ResolutionOutcome::Superseded;
        }

        self.current.store(None);
        self.publish(SessionEvent::Cleared);
        debug!(generation = ticket.generation, "No authenticated actor");
        ResolutionOutcome::Unauthenticated
    }

    /// Fetch identity and roles, then install the resolved session
    pub async fn refresh<A, R>(&self, authenticator: &A, roles: &R) -> Result<ResolutionOutcome>
    where
        A: Authenticator + ?Sized,
        R: RoleStore + ?Sized,
    {
        let ticket = self.begin_resolution();

        let actor = match authenticator.current_actor().await {
            Ok(Some(actor)) => actor,
            Ok(None) => return Ok(self.complete_unauthenticated(ticket)),
            Err(e) => return self.complete_resolution(ticket, Err(e)),
        };

        let result = match roles.get_roles(&actor.roles).await {
            Ok(role_map) => ActorSession::resolve(self.engine.registry(), &actor, &role_map),
            Err(e) => Err(e),
        };

        self.complete_resolution(ticket, result)
    }

    /// End the session (logout)
    pub fn clear(&self) {
        let mut sequence = self.sequence.lock();
        // Bump the sequence so in-flight resolutions cannot resurrect the session.
        *sequence += 1;
        self.current.store(None);
        self.publish(SessionEvent::Cleared);
        debug!("Session cleared");
    }

    /// Re-resolve whenever `changes` delivers a notification.
    ///
    /// The task ends when the channel closes.
    pub fn watch<A, R, T>(
        self: Arc<Self>,
        authenticator: Arc<A>,
        roles: Arc<R>,
        mut changes: broadcast::Receiver<T>,
    ) -> JoinHandle<()>
    where
        A: Authenticator + ?Sized + 'static,
        R: RoleStore + ?Sized + 'static,
        T: Clone + Send + 'static,
    {
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if let Err(e) = self.refresh(authenticator.as_ref(), roles.as_ref()).await {
                            warn!("Session refresh after change notification failed: {}", e);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_some_and(|session| session.is_loading())
    }

    pub fn has_permission(&self, code: &str, action: Action) -> Result<Decision> {
        self.engine.check_one(&self.session_or_anonymous(), code, action)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, codes: &[S], action: Action) -> Result<Decision> {
        self.engine
            .check_any(&self.session_or_anonymous(), codes, action)
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, codes: &[S], action: Action) -> Result<Decision> {
        self.engine
            .check_all(&self.session_or_anonymous(), codes, action)
    }

    /// Evaluate a [`Requirement`] against the current session
    pub fn evaluate(&self, requirement: &Requirement, action: Action) -> Result<Decision> {
        self.engine
            .evaluate(&self.session_or_anonymous(), requirement, action)
    }

    fn session_or_anonymous(&self) -> Arc<ActorSession> {
        self.current
            .load_full()
            .unwrap_or_else(|| Arc::new(ActorSession::anonymous()))
    }

    fn publish(&self, event: SessionEvent) {
        // Having no subscribers is normal.
        let _ = self.events.send(event);
    }
}
