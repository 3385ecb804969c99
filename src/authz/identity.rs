//! Authentication collaborator
//!
//! Identity is established outside the decision core. The core only asks an
//! [`Authenticator`] who the current actor is; this module provides the
//! token-backed implementation used by the HTTP surface. Issuing tokens is
//! left to the identity provider.

use super::types::Actor;
use crate::config::AuthConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of the current identity for one authenticated context
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// The authenticated actor, `None` when unauthenticated
    async fn current_actor(&self) -> Result<Option<Actor>>;

    /// Raw session token, if one is present
    fn current_session_token(&self) -> Option<String>;
}

/// In-memory actor records keyed by actor id
#[derive(Debug, Default)]
pub struct ActorDirectory {
    actors: DashMap<String, Actor>,
}

impl ActorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actors(actors: impl IntoIterator<Item = Actor>) -> Self {
        let directory = Self::new();
        for actor in actors {
            directory.insert(actor);
        }
        directory
    }

    pub fn insert(&self, actor: Actor) {
        self.actors.insert(actor.id.clone(), actor);
    }

    pub fn get(&self, actor_id: &str) -> Option<Actor> {
        self.actors.get(actor_id).map(|entry| entry.value().clone())
    }

    /// Replace an actor's role assignment, returning the updated record
    pub fn assign_roles(&self, actor_id: &str, roles: BTreeSet<String>) -> Option<Actor> {
        self.actors.get_mut(actor_id).map(|mut entry| {
            entry.roles = roles;
            entry.clone()
        })
    }

    pub fn set_active(&self, actor_id: &str, active: bool) -> Option<Actor> {
        self.actors.get_mut(actor_id).map(|mut entry| {
            entry.active = active;
            entry.clone()
        })
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// Claims carried by a console session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Actor id
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at timestamp
    pub iat: u64,
    /// Expiration timestamp
    pub exp: u64,
}

/// Verifies HS256 session tokens
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.issuer)
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: issuer.to_string(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, &config.jwt_issuer)
    }

    /// Verify and decode a token
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        debug!("Session token verified for actor: {}", data.claims.sub);
        Ok(data.claims)
    }
}

/// Authenticator bound to one session token
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    token: String,
    verifier: Arc<TokenVerifier>,
    directory: Arc<ActorDirectory>,
}

impl TokenAuthenticator {
    pub fn new(
        token: impl Into<String>,
        verifier: Arc<TokenVerifier>,
        directory: Arc<ActorDirectory>,
    ) -> Self {
        Self {
            token: token.into(),
            verifier,
            directory,
        }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn current_actor(&self) -> Result<Option<Actor>> {
        let claims = match self.verifier.verify(&self.token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Session token rejected: {}", e);
                return Ok(None);
            }
        };

        let actor = self.directory.get(&claims.sub);
        if actor.is_none() {
            warn!(actor = %claims.sub, "Session token names an unknown actor");
        }
        Ok(actor)
    }

    fn current_session_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}
