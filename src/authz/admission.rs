//! Route admission
//!
//! The coarse check in front of every protected area. It looks only at
//! whether a session token is present and where the request is going; the
//! fine-grained permission checks still run once a request is admitted.

use crate::config::AuthConfig;
use serde::Serialize;

/// What route admission needs to know about a request
#[derive(Debug, Clone, Copy)]
pub struct AdmissionRequest<'a> {
    pub path: &'a str,
    pub token: Option<&'a str>,
}

impl<'a> AdmissionRequest<'a> {
    pub fn new(path: &'a str, token: Option<&'a str>) -> Self {
        Self { path, token }
    }

    /// A blank token counts as no token
    pub fn has_token(&self) -> bool {
        self.token.is_some_and(|token| !token.trim().is_empty())
    }
}

/// Admission decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "location", rename_all = "snake_case")]
pub enum Admission {
    Continue,
    RedirectTo(String),
}

/// Route admission policy
#[derive(Debug, Clone)]
pub struct RouteAdmission {
    login_path: String,
    landing_path: String,
    public_prefixes: Vec<String>,
}

impl RouteAdmission {
    pub fn new(login_path: impl Into<String>, landing_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            landing_path: landing_path.into(),
            public_prefixes: Vec::new(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.login_path, &config.landing_path)
            .with_public_prefixes(config.public_paths.iter().cloned())
    }

    /// Paths under these prefixes are admitted with or without a token
    pub fn with_public_prefixes(mut self, prefixes: impl IntoIterator<Item = String>) -> Self {
        self.public_prefixes.extend(prefixes);
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// Decide whether `request` may proceed
    pub fn admit(&self, request: &AdmissionRequest<'_>) -> Admission {
        let at_login = same_path(request.path, &self.login_path);

        if request.has_token() {
            if at_login {
                return Admission::RedirectTo(self.landing_path.clone());
            }
            return Admission::Continue;
        }

        if at_login || self.is_public(request.path) {
            Admission::Continue
        } else {
            Admission::RedirectTo(self.login_path.clone())
        }
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| prefix.ends_with('/') || rest.starts_with('/'))
        })
    }
}

impl Default for RouteAdmission {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

/// Compare paths ignoring a trailing slash
fn same_path(a: &str, b: &str) -> bool {
    let trim = |p: &str| {
        if p.len() > 1 {
            p.trim_end_matches('/').to_string()
        } else {
            p.to_string()
        }
    };
    trim(a) == trim(b)
}
