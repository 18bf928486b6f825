//! Server-side sessions keyed by an opaque cookie value.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use rand::RngCore;
use secrecy::SecretString;
use time::OffsetDateTime;
use uuid::Uuid;

/// How long an authorization request may stay pending at the identity provider.
const PENDING_AUTH_TTL: Duration = Duration::from_secs(10 * 60);

/// Signed-in user.
#[derive(Debug)]
pub struct Session {
    pub access_token: SecretString,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub expires_at: OffsetDateTime,
}

impl Session {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == survey_auth::SURVEY_ADMIN)
    }

    #[must_use]
    pub fn is_creator(&self) -> bool {
        self.is_admin() || self.roles.iter().any(|r| r == survey_auth::SURVEY_CREATOR)
    }
}

/// Authorization request awaiting the identity provider's callback.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub signup: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<Session>>,
    pending: DashMap<String, PendingAuth>,
}

/// Random URL-safe identifier with 256 bits of entropy.
#[must_use]
pub fn random_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session and return its id.
    pub fn insert(&self, session: Session) -> String {
        let id = random_id();
        self.sessions.insert(id.clone(), Arc::new(session));
        id
    }

    /// Live session for `id`; expired sessions are evicted.
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        let session = self.sessions.get(id).map(|s| Arc::clone(s.value()))?;
        if session.expires_at <= OffsetDateTime::now_utc() {
            self.sessions.remove(id);
            return None;
        }
        Some(session)
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.remove(id).map(|(_, s)| s)
    }

    /// Remember an outgoing authorization request; returns its `state` value.
    pub fn begin_auth(&self, signup: bool) -> String {
        let state = random_id();
        self.pending.insert(
            state.clone(),
            PendingAuth {
                signup,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        state
    }

    /// Consume the pending request for `state`. Each state is usable once.
    pub fn complete_auth(&self, state: &str) -> Option<PendingAuth> {
        let (_, pending) = self.pending.remove(state)?;
        let age = OffsetDateTime::now_utc() - pending.created_at;
        if age > PENDING_AUTH_TTL {
            return None;
        }
        Some(pending)
    }

    /// Drop expired sessions and stale authorization requests.
    pub fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.sessions.len() + self.pending.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        self.pending
            .retain(|_, p| now - p.created_at <= PENDING_AUTH_TTL);
        before - (self.sessions.len() + self.pending.len())
    }
}

/// Value of the cookie `name` from the request headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a session id.
pub fn session_cookie(
    name: &str,
    id: &str,
    max_age: Duration,
    secure: bool,
) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{name}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// `Set-Cookie` value removing the session cookie.
pub fn clear_cookie(name: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
    .ok()
}
