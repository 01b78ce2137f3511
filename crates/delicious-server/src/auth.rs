//! Bearer-token sessions.
//!
//! Logging in opens a session and hands back an opaque token. Requests that
//! need a user carry it as `Authorization: Bearer <token>` and extract a
//! [`CurrentUser`].

use std::collections::HashMap;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Session {
    user: Uuid,
    expires: DateTime<Utc>,
}

/// Open sessions, keyed by token.
///
/// A session lives for `ttl` after its last use. Expired entries are dropped
/// when looked up and swept whenever a new session opens.
#[derive(Debug)]
pub struct Sessions {
    ttl: Duration,
    tokens: RwLock<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session for `user` and return its token.
    pub async fn open(&self, user: Uuid) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, s| s.expires > now);
        if tokens.len() < before {
            tracing::debug!(swept = before - tokens.len(), "auth: expired sessions swept");
        }
        tokens.insert(
            token.clone(),
            Session {
                user,
                expires: now + self.ttl,
            },
        );
        tracing::debug!(%user, "auth: session opened");
        token
    }

    /// The user behind `token`, extending the session on success.
    pub async fn lookup(&self, token: &str) -> Option<Uuid> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let session = tokens.get_mut(token)?;
        if session.expires <= now {
            let user = session.user;
            tokens.remove(token);
            tracing::debug!(%user, "auth: session expired");
            return None;
        }
        session.expires = now + self.ttl;
        Some(session.user)
    }

    pub async fn close(&self, token: &str) {
        if let Some(session) = self.tokens.write().await.remove(token) {
            tracing::debug!(user = %session.user, "auth: session closed");
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

/// The logged-in user behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        let id = state
            .sessions
            .lookup(token)
            .await
            .ok_or(ApiError::Unauthenticated)?;
        Ok(CurrentUser {
            id,
            token: token.to_string(),
        })
    }
}
