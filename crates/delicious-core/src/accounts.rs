//! User accounts: the account collaborator behind login, hearts and
//! password resets.
//!
//! Password material is salted and stretched with SHA-256 and never leaves
//! this module: [`User`] serialises without it.

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt};
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

const SALT_BYTES: usize = 16;
const HASH_ROUNDS: u32 = 4096;
const RESET_TOKEN_BYTES: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    #[error("An account with that email already exists!")]
    EmailTaken,
    #[error("{0}")]
    Invalid(String),
    #[error("user {0} not found")]
    NotFound(Uuid),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let digest = stretch(&salt, password);
        Self { salt, digest }
    }

    fn verify(&self, password: &str) -> bool {
        stretch(&self.salt, password) == self.digest
    }
}

fn stretch(salt: &str, password: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..HASH_ROUNDS {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt.as_bytes())
            .finalize();
    }
    hex::encode(digest)
}

#[derive(Debug, Clone, PartialEq)]
struct ResetToken {
    token: String,
    expires: DateTime<Utc>,
}

/// A registered user. Serialises without password or reset material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Ids of hearted stores; each id appears at most once.
    pub hearts: Vec<Uuid>,
    #[serde(skip)]
    password: PasswordHash,
    #[serde(skip)]
    reset: Option<ResetToken>,
}

impl User {
    pub fn has_hearted(&self, store: Uuid) -> bool {
        self.hearts.contains(&store)
    }
}

/// Registration form.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A freshly issued password reset token.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedReset {
    pub user: User,
    pub token: String,
    pub expires: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Data-store operations on [`User`] records.
pub trait UserRepository: Send + Sync {
    fn register(&self, new: NewUser) -> BoxFuture<'_, Result<User, AccountError>>;

    /// The user with this email and password, if both match.
    fn authenticate<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<User>, AccountError>>;

    fn by_id(&self, id: Uuid) -> BoxFuture<'_, Result<Option<User>, AccountError>>;

    /// Add `store` to the user's hearts, or remove it if already present.
    fn toggle_heart(&self, user_id: Uuid, store: Uuid) -> BoxFuture<'_, Result<User, AccountError>>;

    /// Issue a reset token for the account with this email, valid for `ttl`.
    /// `None` when no such account exists.
    fn issue_reset<'a>(
        &'a self,
        email: &'a str,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<Option<IssuedReset>, AccountError>>;

    /// The user holding this unexpired reset token.
    fn by_reset_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<User>, AccountError>>;

    /// Set a new password for the holder of an unexpired token and clear the
    /// token. `None` when the token is unknown or expired.
    fn reset_password<'a>(
        &'a self,
        token: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<User>, AccountError>>;
}

fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn token_is_live(reset: &Option<ResetToken>, token: &str, now: DateTime<Utc>) -> bool {
    reset
        .as_ref()
        .is_some_and(|r| r.token == token && r.expires > now)
}

/// In-process [`UserRepository`].
#[derive(Debug, Default)]
pub struct MemoryUsers {
    users: RwLock<Vec<User>>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUsers {
    fn register(&self, new: NewUser) -> BoxFuture<'_, Result<User, AccountError>> {
        async move {
            let email = normalise_email(&new.email);
            if new.name.trim().is_empty() {
                return Err(AccountError::Invalid("You must supply a name!".into()));
            }
            if !email.contains('@') {
                return Err(AccountError::Invalid("That Email is not valid!".into()));
            }
            if new.password.is_empty() {
                return Err(AccountError::Invalid("Password cannot be blank!".into()));
            }

            let mut users = self.users.write().await;
            if users.iter().any(|u| u.email == email) {
                return Err(AccountError::EmailTaken);
            }
            let user = User {
                id: Uuid::new_v4(),
                name: new.name.trim().to_string(),
                email,
                hearts: Vec::new(),
                password: PasswordHash::new(&new.password),
                reset: None,
            };
            tracing::debug!(id = %user.id, "accounts: registered");
            users.push(user.clone());
            Ok(user)
        }
        .boxed()
    }

    fn authenticate<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<User>, AccountError>> {
        async move {
            let email = normalise_email(email);
            Ok(self
                .users
                .read()
                .await
                .iter()
                .find(|u| u.email == email && u.password.verify(password))
                .cloned())
        }
        .boxed()
    }

    fn by_id(&self, id: Uuid) -> BoxFuture<'_, Result<Option<User>, AccountError>> {
        async move { Ok(self.users.read().await.iter().find(|u| u.id == id).cloned()) }.boxed()
    }

    fn toggle_heart(&self, user_id: Uuid, store: Uuid) -> BoxFuture<'_, Result<User, AccountError>> {
        async move {
            let mut users = self.users.write().await;
            let user = users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or(AccountError::NotFound(user_id))?;
            if let Some(pos) = user.hearts.iter().position(|h| *h == store) {
                user.hearts.remove(pos);
                tracing::debug!(user = %user.id, %store, "accounts: heart removed");
            } else {
                user.hearts.push(store);
                tracing::debug!(user = %user.id, %store, "accounts: heart added");
            }
            Ok(user.clone())
        }
        .boxed()
    }

    fn issue_reset<'a>(
        &'a self,
        email: &'a str,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<Option<IssuedReset>, AccountError>> {
        async move {
            let email = normalise_email(email);
            let mut users = self.users.write().await;
            let Some(user) = users.iter_mut().find(|u| u.email == email) else {
                return Ok(None);
            };

            let mut bytes = [0u8; RESET_TOKEN_BYTES];
            rand::thread_rng().fill_bytes(&mut bytes);
            let token = hex::encode(bytes);
            let expires = Utc::now() + ttl;
            user.reset = Some(ResetToken {
                token: token.clone(),
                expires,
            });
            Ok(Some(IssuedReset {
                user: user.clone(),
                token,
                expires,
            }))
        }
        .boxed()
    }

    fn by_reset_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<User>, AccountError>> {
        async move {
            let now = Utc::now();
            Ok(self
                .users
                .read()
                .await
                .iter()
                .find(|u| token_is_live(&u.reset, token, now))
                .cloned())
        }
        .boxed()
    }

    fn reset_password<'a>(
        &'a self,
        token: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<User>, AccountError>> {
        async move {
            if password.is_empty() {
                return Err(AccountError::Invalid("Password cannot be blank!".into()));
            }
            let now = Utc::now();
            let mut users = self.users.write().await;
            let Some(user) = users.iter_mut().find(|u| token_is_live(&u.reset, token, now)) else {
                return Ok(None);
            };
            user.password = PasswordHash::new(password);
            user.reset = None;
            tracing::debug!(id = %user.id, "accounts: password reset");
            Ok(Some(user.clone()))
        }
        .boxed()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
