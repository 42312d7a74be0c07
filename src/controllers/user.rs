use std::sync::Arc;

use bcrypt::BcryptError;

use crate::core::error::ConfigError;
use crate::core::store::{CredentialStore, NewUser, StoreError};
use crate::types::{Role, User};

/// Verified against when the username is unknown, so that both rejection
/// paths pay for one bcrypt verification.
const DUMMY_PASSWORD: &str = "tokengate-unknown-user";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Bcrypt error: {0}")]
    Hash(#[from] BcryptError),
    #[error("Hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub(crate) struct UserController {
    store: Arc<dyn CredentialStore>,
    bcrypt_cost: u32,
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl UserController {
    pub(crate) fn new(store: Arc<dyn CredentialStore>, bcrypt_cost: u32) -> Result<Self, ConfigError> {
        let dummy_hash = bcrypt::non_truncating_hash(DUMMY_PASSWORD, bcrypt_cost)?;

        Ok(Self {
            store,
            bcrypt_cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Creates a `Basic` user. Username uniqueness is left to the store.
    pub(crate) async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() {
            return Err(AuthError::BadRequest("username must not be empty".into()));
        }

        if password.is_empty() {
            return Err(AuthError::BadRequest("password must not be empty".into()));
        }

        let password_hash = self.hash(password).await?;

        let user = self
            .store
            .create(NewUser {
                username: username.to_owned(),
                password_hash,
                role: Role::default(),
            })
            .await?;

        tracing::info!(user = %user.username, id = user.id, "registered new user");

        Ok(user)
    }

    /// Unknown usernames and wrong passwords are both reported as
    /// [`AuthError::InvalidCredentials`].
    pub(crate) async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.store.find_by_username(username).await? else {
            tracing::debug!(user = %username, "login for unknown user");
            self.verify(password, &self.dummy_hash).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash).await? {
            tracing::debug!(user = %username, "wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;

        match tokio::task::spawn_blocking(move || bcrypt::non_truncating_hash(password, cost)).await? {
            Ok(hash) => Ok(hash),
            Err(BcryptError::Truncation(_)) => {
                Err(AuthError::BadRequest("password is too long".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        // No stored hash covers a password bcrypt would have to truncate.
        match tokio::task::spawn_blocking(move || bcrypt::non_truncating_verify(password, &hash))
            .await?
        {
            Ok(valid) => Ok(valid),
            Err(BcryptError::Truncation(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
