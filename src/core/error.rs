use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::controllers::user::AuthError;
use crate::core::store::StoreError;
use crate::token::TokenError;
use crate::types::response::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No token provided")]
    MissingToken,
    #[error("Malformed token")]
    MalformedToken,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token still valid for more than {threshold_secs}s")]
    TokenStillValid { threshold_secs: i64 },
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("Token error: {0}")]
    Token(TokenError),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
    #[error("Internal server error")]
    Internal,
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => Error::UserAlreadyExists,
            err => Error::Store(err),
        }
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(_) => Error::MalformedToken,
            TokenError::InvalidSignature => Error::InvalidSignature,
            err => Error::Token(err),
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Error::InvalidCredentials,
            AuthError::BadRequest(message) => Error::BadRequest(message),
            AuthError::Store(err) => err.into(),
            AuthError::Hash(err) => Error::Bcrypt(err),
            AuthError::Join(err) => Error::Task(err),
        }
    }
}

impl Error {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::MissingToken => StatusCode::UNAUTHORIZED,
            Error::MalformedToken => StatusCode::BAD_REQUEST,
            Error::InvalidSignature => StatusCode::UNAUTHORIZED,
            Error::TokenStillValid { .. } => StatusCode::BAD_REQUEST,
            Error::UserAlreadyExists => StatusCode::CONFLICT,
            Error::Store(_)
            | Error::Token(_)
            | Error::Bcrypt(_)
            | Error::Task(_)
            | Error::Header(_)
            | Error::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!("{:?}", self);
            "Internal server error".to_owned()
        } else {
            tracing::debug!("{}", self);
            self.to_string()
        };

        let body = ErrorBody {
            status: status.as_u16(),
            error: &message,
        };

        (status, Json(body)).into_response()
    }
}
