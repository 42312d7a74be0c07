use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::OffsetDateTime;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::token::{Claims, IssuedToken, TokenError};
use crate::types::request::Credentials;
use crate::types::response::{Envelope, UserResponse};
use crate::utils::auth::TOKEN;

#[instrument(skip_all)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Envelope<UserResponse>>, Error> {
    let Json(credentials) = payload.map_err(|e| Error::BadRequest(e.body_text()))?;
    credentials.require_fields()?;

    let user = state
        .user_controller
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok(Json(Envelope::ok(user.into())))
}

#[instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(credentials) = payload.map_err(|e| Error::BadRequest(e.body_text()))?;
    credentials.require_fields()?;

    let user = state
        .user_controller
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    let issued = state.token_controller.login(&user.username)?;

    tracing::info!(user = %user.username, "logged in");

    token_response(issued)
}

/// Runs behind `require_token`, so `claims` carry a verified signature.
#[instrument(skip_all)]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, Error> {
    let issued = state.token_controller.refresh(&claims)?;

    tracing::info!(user = %claims.username, "refreshed token");

    token_response(issued)
}

/// Hands the token back both as a `token` cookie expiring with the token and
/// as a `token` response header. The body stays empty.
fn token_response(issued: IssuedToken) -> Result<impl IntoResponse, Error> {
    let expires = OffsetDateTime::from_unix_timestamp(issued.claims.expires_at)
        .map_err(|_| Error::Token(TokenError::ExpiryOutOfRange))?;

    let header = HeaderValue::from_str(&issued.token)?;

    let cookie = Cookie::build((TOKEN, issued.token))
        .path("/")
        .http_only(true)
        .expires(expires);

    Ok((
        CookieJar::new().add(cookie),
        [(HeaderName::from_static(TOKEN), header)],
    ))
}
