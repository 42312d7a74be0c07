use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::core::error::Error;
use crate::core::state::AppState;

/// Header (and cookie) carrying the session token.
pub(crate) const TOKEN: &str = "token";

/// Gate for routes that need a signed token. On success the validated
/// [`Claims`](crate::token::Claims) are attached as a request extension for the
/// next handler; expiry is left for that handler to judge.
pub(crate) async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = match request.headers().get(TOKEN) {
        Some(value) => value.to_str().map_err(|_| Error::MalformedToken)?,
        None => return Err(Error::MissingToken),
    };

    if token.is_empty() {
        return Err(Error::MissingToken);
    }

    let claims = state.token_controller.validate(token)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
