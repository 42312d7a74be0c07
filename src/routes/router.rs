use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderName, Method, Request, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::info_span;

use crate::core::state::AppState;
use crate::routes::{auth, health};
use crate::utils;

pub(crate) fn routes(state: AppState) -> Router {
    // /auth/...
    let auth_router = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route(
            "/refresh",
            post(auth::refresh).route_layer(middleware::from_fn_with_state(
                state.clone(),
                utils::auth::require_token,
            )),
        );

    let token_header = HeaderName::from_static(utils::auth::TOKEN);

    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_router)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let matched_path = request
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str);

                        info_span!(
                            "request",
                            method = ?request.method(),
                            matched_path,
                        )
                    }),
                )
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST])
                        .allow_origin(cors::Any)
                        .allow_headers([header::CONTENT_TYPE, token_header.clone()])
                        .expose_headers([token_header]),
                ),
        )
}
