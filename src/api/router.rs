use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use super::handlers::*;
use super::protocol::{
    ENDPOINT_ROOT, ENDPOINT_USER, ENDPOINT_USERS, ErrorResponse, FORWARDED_FOR_HEADER,
    REAL_IP_HEADER, REQUEST_ID_HEADER,
};
use crate::storage::store::UserStore;

/// Builds the HTTP application around `store`.
///
/// Every user route is reachable with and without a trailing slash. Reads that
/// take longer than `request_timeout` are answered with 504. Writes are never
/// cut off here, since a dropped write may already be on disk; bound them
/// through the store instead (see `JsonFileStore::with_lock_timeout`).
pub fn build_router<S: UserStore>(store: Arc<S>, request_timeout: Duration) -> Router {
    let users = get(handle_list_users::<S>).post(handle_create_user::<S>);
    let user = get(handle_get_user::<S>)
        .patch(handle_update_user::<S>)
        .delete(handle_delete_user::<S>);

    Router::new()
        .route(ENDPOINT_ROOT, get(handle_now))
        .route(ENDPOINT_USERS, users.clone())
        .route(&format!("{}/", ENDPOINT_USERS), users)
        .route(ENDPOINT_USER, user.clone())
        .route(&format!("{}/", ENDPOINT_USER), user)
        .layer(Extension(store))
        .layer(middleware::from_fn_with_state(request_timeout, enforce_deadline))
        .layer(middleware::from_fn(trace_requests))
}

/// Tags each request with an id, runs it inside a span and logs the outcome.
async fn trace_requests(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let client_ip = client_ip(req.headers());

    let span = tracing::info_span!(
        "request",
        id = %request_id,
        client = client_ip.as_deref().unwrap_or("-"),
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            "{} in {}ms",
            response.status(),
            started.elapsed().as_millis()
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Client address reported by a proxy: `X-Real-IP`, else the first `X-Forwarded-For` entry.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
    };

    header(REAL_IP_HEADER)
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            header(FORWARDED_FOR_HEADER)
                .and_then(|list| list.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
}

async fn enforce_deadline(State(limit): State<Duration>, req: Request, next: Next) -> Response {
    if !req.method().is_safe() {
        return next.run(req).await;
    }

    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!("Request exceeded {:?}", limit);
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorResponse {
                    status: "Request timed out.".to_string(),
                    error: format!("no response within {:?}", limit),
                }),
            )
                .into_response()
        }
    }
}
