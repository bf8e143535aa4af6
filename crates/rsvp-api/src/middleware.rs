//! Request interceptors.
//!
//! Each interceptor either answers the request itself or hands it to `next`.
//! The `*_interceptors` functions install them in order.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use rsvp_types::api::ErrorResponse;

use crate::rate_limit::Decision;
use crate::state::AppState;

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
pub const RATE_LIMIT_HEADER: HeaderName = HeaderName::from_static("ratelimit");
pub const RATE_LIMIT_POLICY_HEADER: HeaderName = HeaderName::from_static("ratelimit-policy");

/// Interceptors for RSVP submissions, outermost first: rate limit, then API key.
pub fn gated_write_interceptors(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    // Layers added later run earlier
    let routes = if state.security.protect_writes {
        routes.layer(middleware::from_fn_with_state(state.clone(), require_api_key))
    } else {
        routes
    };
    write_interceptors(routes, state)
}

/// Interceptors for open submissions such as music suggestions: rate limit only.
pub fn write_interceptors(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    routes.layer(middleware::from_fn_with_state(state.clone(), rate_limit))
}

/// Interceptors for listing routes: API key only, and only when enabled.
pub fn read_interceptors(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    if state.security.protect_reads {
        routes.layer(middleware::from_fn_with_state(state.clone(), require_api_key))
    } else {
        routes
    }
}

/// Compare `x-api-key` against the configured secret.
pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(expected) = state.security.api_key.as_deref() else {
        error!("API_KEY environment variable is not set");
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error");
    };

    let provided = req
        .headers()
        .get(&API_KEY_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    if !keys_match(provided, expected.as_bytes()) {
        return reject(StatusCode::UNAUTHORIZED, "Unauthorized: invalid or missing API key");
    }

    next.run(req).await
}

/// Fixed-window limit per client, advertised with draft-7 `RateLimit` headers.
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let limiter = &state.rate_limiter;
    match limiter.check(client) {
        Decision::Unlimited => next.run(req).await,
        Decision::Allowed { remaining, reset } => {
            let mut response = next.run(req).await;
            let (limit, window) = (limiter.limit(), limiter.window());
            insert_rate_headers(response.headers_mut(), limit, window, remaining, reset);
            response
        }
        Decision::Limited { retry_after } => {
            warn!("Rate limit exceeded for {:?} on {}", client, req.uri().path());
            let mut response = reject(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, please try again later",
            );
            let headers = response.headers_mut();
            insert_rate_headers(headers, limiter.limit(), limiter.window(), 0, retry_after);
            headers.insert(header::RETRY_AFTER, HeaderValue::from(ceil_secs(retry_after)));
            response
        }
    }
}

fn insert_rate_headers(
    headers: &mut HeaderMap,
    limit: u32,
    window: Duration,
    remaining: u32,
    reset: Duration,
) {
    let policy = format!("{};w={}", limit, window.as_secs());
    let current = format!("limit={}, remaining={}, reset={}", limit, remaining, ceil_secs(reset));
    for (name, value) in [(RATE_LIMIT_POLICY_HEADER, policy), (RATE_LIMIT_HEADER, current)] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}

/// Round up so clients never retry a moment too early.
fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    provided.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_must_match_exactly() {
        assert!(keys_match(b"s3cret", b"s3cret"));
        assert!(!keys_match(b"s3cret", b"s3cre7"));
        assert!(!keys_match(b"s3cret", b"s3cret-longer"));
        assert!(!keys_match(b"", b"s3cret"));
    }

    #[test]
    fn rate_headers_follow_draft_7() {
        let mut headers = HeaderMap::new();
        insert_rate_headers(
            &mut headers,
            10,
            Duration::from_secs(900),
            7,
            Duration::from_millis(299_500),
        );
        assert_eq!(headers[&RATE_LIMIT_POLICY_HEADER], "10;w=900");
        assert_eq!(headers[&RATE_LIMIT_HEADER], "limit=10, remaining=7, reset=300");
    }
}
