//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. curl / server-to-server calls send no
//!   `Origin` and are not affected.
//!
//! Policy:
//! - Exact-match allowlist from Config (`CORS_ALLOWED_ORIGINS`), in every
//!   environment.
//! - Credentials allowed, so methods/headers are listed explicitly (no wildcards).

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Apply CORS policy to the given Router.
///
/// An empty allowlist allows no cross-origin browser access at all.
pub fn apply(router: Router, allowed_origins: &[String]) -> Router {
    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| match HeaderValue::from_str(s) {
            // Wildcards can't be combined with credentials.
            Ok(v) if v != "*" => Some(v),
            _ => {
                tracing::warn!(origin = %s, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
