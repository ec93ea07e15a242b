//! Bearer access token verification -> AuthCtx in request extensions.
//!
//! - No `Authorization` header, or `Bearer` with nothing after it: 401
//! - Anything else that does not verify (other scheme, bad signature,
//!   expired, malformed): 403
//!
//! Verification is pure (secret + claims check), no store call.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Put the given routes behind the access middleware.
///
/// `route_layer` so that unmatched paths still 404 instead of 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthenticated)?;

    // A header that is not even visible ASCII was sent, just garbled.
    let value = value.to_str().map_err(|_| AppError::InvalidToken)?.trim();
    if value.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    Ok(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    let verified = match state.auth.verify_verified(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::InvalidToken);
        }
    };

    let auth_ctx = AuthCtx::new(verified.user_id).with_jti(verified.jti);
    tracing::debug!(user_id = %auth_ctx.user_id, jti = ?auth_ctx.jti, "access token accepted");

    // middleware -> extractor hand-off
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
