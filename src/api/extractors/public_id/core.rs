/*
 * Responsibility
 *  - Take the `{post_id}` path segment as a public id and decode it to the internal id
 *  - Generic over a tag type so each resource gets its own id type
 *
 * A segment that does not decode is reported as an internal failure of the
 * lookup (500), the same way a store-side cast error would be; the id never
 * reaches the store.
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, Copy)]
pub struct PublicId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PublicId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

fn decode_public_id(state: &AppState, public_id: &str) -> Result<i64, AppError> {
    state.id_codec.decode(public_id).map_err(|err| {
        tracing::warn!(error = %err, public_id, "could not decode post id");
        AppError::internal("Failed to fetch post")
    })
}

impl<T> FromRequestParts<AppState> for PublicId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(public_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::internal("Failed to fetch post"))?;
        let id = decode_public_id(state, &public_id)?;
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId").field("id", &self.id).finish()
    }
}
