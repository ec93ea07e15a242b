/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to Clone (everything inside is Arc / Clone-cheap); built once at startup
 */
use std::sync::Arc;

use crate::repos::PostStore;
use crate::services::{auth::AuthService, id_codec::IdCodec};

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub id_codec: IdCodec,
    pub auth: Arc<AuthService>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(
        posts: Arc<dyn PostStore>,
        id_codec: IdCodec,
        auth: Arc<AuthService>,
        service_name: &str,
    ) -> Self {
        Self {
            posts,
            id_codec,
            auth,
            service_name: Arc::from(service_name),
        }
    }
}
