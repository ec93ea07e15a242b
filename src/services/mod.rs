/*
 * Responsibility
 * - Process-level services injected through AppState
 */
pub mod auth;
pub mod id_codec;
pub mod post_policy;
