/*
 * Responsibility
 * - The "authenticated caller" type handlers see
 * - The access middleware verifies the token and stores this in request
 *   extensions; handlers only ever receive this type
 */

use uuid::Uuid;

/// Context attached to an authenticated request.
///
/// - `user_id` is the token subject; post ownership is compared against it
/// - `jti` is kept for log correlation only
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub jti: Option<String>,
}

impl AuthCtx {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id, jti: None }
    }

    pub fn with_jti(mut self, jti: Option<String>) -> Self {
        self.jti = jti;
        self
    }
}
