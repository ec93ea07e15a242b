/*
 * Responsibility
 * - Object level authorization for posts (BOLA check)
 * - Only the author may mutate or delete a post
 */
use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::PostRow;

pub fn ensure_owner(post: &PostRow, ctx: &AuthCtx) -> Result<(), AppError> {
    // Both sides are parsed Uuids, so formatting differences (case, braces) can't cause a mismatch.
    if post.author_id == ctx.user_id {
        return Ok(());
    }

    tracing::warn!(
        post_id = post.post_id,
        author_id = %post.author_id,
        caller_id = %ctx.user_id,
        "caller is not the author"
    );
    Err(AppError::Forbidden)
}
