/**
 * Responsibility
 *  - Per-resource id types (tag + alias); no decode logic here
 *
 * Everything `pub` below is re-exported through ./mod.rs
 */
use super::core::PublicId;

// posts
pub enum PostTag {}
pub type PublicPostId = PublicId<PostTag>;
