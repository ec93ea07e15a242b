pub mod error;
#[cfg(test)]
pub mod memory;
pub mod post_repo;

pub use error::RepoError;
pub use post_repo::{NewPost, PgPostStore, PostPatch, PostRow, PostStore, PostWithAuthorRow};
