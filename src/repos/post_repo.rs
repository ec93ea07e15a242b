/*
 * Responsibility
 * - posts CRUD behind the PostStore trait (handlers only see the trait)
 * - PgPostStore: SQLx / Postgres implementation
 * - Author display name is resolved with a LEFT JOIN on users; a post whose
 *   author has no users row is still returned (name = NULL)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    #[sqlx(rename = "postId")]
    pub post_id: i64,

    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,

    #[sqlx(rename = "authorId")]
    pub author_id: Uuid,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthorRow {
    #[sqlx(flatten)]
    pub post: PostRow,

    #[sqlx(rename = "authorName")]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub author_id: Uuid,
}

/// Partial update. Only these fields are mutable; `author_id` is not here on purpose.
///
/// - `None`: leave unchanged
/// - `Some(None)` (title/content): set NULL
/// - `Some(v)`: replace
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<Option<String>>,
    pub content: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

/// Post persistence. Every call is a single-document operation; there are no
/// cross-document transactions.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts with author names, newest first.
    async fn list_all(&self) -> RepoResult<Vec<PostWithAuthorRow>>;

    async fn get_with_author(&self, post_id: i64) -> RepoResult<Option<PostWithAuthorRow>>;

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>>;

    /// Posts written by `author_id`, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> RepoResult<Vec<PostRow>>;

    async fn create(&self, new_post: NewPost) -> RepoResult<PostRow>;

    /// `Ok(None)` when the post vanished between lookup and update.
    async fn update(&self, post_id: i64, patch: PostPatch) -> RepoResult<Option<PostRow>>;

    /// `Ok(false)` when nothing was deleted.
    async fn delete(&self, post_id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_all(&self) -> RepoResult<Vec<PostWithAuthorRow>> {
        let rows = sqlx::query_as::<_, PostWithAuthorRow>(
            r#"
            SELECT
                p."postId", p.title, p.content, p.tags, p.categories,
                p."authorId", p."createdAt", p."updatedAt",
                u."userName" AS "authorName"
            FROM posts p
            LEFT JOIN users u ON u."userId" = p."authorId"
            ORDER BY p."createdAt" DESC, p."postId" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_with_author(&self, post_id: i64) -> RepoResult<Option<PostWithAuthorRow>> {
        let row = sqlx::query_as::<_, PostWithAuthorRow>(
            r#"
            SELECT
                p."postId", p.title, p.content, p.tags, p.categories,
                p."authorId", p."createdAt", p."updatedAt",
                u."userName" AS "authorName"
            FROM posts p
            LEFT JOIN users u ON u."userId" = p."authorId"
            WHERE p."postId" = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, content, tags, categories,
                "authorId", "createdAt", "updatedAt"
            FROM posts
            WHERE "postId" = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_by_author(&self, author_id: Uuid) -> RepoResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, content, tags, categories,
                "authorId", "createdAt", "updatedAt"
            FROM posts
            WHERE "authorId" = $1
            ORDER BY "createdAt" DESC, "postId" DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, new_post: NewPost) -> RepoResult<PostRow> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, tags, categories, "authorId")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                "postId", title, content, tags, categories,
                "authorId", "createdAt", "updatedAt"
            "#,
        )
        .bind(new_post.title)
        .bind(new_post.content)
        .bind(new_post.tags)
        .bind(new_post.categories)
        .bind(new_post.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, post_id: i64, patch: PostPatch) -> RepoResult<Option<PostRow>> {
        // $2/$4: "field was sent" flags, so an explicit null can clear the column
        // $6/$7: NULL means keep the current array
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET
                title = CASE WHEN $2::boolean THEN $3::text ELSE title END,
                content = CASE WHEN $4::boolean THEN $5::text ELSE content END,
                tags = COALESCE($6::text[], tags),
                categories = COALESCE($7::text[], categories),
                "updatedAt" = clock_timestamp()
            WHERE "postId" = $1
            RETURNING
                "postId", title, content, tags, categories,
                "authorId", "createdAt", "updatedAt"
            "#,
        )
        .bind(post_id)
        .bind(patch.title.is_some())
        .bind(patch.title.flatten())
        .bind(patch.content.is_some())
        .bind(patch.content.flatten())
        .bind(patch.tags)
        .bind(patch.categories)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, post_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE "postId" = $1
            "#,
        )
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
