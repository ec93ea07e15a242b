/*
 * Responsibility
 * - /posts CRUD handlers
 * - `{post_id}` is a public id; the extractor decodes it to the internal id
 * - Protected handlers take AuthCtxExtractor; ownership is checked via post_policy
 * - Store failures are logged here and answered with a generic message
 * - Bodies are decoded only after the lookup / ownership checks (dto::body)
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::{
    api::{
        dto::{
            body,
            posts::{AuthorRef, AuthorSummary, CreatePostRequest, PostResponse, UpdatePostRequest},
        },
        extractors::{AuthCtxExtractor, PublicPostId},
    },
    error::{AppError, MessageResponse},
    repos::{PostRow, PostWithAuthorRow, RepoError},
    services::post_policy,
    state::AppState,
};

fn row_to_response(
    state: &AppState,
    row: PostRow,
    author: AuthorRef,
) -> Result<PostResponse, AppError> {
    let public_id = state.id_codec.encode(row.post_id).map_err(|e| {
        tracing::error!(error = %e, post_id = row.post_id, "failed to encode post id");
        AppError::internal("Failed to fetch post")
    })?;

    Ok(PostResponse {
        id: public_id,
        title: row.title,
        content: row.content,
        tags: row.tags,
        categories: row.categories,
        author,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn bare(state: &AppState, row: PostRow) -> Result<PostResponse, AppError> {
    let author = AuthorRef::Id(row.author_id);
    row_to_response(state, row, author)
}

fn with_author(state: &AppState, row: PostWithAuthorRow) -> Result<PostResponse, AppError> {
    let author = AuthorRef::Named(AuthorSummary {
        id: row.post.author_id,
        name: row.author_name,
    });
    row_to_response(state, row.post, author)
}

fn store_failure(op: &'static str, message: &'static str) -> impl FnOnce(RepoError) -> AppError {
    move |e| {
        tracing::error!(error = ?e, op, "post store call failed");
        AppError::internal(message)
    }
}

/// GET /posts/all (public)
pub async fn list_all_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state
        .posts
        .list_all()
        .await
        .map_err(store_failure("list_all", "Failed to fetch posts"))?;

    let res = rows
        .into_iter()
        .map(|row| with_author(&state, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

/// GET /posts/public/{post_id} and /posts/all/{post_id} (public)
pub async fn get_public_post(
    State(state): State<AppState>,
    post_id: PublicPostId,
) -> Result<Json<PostResponse>, AppError> {
    let row = state
        .posts
        .get_with_author(post_id.id)
        .await
        .map_err(store_failure("get_with_author", "Failed to fetch post"))?
        .ok_or(AppError::not_found("Post not found"))?;

    Ok(Json(with_author(&state, row)?))
}

/// GET /posts (caller's own posts)
pub async fn list_my_posts(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state
        .posts
        .list_by_author(ctx.user_id)
        .await
        .map_err(store_failure("list_by_author", "Failed to fetch posts"))?;

    let res = rows
        .into_iter()
        .map(|row| bare(&state, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    headers: HeaderMap,
    raw: Bytes,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let req: CreatePostRequest = body::decode(&headers, &raw)?;

    let row = state
        .posts
        .create(req.into_new_post(ctx.user_id))
        .await
        .map_err(store_failure("create", "Failed to create post"))?;

    tracing::info!(post_id = row.post_id, author_id = %ctx.user_id, "post created");

    Ok((StatusCode::CREATED, Json(bare(&state, row)?)))
}

/// PUT /posts/{post_id}
pub async fn update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    post_id: PublicPostId,
    headers: HeaderMap,
    raw: Bytes,
) -> Result<Json<PostResponse>, AppError> {
    let existing = state
        .posts
        .get(post_id.id)
        .await
        .map_err(store_failure("get", "Failed to update post"))?
        .ok_or(AppError::not_found("Not found"))?;

    post_policy::ensure_owner(&existing, &ctx)?;
    let req: UpdatePostRequest = body::decode(&headers, &raw)?;

    // The post can disappear between the read and the write (concurrent delete).
    let row = state
        .posts
        .update(post_id.id, req.into_patch())
        .await
        .map_err(store_failure("update", "Failed to update post"))?
        .ok_or(AppError::not_found("Not found"))?;

    Ok(Json(bare(&state, row)?))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    post_id: PublicPostId,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = state
        .posts
        .get(post_id.id)
        .await
        .map_err(store_failure("get", "Failed to delete post"))?
        .ok_or(AppError::not_found("Not found"))?;

    post_policy::ensure_owner(&existing, &ctx)?;

    let deleted = state
        .posts
        .delete(post_id.id)
        .await
        .map_err(store_failure("delete", "Failed to delete post"))?;

    if !deleted {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(post_id = post_id.id, author_id = %ctx.user_id, "post deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}
