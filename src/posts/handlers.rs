use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreatePostRequest, FeedQuery, PostResponse},
    repo::Post,
};
use crate::{
    auth::extractors::AuthUser, dto::MessageResponse, error::ApiError, state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_post))
        .route("/feed", get(feed))
        .route("/user/:id", get(user_posts))
        .route("/:id", delete(delete_post))
}

/// Ownership rule: only the author may mutate a post. Ids are opaque, so
/// equality is the entire check.
fn assert_owner(post: &Post, principal: Uuid) -> Result<(), ApiError> {
    if post.author_id != principal {
        warn!(post_id = %post.id, "non-owner attempted post mutation");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Ownership gate: the post must exist and belong to the principal.
/// Returns the loaded post so callers need not fetch it again.
async fn require_owner(db: &PgPool, post_id: Uuid, principal: Uuid) -> Result<Post, ApiError> {
    let post = Post::find_by_id(db, post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".into()))?;
    assert_owner(&post, principal)?;
    Ok(post)
}

#[instrument(skip(state, payload))]
async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }

    let post = Post::create(&state.db, content, user_id).await?;
    info!(post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
async fn feed(
    State(state): State<AppState>,
    Query(q): Query<FeedQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let rows = Post::list_feed(&state.db, q.clamped_limit(), q.before).await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
async fn user_posts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let rows = Post::list_by_author(&state.db, id).await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

#[instrument(skip(state))]
async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post = require_owner(&state.db, id, user_id).await?;

    // A concurrent delete between the gate and here leaves nothing to do;
    // the outcome the caller asked for holds either way.
    let _ = Post::delete_by_id(&state.db, post.id).await?;

    info!(post_id = %id, "post deleted");
    Ok(Json(MessageResponse {
        message: "Post deleted successfully",
    }))
}
