//! Post CRUD handlers.

use actix_web::{HttpResponse, web};

use posts_core::PostDraft;
use posts_shared::PostPayload;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    tracing::info!("Fetching all posts");
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::info!(post_id = id, "Fetching post");
    let post = state.posts.get(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/posts/title/{title}
pub async fn find_post_by_title(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let title = path.into_inner();
    tracing::info!(title = %title, "Fetching post by title");
    let post = state.posts.find_by_title(&title).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let payload = body.into_inner();
    tracing::info!(post_id = ?payload.id, user_id = ?payload.user_id, "Creating post");
    let post = state.posts.create(draft_from(payload)).await?;
    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{id}
///
/// Only `title` and `body` are taken from the request.
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::info!(post_id = id, "Updating post");
    let post = state.posts.update(id, draft_from(body.into_inner())).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::info!(post_id = id, "Deleting post");
    state.posts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// The client's version is dropped here; the store assigns versions.
// Absent or null content becomes empty and is rejected as blank.
fn draft_from(payload: PostPayload) -> PostDraft {
    PostDraft {
        id: payload.id,
        user_id: payload.user_id,
        title: payload.title.unwrap_or_default(),
        body: payload.body.unwrap_or_default(),
    }
}
