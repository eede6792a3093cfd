//! Post handlers.

use actix_web::{HttpResponse, web};

use inkpost_core::domain::PostId;
use inkpost_core::ports::Page;
use inkpost_shared::dto::{
    CreatePostRequest, PostListResponse, PostResponse, SearchPostQuery, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn list_response<T: Into<PostResponse>>(page: Page<T>) -> PostListResponse {
    PostListResponse {
        posts: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
    }
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(body.into_inner(), identity.user_id).await?;

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// GET /api/posts
pub async fn find_all(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .find_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/popular
pub async fn popular(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let page = state.posts.popular().await?;

    Ok(HttpResponse::Ok().json(list_response(page)))
}

/// GET /api/posts/search?title=..&body=..&tag=..&views=ASC|DESC&limit=..&offset=..
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchPostQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.search(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(list_response(page)))
}

/// GET /api/posts/{id}
pub async fn find_one(
    state: web::Data<AppState>,
    id: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.posts.find_one(id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(id.into_inner(), body.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// DELETE /api/posts/{id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    state.posts.remove(id.into_inner(), identity.user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
