use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::json;

use inkpost_core::ports::TokenService;
use inkpost_infra::{InMemoryPostRepository, JwtConfig, JwtTokenService};
use inkpost_shared::dto::{PostListResponse, PostResponse};

use super::configure_routes;
use crate::state::AppState;

const OWNER: i32 = 1;
const STRANGER: i32 = 2;

fn test_state() -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "inkpost-test".to_string(),
    });
    AppState::from_parts(Arc::new(InMemoryPostRepository::new()), Arc::new(tokens))
}

fn bearer(state: &AppState, user_id: i32) -> (header::HeaderName, String) {
    let token = state
        .tokens
        .generate_token(user_id, "writer@example.com")
        .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn new_post_json(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "body": [
            {"type": "header", "data": {"text": "Heading", "level": 2}},
            {"type": "paragraph", "data": {"text": "Lead paragraph"}}
        ],
        "tags": "rust"
    })
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_create_requires_bearer_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(new_post_json("Anonymous"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_then_read_counts_views() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state, OWNER))
        .set_json(new_post_json("Hello"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostResponse = test::read_body_json(resp).await;
    assert_eq!(created.description, "Lead paragraph");
    assert_eq!(created.user_id, OWNER);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", created.id))
        .to_request();
    let fetched: PostResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(fetched.views, 1);
}

#[actix_web::test]
async fn test_missing_post_is_404_problem() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/posts/404").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["title"], "Not Found");
}

#[actix_web::test]
async fn test_delete_by_stranger_is_forbidden() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&state, OWNER))
        .set_json(new_post_json("Keep out"))
        .to_request();
    let created: PostResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", created.id))
        .insert_header(bearer(&state, STRANGER))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", created.id))
        .insert_header(bearer(&state, OWNER))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_search_and_popular_routes() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    for title in ["Rust ownership", "Baking bread", "rust traits"] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&state, OWNER))
            .set_json(new_post_json(title))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/posts/search?title=RUST&views=DESC&limit=1")
        .to_request();
    let found: PostListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.total, 2);
    assert_eq!(found.posts.len(), 1);

    let req = test::TestRequest::get().uri("/api/posts/popular").to_request();
    let popular: PostListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(popular.total, 3);
}

#[actix_web::test]
async fn test_update_missing_post_is_404() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::patch()
        .uri("/api/posts/77")
        .insert_header(bearer(&state, OWNER))
        .set_json(new_post_json("Nothing here"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
