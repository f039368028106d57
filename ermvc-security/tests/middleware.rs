use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use ermvc_security::{authenticate, AuthenticatedUser, TokenService};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "middleware-test-secret";

async fn me(user: AuthenticatedUser) -> Json<Value> {
    Json(json!({ "sub": user.sub(), "role": user.claim("role") }))
}

async fn maybe(user: Option<AuthenticatedUser>) -> String {
    match user {
        Some(user) => format!("hello {}", user.sub().unwrap_or_default()),
        None => "anonymous".to_string(),
    }
}

fn app() -> Router {
    let tokens = TokenService::new(SECRET);
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(tokens, authenticate));
    Router::new()
        .merge(protected)
        .route("/maybe", get(maybe))
        .route("/unguarded", get(me))
}

fn request(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let resp = app().oneshot(request("/me", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn wrong_scheme_is_unauthorized() {
    let resp = app()
        .oneshot(request("/me", Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn bad_token_is_rejected() {
    let resp = app()
        .oneshot(request("/me", Some("Bearer not.a.token")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await, json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn token_signed_elsewhere_is_rejected() {
    let token = TokenService::new("other-secret")
        .sign(&json!({ "sub": "mallory" }))
        .unwrap();
    let resp = app()
        .oneshot(request("/me", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await, json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let token = TokenService::new(SECRET)
        .sign(&json!({ "sub": "alice", "role": "admin" }))
        .unwrap();
    let resp = app()
        .oneshot(request("/me", Some(&format!("bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "sub": "alice", "role": "admin" }));
}

#[tokio::test]
async fn extractor_without_middleware_rejects() {
    let resp = app().oneshot(request("/unguarded", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn optional_user_is_none_without_middleware() {
    let resp = app().oneshot(request("/maybe", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"anonymous");
}

#[test]
fn numeric_sub_is_stringified() {
    let user = AuthenticatedUser::from_claims(json!({ "sub": 42 }));
    assert_eq!(user.sub().as_deref(), Some("42"));
    assert!(AuthenticatedUser::from_claims(json!({})).sub().is_none());
}
