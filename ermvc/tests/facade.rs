use ermvc::axum::body::Body;
use ermvc::axum::http::{header, Request};
use ermvc::prelude::*;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn index() -> &'static str {
    "all posts"
}

async fn me(user: AuthenticatedUser) -> String {
    user.sub().unwrap_or_default()
}

fn app(tokens: TokenService) -> MvcApp {
    let registry = Controllers::new().controller(
        "PostController",
        HandlerSet::new().index(ActionHandler::new(index)),
    );
    let dir = tempfile::tempdir().unwrap();
    MvcApp::builder(MvcConfig::empty())
        .views_path(dir.path())
        .public_path(dir.path())
        .controllers(registry)
        .route(
            "/me",
            get(me).route_layer(ermvc::axum::middleware::from_fn_with_state(tokens, authenticate)),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn prelude_builds_a_served_app() {
    let tokens = TokenService::new("facade-secret");
    let app = app(tokens.clone());
    assert_eq!(
        app.convention_routes(),
        &[(ermvc::HttpMethod::Get, "/posts".to_string())]
    );

    let resp = app
        .router()
        .oneshot(Request::builder().uri("/posts").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"all posts");

    let token = tokens.sign(&json!({ "sub": "ada" })).unwrap();
    let resp = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ada");

    let resp = app
        .into_router()
        .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
