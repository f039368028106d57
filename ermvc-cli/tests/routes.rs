use ermvc_cli::commands::generate::{self, ControllerOptions};
use ermvc_cli::commands::init::{self, InitOptions};
use ermvc_cli::commands::routes::{self, collect_routes, exported_fn_name, parse_actions};
use ermvc_core::routing::{ActionKey, HttpMethod};
use std::fs;
use tempfile::TempDir;

// ── exported_fn_name ────────────────────────────────────────────────

#[test]
fn detects_async_and_sync_exports() {
    assert_eq!(exported_fn_name("pub async fn index(State(ctx): State<AppContext>)"), Some("index"));
    assert_eq!(exported_fn_name("    pub fn handlers() -> HandlerSet<Action> {"), Some("handlers"));
    assert_eq!(exported_fn_name("pub async fn show<T>(x: T)"), Some("show"));
    assert_eq!(exported_fn_name("pub async fn update"), Some("update"));
}

#[test]
fn ignores_private_and_non_fn_lines() {
    assert_eq!(exported_fn_name("async fn index() {}"), None);
    assert_eq!(exported_fn_name("fn helper() {}"), None);
    assert_eq!(exported_fn_name("// pub async fn index("), None);
    assert_eq!(exported_fn_name("pub struct User {"), None);
    assert_eq!(exported_fn_name("pub async fn "), None);
}

// ── parse_actions ───────────────────────────────────────────────────

const SOURCE: &str = r#"use ermvc::prelude::*;

pub async fn index() -> &'static str {
    "all"
}

pub async fn show(Path(id): Path<String>) -> String {
    id
}

pub async fn create() -> &'static str {
    "form"
}

async fn destroy() {}

pub fn handlers() -> HandlerSet<Action> {
    HandlerSet::new()
}
"#;

#[test]
fn parse_handles_wrapped_signature() {
    let source = "pub async fn store\n(\n    Json(body): Json<Value>,\n) {}\n";
    let actions = parse_actions(source, "PostController", "post_controller.rs");
    let store = actions.get(ActionKey::Store).unwrap();
    assert_eq!(store.action, "store");
    assert_eq!(store.line, 1);
}

#[test]
fn parse_keeps_only_exported_actions() {
    let actions = parse_actions(SOURCE, "UserController", "user_controller.rs");
    let keys: Vec<ActionKey> = actions.actions().collect();
    assert_eq!(keys, vec![ActionKey::Index, ActionKey::Show]);

    let show = actions.get(ActionKey::Show).unwrap();
    assert_eq!(show.controller, "UserController");
    assert_eq!(show.action, "show");
    assert_eq!(show.file, "user_controller.rs");
    assert_eq!(show.line, 7);
}

// ── collect_routes ──────────────────────────────────────────────────

#[test]
fn collects_routes_sorted_by_path() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("user_controller.rs"), SOURCE).unwrap();
    fs::write(
        dir.join("PersonController.rs"),
        "pub async fn index() {}\npub async fn destroy() {}\n",
    )
    .unwrap();
    fs::write(dir.join("mod.rs"), "pub mod user_controller;\n").unwrap();
    fs::write(dir.join("helpers.rs"), "pub async fn index() {}\n").unwrap();

    let (routes, report) = collect_routes(dir).unwrap();

    let summary: Vec<(HttpMethod, &str)> =
        routes.iter().map(|r| (r.method, r.path.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (HttpMethod::Get, "/people"),
            (HttpMethod::Delete, "/people/{id}"),
            (HttpMethod::Get, "/users"),
            (HttpMethod::Get, "/users/{id}"),
        ]
    );
    assert_eq!(report.registered.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(routes[0].handler.controller, "PersonController");
}

#[test]
fn controller_without_actions_has_no_routes() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("empty_controller.rs"), "pub fn handlers() {}\n").unwrap();

    let (routes, report) = collect_routes(tmp.path()).unwrap();
    assert!(routes.is_empty());
    assert_eq!(report.registered.len(), 1);
}

// ── run ─────────────────────────────────────────────────────────────

#[test]
fn run_requires_controllers_dir() {
    let tmp = TempDir::new().unwrap();
    let err = routes::run(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("src/controllers/"));
}

#[test]
fn generated_project_routes() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("app");
    init::run(
        &root,
        &InitOptions {
            skip_install: true,
            with_database: false,
        },
    )
    .unwrap();
    generate::controller(&root, "post", &ControllerOptions { views: false }).unwrap();

    routes::run(&root).unwrap();

    let (routes, _) = collect_routes(&root.join("src/controllers")).unwrap();
    let paths: Vec<(HttpMethod, &str)> =
        routes.iter().map(|r| (r.method, r.path.as_str())).collect();
    assert_eq!(
        paths,
        vec![
            (HttpMethod::Get, "/homes"),
            (HttpMethod::Get, "/posts"),
            (HttpMethod::Post, "/posts"),
            (HttpMethod::Get, "/posts/{id}"),
            (HttpMethod::Put, "/posts/{id}"),
            (HttpMethod::Delete, "/posts/{id}"),
        ]
    );
}
