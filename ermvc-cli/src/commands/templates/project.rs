use super::{render, CONTROLLERS_MARKER, REGISTRY_MARKER};

const CARGO_TOML: &str = r#"[package]
name = "{{name}}"
version = "0.1.0"
edition = "2021"

[dependencies]
ermvc = { version = "{{version}}"{{features}} }
tokio = { version = "1", features = ["full"] }
serde = { version = "1", features = ["derive"] }
serde_json = "1"
tracing = "0.1"{{extra_deps}}
"#;

const MAIN_RS: &str = r#"use ermvc::prelude::*;

mod controllers;
mod middleware;{{models_mod}}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ermvc::init_tracing();

    let profile = std::env::var("ERMVC_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config = MvcConfig::load(&profile)?;{{database_setup}}

    let app = MvcApp::builder(config)
        .controllers(controllers::registry())
        .route("/", get(controllers::home_controller::index)){{database_builder}}
        .build()?;

    for (method, path) in app.convention_routes() {
        tracing::info!(%method, %path, "Route");
    }

    app.serve().await?;
    Ok(())
}
"#;

const CONTROLLERS_MOD_RS: &str = r#"//! Controllers. `ermvc generate controller` adds new entries above the markers.

use ermvc::prelude::*;

{{home_mod}}{{controllers_marker}}

pub fn registry() -> Controllers {
    Controllers::new()
{{home_entry}}        {{registry_marker}}
}
"#;

const HOME_CONTROLLER_RS: &str = r#"use ermvc::prelude::*;

/// GET /homes, also mounted at `/`.
pub async fn index(State(ctx): State<AppContext>) -> Result<Html<String>, HttpError> {
    ctx.render("index", json!({ "title": "Welcome" }))
}

pub fn handlers() -> HandlerSet<Action> {
    HandlerSet::new().index(ActionHandler::new(index))
}
"#;

const MIDDLEWARE_MOD_RS: &str = "pub mod auth;\n";

const MIDDLEWARE_AUTH_RS: &str = r#"//! Bearer-token guard for protected routes.
//!
//! ```ignore
//! .route("/me", get(me).route_layer(ermvc::axum::middleware::from_fn_with_state(
//!     TokenService::from_config(&config)?,
//!     authenticate,
//! )))
//! ```

#[allow(unused_imports)]
pub use ermvc::ermvc_security::{authenticate, AuthenticatedUser, TokenService};
"#;

const MODELS_MOD_RS: &str = "//! Database models. `ermvc generate model` appends new modules here.\n";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="/css/style.css">
</head>
<body>
  <main>
    <h1>{{ title }}</h1>
    <p>Your ermvc application is running.</p>
    <p>Generate a resource with <code>ermvc generate resource post</code>.</p>
  </main>
</body>
</html>
"#;

const STYLE_CSS: &str = r#"*,
*::before,
*::after {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  line-height: 1.5;
  color: #1f2933;
  background: #f5f7fa;
}

main {
  max-width: 48rem;
  margin: 4rem auto;
  padding: 0 1.5rem;
}

code {
  padding: 0.1rem 0.3rem;
  background: #e4e7eb;
  border-radius: 3px;
}
"#;

const APPLICATION_YAML: &str = r#"app:
  name: "{{name}}"
  port: 3000

session:
  max_age: 86400

jwt:
  secret: "${JWT_SECRET:change-me-in-production}"
  ttl: 3600

cors:
  origins: []
{{database_yaml}}"#;

const DATABASE_YAML: &str = r#"
database:
  url: "${DATABASE_URL:sqlite://{{name}}.db?mode=rwc}"
  max_connections: 5
"#;

const ENV_EXAMPLE: &str = r#"ERMVC_PROFILE=development
PORT=3000
JWT_SECRET=change-me-in-production
RUST_LOG=info,tower_http=debug
{{database_env}}"#;

const GITIGNORE: &str = "/target\n.env\n*.db\n";

pub fn cargo_toml(name: &str, version: &str, with_database: bool) -> String {
    let (features, extra_deps) = if with_database {
        (
            r#", features = ["database"]"#,
            "\nsqlx = { version = \"0.8\", features = [\"runtime-tokio\", \"any\", \"sqlite\", \"derive\"] }",
        )
    } else {
        ("", "")
    };
    render(
        CARGO_TOML,
        &[
            ("name", name),
            ("version", version),
            ("features", features),
            ("extra_deps", extra_deps),
        ],
    )
}

pub fn main_rs(with_database: bool) -> String {
    let (models_mod, database_setup, database_builder) = if with_database {
        (
            "\nmod models;",
            "\n    let database = Database::from_config(&config).await?;",
            "\n        .database(database)",
        )
    } else {
        ("", "", "")
    };
    render(
        MAIN_RS,
        &[
            ("models_mod", models_mod),
            ("database_setup", database_setup),
            ("database_builder", database_builder),
        ],
    )
}

/// `src/controllers/mod.rs`, optionally with the home controller registered.
pub fn controllers_mod_rs(with_home: bool) -> String {
    let (home_mod, home_entry) = if with_home {
        (
            "pub mod home_controller;\n",
            "        .controller(\"HomeController\", home_controller::handlers())\n",
        )
    } else {
        ("", "")
    };
    render(
        CONTROLLERS_MOD_RS,
        &[
            ("home_mod", home_mod),
            ("home_entry", home_entry),
            ("controllers_marker", CONTROLLERS_MARKER),
            ("registry_marker", REGISTRY_MARKER),
        ],
    )
}

pub fn home_controller_rs() -> &'static str {
    HOME_CONTROLLER_RS
}

pub fn middleware_mod_rs() -> &'static str {
    MIDDLEWARE_MOD_RS
}

pub fn middleware_auth_rs() -> &'static str {
    MIDDLEWARE_AUTH_RS
}

pub fn models_mod_rs() -> &'static str {
    MODELS_MOD_RS
}

pub fn index_html() -> &'static str {
    INDEX_HTML
}

pub fn style_css() -> &'static str {
    STYLE_CSS
}

pub fn application_yaml(name: &str, with_database: bool) -> String {
    let database_yaml = if with_database {
        render(DATABASE_YAML, &[("name", name)])
    } else {
        String::new()
    };
    render(
        APPLICATION_YAML,
        &[("name", name), ("database_yaml", &database_yaml)],
    )
}

pub fn env_example(name: &str, with_database: bool) -> String {
    let database_env = if with_database {
        format!("DATABASE_URL=sqlite://{name}.db?mode=rwc\n")
    } else {
        String::new()
    };
    render(ENV_EXAMPLE, &[("database_env", &database_env)])
}

pub fn gitignore() -> &'static str {
    GITIGNORE
}
