use super::super::generate::{rust_type_to_sql, Field, ResourceNames};
use super::render;

const MODEL_RS: &str = r#"use serde::{Deserialize, Serialize};

/// Row of the `{{table}}` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct {{model}} {
    pub id: i64,
{{fields}}}

impl {{model}} {
    pub const TABLE: &'static str = "{{table}}";
}
"#;

const MIGRATION_SQL: &str = r#"CREATE TABLE IF NOT EXISTS {{table}} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
{{columns}}    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

const CONTROLLER_RS: &str = r#"use std::collections::HashMap;

use ermvc::prelude::*;

/// GET /{{resource}}
pub async fn index(State(ctx): State<AppContext>) -> Result<Html<String>, HttpError> {
    ctx.render("{{resource}}/index", json!({ "title": "{{model}} List" }))
}

/// GET /{{resource}}/{id}
pub async fn show(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, HttpError> {
    ctx.render("{{resource}}/show", json!({ "title": "{{model}} Details", "id": id }))
}

/// POST /{{resource}}
pub async fn store(Form(input): Form<HashMap<String, String>>) -> Redirect {
    tracing::info!(fields = input.len(), "Creating {{lower}}");
    Redirect::to("/{{resource}}")
}

/// PUT /{{resource}}/{id}
pub async fn update(
    Path(id): Path<String>,
    Form(input): Form<HashMap<String, String>>,
) -> Redirect {
    tracing::info!(%id, fields = input.len(), "Updating {{lower}}");
    Redirect::to(&format!("/{{resource}}/{id}"))
}

/// DELETE /{{resource}}/{id}
pub async fn destroy(Path(id): Path<String>) -> StatusCode {
    tracing::info!(%id, "Deleting {{lower}}");
    StatusCode::NO_CONTENT
}
{{form_handlers}}
pub fn handlers() -> HandlerSet<Action> {
    HandlerSet::new()
        .index(ActionHandler::new(index))
        .show(ActionHandler::new(show))
        .store(ActionHandler::new(store))
        .update(ActionHandler::new(update))
        .destroy(ActionHandler::new(destroy))
}
"#;

const FORM_HANDLERS_RS: &str = r#"
/// GET /{{resource}}/create
pub async fn create(State(ctx): State<AppContext>) -> Result<Html<String>, HttpError> {
    ctx.render("{{resource}}/create", json!({ "title": "Create {{model}}" }))
}

/// GET /{{resource}}/{id}/edit
pub async fn edit(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, HttpError> {
    ctx.render("{{resource}}/edit", json!({ "title": "Edit {{model}}", "id": id }))
}
"#;

const API_CONTROLLER_RS: &str = r#"use ermvc::prelude::*;
use serde_json::Value;

/// GET /{{resource}}
pub async fn index() -> Json<Value> {
    Json(json!({ "data": [] }))
}

/// GET /{{resource}}/{id}
pub async fn show(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "data": { "id": id } }))
}

/// POST /{{resource}}
pub async fn store(Json(input): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "data": input })))
}

/// PUT /{{resource}}/{id}
pub async fn update(Path(id): Path<String>, Json(input): Json<Value>) -> Json<Value> {
    Json(json!({ "data": { "id": id, "changes": input } }))
}

/// DELETE /{{resource}}/{id}
pub async fn destroy(Path(id): Path<String>) -> StatusCode {
    tracing::info!(%id, "Deleting {{lower}}");
    StatusCode::NO_CONTENT
}

pub fn handlers() -> HandlerSet<Action> {
    HandlerSet::new()
        .index(ActionHandler::new(index))
        .show(ActionHandler::new(show))
        .store(ActionHandler::new(store))
        .update(ActionHandler::new(update))
        .destroy(ActionHandler::new(destroy))
}
"#;

const VIEW_LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="/css/style.css">
</head>
<body>
  <main>
    <h1>{{ title }}</h1>
{{body}}
  </main>
</body>
</html>
"#;

const INDEX_BODY: &str = r#"    <p><a href="/{{resource}}/create">New {{lower}}</a></p>
    <ul id="{{resource}}"></ul>"#;

const SHOW_BODY: &str = r#"    <p>{{model}} #{{ id }}</p>
    <p><a href="/{{resource}}/{{ id }}/edit">Edit</a> | <a href="/{{resource}}">Back</a></p>"#;

const CREATE_BODY: &str = r#"    <form method="post" action="/{{resource}}">
      <button type="submit">Create {{lower}}</button>
    </form>
    <p><a href="/{{resource}}">Back</a></p>"#;

const EDIT_BODY: &str = r#"    <form method="post" action="/{{resource}}/{{ id }}">
      <input type="hidden" name="_method" value="PUT">
      <button type="submit">Save</button>
    </form>
    <p><a href="/{{resource}}/{{ id }}">Back</a></p>"#;

fn vars(names: &ResourceNames) -> [(&str, &str); 4] {
    [
        ("model", names.model.as_str()),
        ("lower", names.lower.as_str()),
        ("resource", names.resource.as_str()),
        ("table", names.table.as_str()),
    ]
}

pub fn model_rs(names: &ResourceNames, fields: &[Field]) -> String {
    let fields: String = fields
        .iter()
        .map(|f| format!("    pub {}: {},\n", f.name, f.rust_type))
        .collect();
    let mut all = vars(names).to_vec();
    all.push(("fields", &fields));
    render(MODEL_RS, &all)
}

pub fn migration_sql(names: &ResourceNames, fields: &[Field]) -> String {
    let columns: String = fields
        .iter()
        .map(|f| {
            let null = if f.is_optional { "" } else { " NOT NULL" };
            format!("    {} {}{null},\n", f.name, rust_type_to_sql(&f.rust_type))
        })
        .collect();
    let mut all = vars(names).to_vec();
    all.push(("columns", &columns));
    render(MIGRATION_SQL, &all)
}

/// HTML controller; `with_forms` adds the `create` / `edit` form handlers.
pub fn controller_rs(names: &ResourceNames, with_forms: bool) -> String {
    let form_handlers = if with_forms {
        render(FORM_HANDLERS_RS, &vars(names))
    } else {
        String::new()
    };
    let mut all = vars(names).to_vec();
    all.push(("form_handlers", &form_handlers));
    render(CONTROLLER_RS, &all)
}

pub fn api_controller_rs(names: &ResourceNames) -> String {
    render(API_CONTROLLER_RS, &vars(names))
}

/// View file for `view` (`index`, `show`, `create` or `edit`).
pub fn view_html(names: &ResourceNames, view: &str) -> String {
    let body = match view {
        "show" => SHOW_BODY,
        "create" => CREATE_BODY,
        "edit" => EDIT_BODY,
        _ => INDEX_BODY,
    };
    let body = render(body, &vars(names));
    render(VIEW_LAYOUT_HTML, &[("body", &body)])
}

/// Line declaring the controller module in `src/controllers/mod.rs`.
pub fn controller_mod_line(names: &ResourceNames) -> String {
    format!("pub mod {};", names.module)
}

/// Line adding the controller to the registry in `src/controllers/mod.rs`.
pub fn registry_line(names: &ResourceNames) -> String {
    format!(
        ".controller(\"{}\", {}::handlers())",
        names.controller, names.module
    )
}
