use ermvc_cli::commands::generate::{parse_fields, ResourceNames};
use ermvc_cli::commands::templates::{
    insert_before_marker, project, render, resource, CONTROLLERS_MARKER, REGISTRY_MARKER,
};

// ── render ──────────────────────────────────────────────────────────

#[test]
fn render_replaces_placeholders() {
    assert_eq!(
        render("Hello {{name}}, v{{version}}", &[("name", "app"), ("version", "1")]),
        "Hello app, v1"
    );
}

#[test]
fn render_leaves_spaced_placeholders_for_views() {
    assert_eq!(
        render("<h1>{{ title }}</h1>{{title}}", &[("title", "X")]),
        "<h1>{{ title }}</h1>X"
    );
}

#[test]
fn render_unknown_keys_untouched() {
    assert_eq!(render("{{missing}}", &[("other", "x")]), "{{missing}}");
}

// ── insert_before_marker ────────────────────────────────────────────

#[test]
fn inserts_with_marker_indentation() {
    let content = "fn f() {\n    a()\n    // mark\n}\n";
    let updated = insert_before_marker(content, "// mark", ".b()").unwrap();
    assert_eq!(updated, "fn f() {\n    a()\n    .b()\n    // mark\n}\n");
}

#[test]
fn insert_is_idempotent() {
    let content = "pub mod a;\n// mark\n";
    let once = insert_before_marker(content, "// mark", "pub mod b;").unwrap();
    let twice = insert_before_marker(&once, "// mark", "pub mod b;").unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.matches("pub mod b;").count(), 1);
}

#[test]
fn insert_without_marker_is_none() {
    assert!(insert_before_marker("pub mod a;\n", "// mark", "pub mod b;").is_none());
}

// ── project templates ───────────────────────────────────────────────

#[test]
fn cargo_toml_without_database() {
    let cargo = project::cargo_toml("blog", "0.1.1", false);
    assert!(cargo.contains("name = \"blog\""));
    assert!(cargo.contains("ermvc = { version = \"0.1.1\" }"));
    assert!(!cargo.contains("sqlx"));
    assert!(!cargo.contains("{{"));
}

#[test]
fn cargo_toml_with_database() {
    let cargo = project::cargo_toml("blog", "0.1.1", true);
    assert!(cargo.contains("features = [\"database\"]"));
    assert!(cargo.contains("sqlx"));
}

#[test]
fn main_rs_wires_database_only_when_asked() {
    let plain = project::main_rs(false);
    assert!(plain.contains("controllers::registry()"));
    assert!(plain.contains(".route(\"/\""));
    assert!(!plain.contains("Database"));
    assert!(!plain.contains("mod models;"));

    let with_db = project::main_rs(true);
    assert!(with_db.contains("Database::from_config(&config).await?"));
    assert!(with_db.contains(".database(database)"));
    assert!(with_db.contains("mod models;"));
}

#[test]
fn controllers_mod_has_both_markers() {
    let with_home = project::controllers_mod_rs(true);
    assert!(with_home.contains(CONTROLLERS_MARKER));
    assert!(with_home.contains(REGISTRY_MARKER));
    assert!(with_home.contains("pub mod home_controller;"));
    assert!(with_home.contains(".controller(\"HomeController\", home_controller::handlers())"));

    let empty = project::controllers_mod_rs(false);
    assert!(empty.contains(CONTROLLERS_MARKER));
    assert!(!empty.contains("home_controller"));
}

#[test]
fn application_yaml_database_section() {
    assert!(!project::application_yaml("blog", false).contains("database:"));
    let yaml = project::application_yaml("blog", true);
    assert!(yaml.contains("database:"));
    assert!(yaml.contains("sqlite://blog.db"));
}

// ── resource templates ──────────────────────────────────────────────

#[test]
fn controller_template_exposes_actions() {
    let names = ResourceNames::new("post").unwrap();
    let code = resource::controller_rs(&names, false);
    for action in ["index", "show", "store", "update", "destroy"] {
        assert!(code.contains(&format!("pub async fn {action}(")), "missing {action}");
    }
    assert!(code.contains("pub fn handlers() -> HandlerSet<Action>"));
    assert!(code.contains("ctx.render(\"posts/index\""));
    assert!(!code.contains("pub async fn create("));
    assert!(!code.contains("{{"));

    let with_forms = resource::controller_rs(&names, true);
    assert!(with_forms.contains("pub async fn create("));
    assert!(with_forms.contains("pub async fn edit("));
}

#[test]
fn api_controller_returns_json() {
    let names = ResourceNames::new("post").unwrap();
    let code = resource::api_controller_rs(&names);
    assert!(code.contains("Json<Value>"));
    assert!(!code.contains("ctx.render"));
}

#[test]
fn views_keep_runtime_placeholders() {
    let names = ResourceNames::new("post").unwrap();
    let show = resource::view_html(&names, "show");
    assert!(show.contains("{{ title }}"));
    assert!(show.contains("{{ id }}"));
    assert!(show.contains("href=\"/posts\""));
    assert!(!show.contains("{{resource}}"));
}

#[test]
fn model_and_migration_from_fields() {
    let names = ResourceNames::new("user").unwrap();
    let fields = parse_fields(&["name:String".into(), "age:Option<i32>".into()]).unwrap();

    let model = resource::model_rs(&names, &fields);
    assert!(model.contains("pub struct User {"));
    assert!(model.contains("    pub name: String,"));
    assert!(model.contains("    pub age: Option<i32>,"));
    assert!(model.contains("sqlx::FromRow"));
    assert!(model.contains("\"users\""));

    let sql = resource::migration_sql(&names, &fields);
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS users ("));
    assert!(sql.contains("    name TEXT NOT NULL,"));
    assert!(sql.contains("    age INTEGER,"));
}

#[test]
fn registry_lines() {
    let names = ResourceNames::new("BlogPost").unwrap();
    assert_eq!(resource::controller_mod_line(&names), "pub mod blog_post_controller;");
    assert_eq!(
        resource::registry_line(&names),
        ".controller(\"BlogPostController\", blog_post_controller::handlers())"
    );
}
