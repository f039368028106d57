use ermvc_cli::commands::generate::{
    self, parse_fields, rust_type_to_sql, ControllerOptions, ModelOptions, ResourceNames,
    ResourceOptions,
};
use ermvc_cli::commands::init::{self, InitOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn project(with_database: bool) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("app");
    init::run(
        &root,
        &InitOptions {
            skip_install: true,
            with_database,
        },
    )
    .unwrap();
    (tmp, root)
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

// ── Names ───────────────────────────────────────────────────────────

#[test]
fn names_from_plain_input() {
    let names = ResourceNames::new("user").unwrap();
    assert_eq!(names.model, "User");
    assert_eq!(names.snake, "user");
    assert_eq!(names.controller, "UserController");
    assert_eq!(names.module, "user_controller");
    assert_eq!(names.resource, "users");
    assert_eq!(names.table, "users");
}

#[test]
fn names_accept_controller_suffix() {
    assert_eq!(
        ResourceNames::new("UserController").unwrap(),
        ResourceNames::new("user").unwrap()
    );
    assert_eq!(
        ResourceNames::new("user_controller").unwrap(),
        ResourceNames::new("user").unwrap()
    );
}

#[test]
fn names_multi_word() {
    let names = ResourceNames::new("BlogPost").unwrap();
    assert_eq!(names.snake, "blog_post");
    assert_eq!(names.lower, "blog post");
    assert_eq!(names.module, "blog_post_controller");
    assert_eq!(names.resource, "blogposts");
    assert_eq!(names.table, "blog_posts");
}

#[test]
fn names_use_irregular_plurals() {
    let names = ResourceNames::new("person").unwrap();
    assert_eq!(names.resource, "people");
    assert_eq!(names.table, "people");
}

#[test]
fn names_reject_empty() {
    assert!(ResourceNames::new("   ").is_err());
}

// ── Field parsing ───────────────────────────────────────────────────

#[test]
fn parse_field_string() {
    let fields = parse_fields(&["name:String".into()]).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "name");
    assert_eq!(fields[0].rust_type, "String");
    assert!(!fields[0].is_optional);
}

#[test]
fn parse_field_optional() {
    let fields = parse_fields(&["email:Option<String>".into()]).unwrap();
    assert_eq!(fields[0].rust_type, "Option<String>");
    assert!(fields[0].is_optional);
}

#[test]
fn parse_multiple_fields_keeps_order() {
    let fields = parse_fields(&["name:String".into(), "age:i64".into()]).unwrap();
    assert_eq!(fields[0].name, "name");
    assert_eq!(fields[1].name, "age");
}

#[test]
fn parse_field_invalid_format() {
    for bad in ["name", "name:", ":String"] {
        let err = parse_fields(&[bad.to_string()]).unwrap_err().to_string();
        assert!(err.contains("Invalid field format"), "{bad}: {err}");
    }
}

#[test]
fn parse_field_empty_input() {
    assert!(parse_fields(&[]).unwrap().is_empty());
}

// ── SQL type mapping ────────────────────────────────────────────────

#[test]
fn sql_types() {
    assert_eq!(rust_type_to_sql("String"), "TEXT");
    assert_eq!(rust_type_to_sql("&str"), "TEXT");
    assert_eq!(rust_type_to_sql("i32"), "INTEGER");
    assert_eq!(rust_type_to_sql("u64"), "INTEGER");
    assert_eq!(rust_type_to_sql("f64"), "REAL");
    assert_eq!(rust_type_to_sql("bool"), "BOOLEAN");
    assert_eq!(rust_type_to_sql("Option<i64>"), "INTEGER");
    assert_eq!(rust_type_to_sql("Uuid"), "TEXT");
}

// ── generate controller ─────────────────────────────────────────────

#[test]
fn controller_writes_file_views_and_registration() {
    let (_tmp, root) = project(false);

    generate::controller(&root, "user", &ControllerOptions { views: true }).unwrap();

    let code = read(&root, "src/controllers/user_controller.rs");
    assert!(code.contains("pub async fn index("));
    assert!(code.contains("pub async fn destroy("));

    let mod_rs = read(&root, "src/controllers/mod.rs");
    assert!(mod_rs.contains("pub mod home_controller;\npub mod user_controller;\n// ermvc:controllers"));
    assert!(mod_rs.contains(".controller(\"UserController\", user_controller::handlers())"));
    let entry = mod_rs.find("UserController").unwrap();
    let marker = mod_rs.find("// ermvc:registry").unwrap();
    assert!(entry < marker);

    assert!(root.join("src/views/users/index.html").is_file());
    assert!(root.join("src/views/users/show.html").is_file());
    assert!(!root.join("src/views/users/create.html").exists());
}

#[test]
fn controller_without_views() {
    let (_tmp, root) = project(false);

    generate::controller(&root, "Post", &ControllerOptions { views: false }).unwrap();

    assert!(root.join("src/controllers/post_controller.rs").is_file());
    assert!(!root.join("src/views/posts").exists());
}

#[test]
fn controller_already_exists_fails() {
    let (_tmp, root) = project(false);

    generate::controller(&root, "user", &ControllerOptions { views: false }).unwrap();
    let err = generate::controller(&root, "user", &ControllerOptions { views: false })
        .unwrap_err()
        .to_string();
    assert!(err.contains("already exists"));

    let mod_rs = read(&root, "src/controllers/mod.rs");
    assert_eq!(mod_rs.matches("pub mod user_controller;").count(), 1);
}

#[test]
fn controller_outside_project_creates_registry() {
    let tmp = TempDir::new().unwrap();

    generate::controller(tmp.path(), "user", &ControllerOptions { views: false }).unwrap();

    let mod_rs = read(tmp.path(), "src/controllers/mod.rs");
    assert!(mod_rs.contains("pub mod user_controller;"));
    assert!(!mod_rs.contains("home_controller"));
}

#[test]
fn controller_with_markerless_mod_rs_leaves_it_alone() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("src/controllers")).unwrap();
    fs::write(tmp.path().join("src/controllers/mod.rs"), "pub mod legacy;\n").unwrap();

    generate::controller(tmp.path(), "user", &ControllerOptions { views: false }).unwrap();

    assert_eq!(read(tmp.path(), "src/controllers/mod.rs"), "pub mod legacy;\n");
    assert!(tmp.path().join("src/controllers/user_controller.rs").is_file());
}

// ── generate model ──────────────────────────────────────────────────

#[test]
fn model_requires_migrations_dir() {
    let (_tmp, root) = project(false);
    let err = generate::model(
        &root,
        "user",
        &ModelOptions {
            fields: vec![],
            skip_migrate: true,
        },
    )
    .unwrap_err()
    .to_string();
    assert!(err.contains("migrations/"));
}

#[test]
fn model_writes_struct_module_and_migration() {
    let (_tmp, root) = project(true);

    generate::model(
        &root,
        "user",
        &ModelOptions {
            fields: vec!["email:String".into(), "bio:Option<String>".into()],
            skip_migrate: true,
        },
    )
    .unwrap();

    let model = read(&root, "src/models/user.rs");
    assert!(model.contains("pub struct User {"));
    assert!(model.contains("pub email: String,"));

    let mod_rs = read(&root, "src/models/mod.rs");
    assert!(mod_rs.contains("pub mod user;"));

    let migrations: Vec<String> = fs::read_dir(root.join("migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(migrations.len(), 1);
    assert!(migrations[0].ends_with("_create_users.sql"));
    let sql = read(&root, &format!("migrations/{}", migrations[0]));
    assert!(sql.contains("email TEXT NOT NULL"));
    assert!(sql.contains("bio TEXT,"));
}

#[test]
fn model_already_exists_fails() {
    let (_tmp, root) = project(true);
    let opts = ModelOptions {
        fields: vec![],
        skip_migrate: true,
    };

    generate::model(&root, "user", &opts).unwrap();
    let err = generate::model(&root, "user", &opts).unwrap_err().to_string();
    assert!(err.contains("already exists"));
}

#[test]
fn model_rejects_bad_fields_before_writing() {
    let (_tmp, root) = project(true);

    let result = generate::model(
        &root,
        "user",
        &ModelOptions {
            fields: vec!["broken".into()],
            skip_migrate: true,
        },
    );
    assert!(result.is_err());
    assert!(!root.join("src/models/user.rs").exists());
}

// ── generate resource ───────────────────────────────────────────────

#[test]
fn resource_generates_everything() {
    let (_tmp, root) = project(true);

    generate::resource(
        &root,
        "post",
        &ResourceOptions {
            fields: vec!["title:String".into()],
            skip_migrate: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(root.join("src/models/post.rs").is_file());
    let code = read(&root, "src/controllers/post_controller.rs");
    assert!(code.contains("pub async fn create("));
    assert!(code.contains("pub async fn edit("));
    for view in ["index", "show", "create", "edit"] {
        assert!(root.join(format!("src/views/posts/{view}.html")).is_file());
    }
    assert!(read(&root, "src/controllers/mod.rs").contains("post_controller::handlers()"));
}

#[test]
fn resource_without_migrations_skips_model() {
    let (_tmp, root) = project(false);

    generate::resource(
        &root,
        "post",
        &ResourceOptions {
            skip_migrate: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(!root.join("src/models/post.rs").exists());
    assert!(root.join("src/controllers/post_controller.rs").is_file());
}

#[test]
fn resource_api_only_has_no_views() {
    let (_tmp, root) = project(false);

    generate::resource(
        &root,
        "post",
        &ResourceOptions {
            api_only: true,
            ..Default::default()
        },
    )
    .unwrap();

    let code = read(&root, "src/controllers/post_controller.rs");
    assert!(code.contains("Json<Value>"));
    assert!(!root.join("src/views/posts").exists());
}

#[test]
fn resource_skips_existing_files() {
    let (_tmp, root) = project(false);
    let views = root.join("src/views/posts");
    fs::create_dir_all(&views).unwrap();
    fs::write(views.join("index.html"), "custom").unwrap();
    fs::create_dir_all(root.join("src/controllers")).unwrap();
    fs::write(root.join("src/controllers/post_controller.rs"), "// mine").unwrap();

    generate::resource(&root, "post", &ResourceOptions::default()).unwrap();

    assert_eq!(read(&root, "src/views/posts/index.html"), "custom");
    assert_eq!(read(&root, "src/controllers/post_controller.rs"), "// mine");
    assert!(views.join("edit.html").is_file());
}

#[test]
fn resource_skip_flags() {
    let (_tmp, root) = project(true);

    generate::resource(
        &root,
        "post",
        &ResourceOptions {
            skip_model: true,
            skip_controller: true,
            skip_views: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(!root.join("src/models/post.rs").exists());
    assert!(!root.join("src/controllers/post_controller.rs").exists());
    assert!(!root.join("src/views/posts").exists());
}
