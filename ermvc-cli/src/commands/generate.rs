use colored::Colorize;
use ermvc_core::inflect::{self, pluralize, resource_name, snake_case, to_pascal_case};
use ermvc_core::routing::{route_bindings, HandlerSet};
use std::fs;
use std::path::Path;

use super::templates::{self, resource, CONTROLLERS_MARKER, REGISTRY_MARKER};
use super::{run_tool, CommandResult};

const VIEWS: [&str; 2] = ["index", "show"];
const RESOURCE_VIEWS: [&str; 4] = ["index", "show", "create", "edit"];

/// Every name derived from the user's input for one resource.
///
/// `blog_post`, `BlogPost` and `BlogPostController` all give the same set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// `BlogPost`
    pub model: String,
    /// `blog_post`
    pub snake: String,
    /// `blog post`
    pub lower: String,
    /// `BlogPostController`
    pub controller: String,
    /// `blog_post_controller`
    pub module: String,
    /// `blogposts`: URL segment, as the router derives it
    pub resource: String,
    /// `blog_posts`
    pub table: String,
}

impl ResourceNames {
    pub fn new(input: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let snake = snake_case(input.trim());
        let snake = snake
            .strip_suffix(inflect::CONTROLLER_FILE_SUFFIX)
            .unwrap_or(&snake)
            .to_string();
        if snake.is_empty() {
            return Err(format!("Invalid name '{input}'").into());
        }
        let model = to_pascal_case(&snake);
        let controller = format!("{model}{}", inflect::CONTROLLER_SUFFIX);
        let resource = resource_name(&controller)?;
        Ok(Self {
            lower: snake.replace('_', " "),
            module: format!("{snake}{}", inflect::CONTROLLER_FILE_SUFFIX),
            table: pluralize(&snake),
            model,
            snake,
            controller,
            resource,
        })
    }
}

/// A `name:Type` pair from `--field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub rust_type: String,
    pub is_optional: bool,
}

/// Parse `name:Type` field specs. `Option<T>` marks a nullable column.
pub fn parse_fields(specs: &[String]) -> Result<Vec<Field>, Box<dyn std::error::Error>> {
    specs
        .iter()
        .map(|spec| {
            let (name, rust_type) = spec
                .split_once(':')
                .map(|(n, t)| (n.trim(), t.trim()))
                .filter(|(n, t)| !n.is_empty() && !t.is_empty())
                .ok_or_else(|| format!("Invalid field format '{spec}' (expected name:Type)"))?;
            Ok(Field {
                name: snake_case(name),
                rust_type: rust_type.to_string(),
                is_optional: rust_type.starts_with("Option<") && rust_type.ends_with('>'),
            })
        })
        .collect()
}

/// SQL column type for a Rust field type. Unknown types map to `TEXT`.
pub fn rust_type_to_sql(rust_type: &str) -> &'static str {
    let inner = rust_type
        .strip_prefix("Option<")
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(rust_type)
        .trim();
    match inner {
        "String" | "&str" => "TEXT",
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "isize" | "usize" => {
            "INTEGER"
        }
        "f32" | "f64" => "REAL",
        "bool" => "BOOLEAN",
        _ => "TEXT",
    }
}

pub struct ModelOptions {
    pub fields: Vec<String>,
    pub skip_migrate: bool,
}

pub struct ControllerOptions {
    pub views: bool,
}

#[derive(Default)]
pub struct ResourceOptions {
    pub fields: Vec<String>,
    pub skip_model: bool,
    pub skip_controller: bool,
    pub skip_views: bool,
    pub skip_migrate: bool,
    pub api_only: bool,
}

/// `ermvc generate model <name>`: model struct plus a create-table migration.
pub fn model(root: &Path, name: &str, opts: &ModelOptions) -> CommandResult {
    let names = ResourceNames::new(name)?;
    let fields = parse_fields(&opts.fields)?;

    if !root.join("migrations").is_dir() {
        return Err(
            "migrations/ not found. Create the project with `ermvc init --with-database` first"
                .into(),
        );
    }

    let model_path = root.join("src/models").join(format!("{}.rs", names.snake));
    if model_path.exists() {
        return Err(format!("Model file '{}' already exists", model_path.display()).into());
    }

    write_model(root, &names, &fields)?;

    if !opts.skip_migrate {
        migrate(root);
    }

    println!(
        "\n{} Model {} created successfully!",
        "✓".green(),
        names.model.green()
    );
    Ok(())
}

/// `ermvc generate controller <name>`: the five action handlers, registry
/// entry and (unless disabled) `index` / `show` views.
pub fn controller(root: &Path, name: &str, opts: &ControllerOptions) -> CommandResult {
    let names = ResourceNames::new(name)?;
    let path = controller_path(root, &names);

    if path.exists() {
        return Err(format!("Controller file '{}' already exists", path.display()).into());
    }

    write_controller(root, &names, &resource::controller_rs(&names, false))?;

    if opts.views {
        write_views(root, &names, &VIEWS)?;
    }

    println!(
        "\n{} Controller {} created successfully!\n",
        "✓".green(),
        names.controller.green()
    );
    print_routes(&names);
    Ok(())
}

/// `ermvc generate resource <name>`: model, controller and views in one go.
///
/// Unlike the single generators, existing files are skipped rather than
/// treated as errors.
pub fn resource(root: &Path, name: &str, opts: &ResourceOptions) -> CommandResult {
    let names = ResourceNames::new(name)?;
    let fields = parse_fields(&opts.fields)?;

    println!("{} Generating resource: {}\n", "->".blue(), names.model.green());

    let mut created_model = false;
    if !opts.skip_model {
        let model_path = root.join("src/models").join(format!("{}.rs", names.snake));
        if !root.join("migrations").is_dir() {
            println!(
                "{} Skipping model (no migrations/ directory; create the project with --with-database)",
                "-".dimmed()
            );
        } else if model_path.exists() {
            println!(
                "{} Model {} already exists, skipping",
                "-".dimmed(),
                names.model
            );
        } else {
            write_model(root, &names, &fields)?;
            created_model = true;
            if !opts.skip_migrate {
                migrate(root);
            }
        }
    }

    let mut created_controller = false;
    if !opts.skip_controller {
        let path = controller_path(root, &names);
        if path.exists() {
            println!(
                "{} Controller {} already exists, skipping",
                "-".dimmed(),
                path.display()
            );
        } else {
            let content = if opts.api_only {
                resource::api_controller_rs(&names)
            } else {
                resource::controller_rs(&names, true)
            };
            write_controller(root, &names, &content)?;
            created_controller = true;
        }
    }

    if !opts.skip_views && !opts.api_only {
        write_views(root, &names, &RESOURCE_VIEWS)?;
    }

    println!(
        "\n{} Resource {} created successfully!\n",
        "✓".green(),
        names.model.green()
    );
    print_routes(&names);

    println!("\n{}", "Next steps:".bold());
    let mut step = 1;
    if created_controller && !opts.api_only {
        println!("  {step}. Mount the form pages in src/main.rs:");
        println!(
            "       .route(\"/{r}/create\", get(controllers::{m}::create))",
            r = names.resource,
            m = names.module
        );
        println!(
            "       .route(\"/{r}/{{id}}/edit\", get(controllers::{m}::edit))",
            r = names.resource,
            m = names.module
        );
        step += 1;
    }
    if created_model {
        println!(
            "  {step}. Add your columns to src/models/{}.rs and its migration",
            names.snake
        );
        step += 1;
    }
    println!("  {step}. cargo run");
    Ok(())
}

fn controller_path(root: &Path, names: &ResourceNames) -> std::path::PathBuf {
    root.join("src/controllers")
        .join(format!("{}.rs", names.module))
}

fn write_model(root: &Path, names: &ResourceNames, fields: &[Field]) -> CommandResult {
    let models_dir = root.join("src/models");
    fs::create_dir_all(&models_dir)?;

    let model_path = models_dir.join(format!("{}.rs", names.snake));
    fs::write(&model_path, resource::model_rs(names, fields))?;
    println!(
        "{} Generated model: {}",
        "✓".green(),
        model_path.display().to_string().cyan()
    );

    let mod_path = models_dir.join("mod.rs");
    let existing = if mod_path.exists() {
        fs::read_to_string(&mod_path)?
    } else {
        templates::project::models_mod_rs().to_string()
    };
    let mod_line = format!("pub mod {};\n", names.snake);
    if !existing.lines().any(|l| l.trim() == mod_line.trim()) {
        fs::write(&mod_path, format!("{existing}{mod_line}"))?;
        println!("{} Updated src/models/mod.rs", "✓".green());
    }

    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let migration_path = root
        .join("migrations")
        .join(format!("{timestamp}_create_{}.sql", names.table));
    fs::write(&migration_path, resource::migration_sql(names, fields))?;
    println!(
        "{} Generated migration: {}",
        "✓".green(),
        migration_path.display().to_string().cyan()
    );
    Ok(())
}

fn write_controller(root: &Path, names: &ResourceNames, content: &str) -> CommandResult {
    let controllers_dir = root.join("src/controllers");
    fs::create_dir_all(&controllers_dir)?;

    let path = controllers_dir.join(format!("{}.rs", names.module));
    fs::write(&path, content)?;
    println!(
        "{} Generated controller: {}",
        "✓".green(),
        path.display().to_string().cyan()
    );

    register_controller(&controllers_dir.join("mod.rs"), names)
}

/// Declare the module and add the registry entry in `src/controllers/mod.rs`.
fn register_controller(mod_path: &Path, names: &ResourceNames) -> CommandResult {
    let mod_line = resource::controller_mod_line(names);
    let registry_line = resource::registry_line(names);

    if !mod_path.exists() {
        fs::write(mod_path, templates::project::controllers_mod_rs(false))?;
    }

    let existing = fs::read_to_string(mod_path)?;
    let updated = templates::insert_before_marker(&existing, CONTROLLERS_MARKER, &mod_line)
        .and_then(|content| {
            templates::insert_before_marker(&content, REGISTRY_MARKER, &registry_line)
        });

    match updated {
        Some(content) => {
            if content != existing {
                fs::write(mod_path, content)?;
                println!("{} Updated src/controllers/mod.rs", "✓".green());
            }
        }
        None => {
            println!(
                "{} src/controllers/mod.rs has no ermvc markers; add these lines yourself:\n    {}\n    {}",
                "!".yellow(),
                mod_line,
                registry_line
            );
        }
    }
    Ok(())
}

fn write_views(root: &Path, names: &ResourceNames, views: &[&str]) -> CommandResult {
    let views_dir = root.join("src/views").join(&names.resource);
    fs::create_dir_all(&views_dir)?;

    for view in views {
        let path = views_dir.join(format!("{view}.html"));
        if path.exists() {
            println!("{} View {view}.html already exists, skipping", "-".dimmed());
            continue;
        }
        fs::write(&path, resource::view_html(names, view))?;
    }
    println!(
        "{} Generated views in {}",
        "✓".green(),
        views_dir.display().to_string().cyan()
    );
    Ok(())
}

fn migrate(root: &Path) {
    println!("\n{} Running migrations...", "->".blue());
    if !run_tool(root, "sqlx", &["migrate", "run"]) {
        eprintln!(
            "{} Migration failed. Run `sqlx migrate run` manually (cargo install sqlx-cli).",
            "!".yellow()
        );
    }
}

/// Print the bindings the router will compute for this controller.
fn print_routes(names: &ResourceNames) {
    let handlers = resource_actions();
    println!("{}", "Routes:".bold());
    for binding in route_bindings(&format!("/{}", names.resource), &handlers) {
        println!(
            "  {:<7} {:<24} -> {}",
            binding.method.as_str(),
            binding.path,
            binding.handler
        );
    }
}

fn resource_actions() -> HandlerSet<&'static str> {
    HandlerSet::new()
        .index("index")
        .show("show")
        .store("store")
        .update("update")
        .destroy("destroy")
}
