use colored::Colorize;
use std::fs;
use std::path::Path;

use super::templates::project;
use super::{run_tool, CommandResult};

/// Flags of `ermvc init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub skip_install: bool,
    pub with_database: bool,
}

/// Scaffold a new application in `dir`.
///
/// `dir` is created when missing. An existing `Cargo.toml` aborts the
/// command before anything is written.
pub fn run(dir: &Path, opts: &InitOptions) -> CommandResult {
    if dir.join("Cargo.toml").exists() {
        return Err(format!("'{}' already contains a Cargo.toml", dir.display()).into());
    }

    fs::create_dir_all(dir)?;
    let name = package_name(dir)?;

    println!(
        "{} Creating new ermvc application {} in {}",
        "->".blue(),
        name.green(),
        dir.display()
    );

    let mut files: Vec<(&str, String)> = vec![
        (
            "Cargo.toml",
            project::cargo_toml(&name, env!("CARGO_PKG_VERSION"), opts.with_database),
        ),
        ("src/main.rs", project::main_rs(opts.with_database)),
        ("src/controllers/mod.rs", project::controllers_mod_rs(true)),
        (
            "src/controllers/home_controller.rs",
            project::home_controller_rs().to_string(),
        ),
        ("src/middleware/mod.rs", project::middleware_mod_rs().to_string()),
        ("src/middleware/auth.rs", project::middleware_auth_rs().to_string()),
        ("src/views/index.html", project::index_html().to_string()),
        ("public/css/style.css", project::style_css().to_string()),
        (
            "application.yaml",
            project::application_yaml(&name, opts.with_database),
        ),
        (".env.example", project::env_example(&name, opts.with_database)),
        (".gitignore", project::gitignore().to_string()),
    ];
    if opts.with_database {
        files.push(("src/models/mod.rs", project::models_mod_rs().to_string()));
    }

    for (relative, content) in &files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        println!("  {} {}", "✓".green(), relative);
    }

    if opts.with_database {
        fs::create_dir_all(dir.join("migrations"))?;
        println!("  {} migrations/", "✓".green());
    }

    println!(
        "\n{} Application {} created successfully!",
        "✓".green(),
        name.green()
    );

    if !opts.skip_install {
        println!("\n{} Fetching dependencies...", "->".blue());
        if !run_tool(dir, "cargo", &["fetch"]) {
            eprintln!(
                "{} Failed to fetch dependencies. Run 'cargo fetch' in the project manually.",
                "!".yellow()
            );
        }
    }

    println!("\n{}", "Next steps:".bold());
    println!("  cd {}", dir.display());
    println!("  cp .env.example .env");
    println!("  cargo run");
    println!();
    println!("  Your app will be at {}", "http://localhost:3000".cyan());

    if !opts.with_database {
        println!("\n{}", "To add database support later:".bold());
        println!("  enable the \"database\" feature of ermvc in Cargo.toml");
        println!("  set database.url in application.yaml (or DATABASE_URL in .env)");
        println!("  mkdir migrations && ermvc generate model <name>");
    }

    Ok(())
}

/// Cargo package name for the project in `dir`: its base name, lower-cased,
/// with anything outside `[a-z0-9_-]` turned into `-`.
pub fn package_name(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let resolved = dir.canonicalize()?;
    let base = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("Cannot derive a project name from '{}'", dir.display()))?;

    let name: String = base
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let name = name.trim_matches('-').to_string();

    match name.chars().next() {
        None => Err(format!("Cannot derive a project name from '{}'", dir.display()).into()),
        Some(first) if first.is_ascii_digit() => Ok(format!("app-{name}")),
        Some(_) => Ok(name),
    }
}
