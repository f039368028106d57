use colored::Colorize;
use ermvc_core::discovery::{discover_controllers, ControllerLoader, DiscoveryError, DiscoveryReport};
use ermvc_core::routing::{HandlerSet, RegisteredRoute, RouteTable};
use std::fs;
use std::path::Path;

use super::CommandResult;

/// Where an action handler is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSource {
    pub controller: String,
    pub action: String,
    pub file: String,
    pub line: usize,
}

/// Reads controller sources and picks out the exported action functions.
pub struct SourceLoader;

impl ControllerLoader<ActionSource> for SourceLoader {
    fn load(
        &self,
        controller_name: &str,
        path: &Path,
    ) -> Result<HandlerSet<ActionSource>, DiscoveryError> {
        let content = fs::read_to_string(path).map_err(|e| DiscoveryError::Load {
            controller: controller_name.to_string(),
            reason: e.to_string(),
        })?;
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(parse_actions(&content, controller_name, &file))
    }
}

/// Collect `pub fn` / `pub async fn` definitions whose names are actions.
/// Other public functions (`handlers`, form pages, helpers) are ignored.
pub fn parse_actions(content: &str, controller: &str, file: &str) -> HandlerSet<ActionSource> {
    let mut handlers = HandlerSet::new();
    for (line_num, line) in content.lines().enumerate() {
        if let Some(name) = exported_fn_name(line) {
            handlers.insert_named(
                name,
                ActionSource {
                    controller: controller.to_string(),
                    action: name.to_string(),
                    file: file.to_string(),
                    line: line_num + 1,
                },
            );
        }
    }
    handlers
}

/// Name of the function declared on `line`, if it is a public one.
pub fn exported_fn_name(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("pub async fn ")
        .or_else(|| trimmed.strip_prefix("pub fn "))?;
    let end = rest
        .find(|c: char| c == '(' || c == '<' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Routes for every controller in `dir`, sorted by path then method.
pub fn collect_routes(
    dir: &Path,
) -> Result<(Vec<RegisteredRoute<ActionSource>>, DiscoveryReport), Box<dyn std::error::Error>> {
    let mut table = RouteTable::new();
    let report = discover_controllers(&mut table, dir, &SourceLoader)?;
    let mut routes = table.into_routes();
    routes.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));
    Ok((routes, report))
}

/// `ermvc routes`: print the convention routes of the project at `root`.
pub fn run(root: &Path) -> CommandResult {
    let controllers_dir = root.join("src/controllers");
    if !controllers_dir.is_dir() {
        return Err("src/controllers/ directory not found".into());
    }

    let (routes, report) = collect_routes(&controllers_dir)?;

    for skipped in &report.skipped {
        eprintln!(
            "{} Skipped {}: {}",
            "!".yellow(),
            skipped.file.display(),
            skipped.reason
        );
    }

    if routes.is_empty() {
        println!("{}", "No routes found.".dimmed());
        return Ok(());
    }

    println!("{}", "Convention routes:".bold());
    println!();
    println!(
        "  {:<8} {:<30} {:<30} {}",
        "METHOD".dimmed(),
        "PATH".dimmed(),
        "HANDLER".dimmed(),
        "FILE".dimmed()
    );
    println!("  {}", "-".repeat(84).dimmed());

    for route in &routes {
        let method = route.method.as_str();
        let method_colored = match method {
            "GET" => method.green(),
            "POST" => method.blue(),
            "PUT" => method.yellow(),
            "DELETE" => method.red(),
            _ => method.normal(),
        };
        let handler = format!("{}#{}", route.handler.controller, route.handler.action);

        println!(
            "  {:<8} {:<30} {:<30} {}:{}",
            method_colored, route.path, handler, route.handler.file, route.handler.line,
        );
    }

    println!();
    println!(
        "  {} routes from {} controllers",
        routes.len(),
        report.registered.len()
    );

    Ok(())
}
