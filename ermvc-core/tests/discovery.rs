use std::fs;
use std::path::Path;

use ermvc_core::discovery::{
    controller_files, discover_controllers, is_controller_file, ControllerLoader,
    ControllerRegistry, DiscoveryError,
};
use ermvc_core::routing::{HandlerSet, HttpMethod, RouteError, RouteRegistrar, RouteTable};
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "// controller\n").unwrap();
}

fn crud() -> HandlerSet<&'static str> {
    HandlerSet::new()
        .index("index")
        .show("show")
        .store("store")
        .update("update")
        .destroy("destroy")
}

#[test]
fn controller_file_patterns() {
    assert!(is_controller_file("UserController.rs"));
    assert!(is_controller_file("user_controller.rs"));
    assert!(is_controller_file("PostController.ts"));
    assert!(!is_controller_file("mod.rs"));
    assert!(!is_controller_file("user.rs"));
    assert!(!is_controller_file("user_controller"));
    assert!(!is_controller_file("controllers.rs"));
}

#[test]
fn listing_is_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "user_controller.rs");
    touch(dir.path(), "mod.rs");
    touch(dir.path(), "post_controller.rs");
    touch(dir.path(), "helpers.rs");
    fs::create_dir(dir.path().join("nested_controller.rs")).unwrap();

    let names: Vec<String> = controller_files(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["post_controller.rs", "user_controller.rs"]);
}

#[test]
fn loadable_controller_registered_failing_one_reported() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "user_controller.rs");
    touch(dir.path(), "broken_controller.rs");

    let registry = ControllerRegistry::new().controller("UserController", crud());
    let mut table = RouteTable::new();

    let report = discover_controllers(&mut table, dir.path(), &registry).unwrap();

    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.registered[0].name, "UserController");
    assert_eq!(report.registered[0].resource, "users");
    assert_eq!(report.registered[0].routes, 5);
    assert_eq!(report.route_count(), 5);

    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].file.ends_with("broken_controller.rs"));
    assert!(report.skipped[0].reason.contains("BrokenController"));

    assert_eq!(table.len(), 5);
    assert!(table.contains(HttpMethod::Get, "/users"));
    assert!(table.contains(HttpMethod::Delete, "/users/{id}"));
}

#[test]
fn missing_directory_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let registry = ControllerRegistry::new().controller("UserController", crud());
    let mut table = RouteTable::new();

    let report =
        discover_controllers(&mut table, &dir.path().join("does-not-exist"), &registry).unwrap();

    assert!(report.registered.is_empty());
    assert!(report.skipped.is_empty());
    assert!(table.is_empty());
}

#[test]
fn irregular_names_use_canonical_plural() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "person_controller.rs");
    let registry = ControllerRegistry::new().controller("PersonController", crud());
    let mut table = RouteTable::new();

    discover_controllers(&mut table, dir.path(), &registry).unwrap();

    assert!(table.contains(HttpMethod::Get, "/people"));
    assert!(!table.contains(HttpMethod::Get, "/persons"));
}

#[test]
fn registration_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "user_controller.rs");
    let registry = ControllerRegistry::new().controller("UserController", crud());

    let mut table = RouteTable::new();
    table
        .register(HttpMethod::Post, "/users", &"existing")
        .unwrap();

    let err = discover_controllers(&mut table, dir.path(), &registry).unwrap_err();
    assert_eq!(
        err,
        RouteError::Duplicate {
            method: HttpMethod::Post,
            path: "/users".to_string()
        }
    );
}

struct FailingLoader;

impl ControllerLoader<&'static str> for FailingLoader {
    fn load(
        &self,
        controller_name: &str,
        _path: &Path,
    ) -> Result<HandlerSet<&'static str>, DiscoveryError> {
        Err(DiscoveryError::Load {
            controller: controller_name.to_string(),
            reason: "syntax error".to_string(),
        })
    }
}

#[test]
fn custom_loader_failures_are_skipped() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a_controller.rs");
    touch(dir.path(), "b_controller.rs");
    let mut table = RouteTable::new();

    let report = discover_controllers(&mut table, dir.path(), &FailingLoader).unwrap();

    assert!(report.registered.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped[0].reason.contains("syntax error"));
}

#[test]
fn register_all_walks_registry_in_name_order() {
    let registry = ControllerRegistry::new()
        .controller("UserController", HandlerSet::new().index("users"))
        .controller("CategoryController", HandlerSet::new().index("categories"));
    let mut table = RouteTable::new();

    let routes = registry.register_all(&mut table).unwrap();

    assert_eq!(routes, 2);
    let paths: Vec<&str> = table.routes().iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/categories", "/users"]);
}

#[test]
fn register_all_rejects_bare_marker() {
    let registry = ControllerRegistry::new().controller("Controller", HandlerSet::new().index("x"));
    let mut table = RouteTable::new();
    let err = registry.register_all(&mut table).unwrap_err();
    assert!(matches!(err, DiscoveryError::InvalidName(_)));
}
