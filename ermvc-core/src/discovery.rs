//! Controller discovery: "drop a file in, get routes" without runtime loading.
//!
//! Controllers are compiled into the application and collected in a
//! [`ControllerRegistry`], which the CLI keeps up to date in
//! `src/controllers/mod.rs`. [`discover_controllers`] walks a controllers
//! directory, asks a [`ControllerLoader`] (normally the registry) for each
//! controller file it finds, and registers the convention routes.
//!
//! A controller that fails to load is logged and skipped. A failing route
//! registration aborts discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::inflect::{self, NameError};
use crate::routing::{register_convention_routes, HandlerSet, RouteError, RouteRegistrar};

/// Why a single controller could not be loaded or registered.
#[derive(Debug)]
pub enum DiscoveryError {
    /// No handlers are known for this controller name.
    NotRegistered(String),
    /// The loader failed for another reason.
    Load { controller: String, reason: String },
    /// The controller name does not yield a usable resource segment.
    InvalidName(NameError),
    /// The registrar refused a route.
    Route(RouteError),
}

impl std::fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryError::NotRegistered(name) => {
                write!(f, "Controller '{name}' is not in the controller registry")
            }
            DiscoveryError::Load { controller, reason } => {
                write!(f, "Failed to load controller '{controller}': {reason}")
            }
            DiscoveryError::InvalidName(err) => write!(f, "{err}"),
            DiscoveryError::Route(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DiscoveryError {}

impl From<NameError> for DiscoveryError {
    fn from(err: NameError) -> Self {
        DiscoveryError::InvalidName(err)
    }
}

impl From<RouteError> for DiscoveryError {
    fn from(err: RouteError) -> Self {
        DiscoveryError::Route(err)
    }
}

/// Produces the handlers of a controller found on disk.
pub trait ControllerLoader<H> {
    fn load(&self, controller_name: &str, path: &Path) -> Result<HandlerSet<H>, DiscoveryError>;
}

/// Explicit map from controller name to its handlers.
///
/// ```ignore
/// pub fn registry() -> ControllerRegistry<ActionHandler<AppContext>> {
///     ControllerRegistry::new()
///         .controller("HomeController", home_controller::handlers())
///         .controller("UserController", user_controller::handlers())
/// }
/// ```
pub struct ControllerRegistry<H> {
    controllers: BTreeMap<String, HandlerSet<H>>,
}

impl<H> ControllerRegistry<H> {
    pub fn new() -> Self {
        Self {
            controllers: BTreeMap::new(),
        }
    }

    /// Builder-style insert. A later entry with the same name wins.
    pub fn controller(mut self, name: impl Into<String>, handlers: HandlerSet<H>) -> Self {
        self.insert(name, handlers);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, handlers: HandlerSet<H>) -> Option<HandlerSet<H>> {
        self.controllers.insert(name.into(), handlers)
    }

    pub fn get(&self, name: &str) -> Option<&HandlerSet<H>> {
        self.controllers.get(name)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Controller names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controllers.keys().map(String::as_str)
    }

    /// Register every controller, sorted by name, without looking at the
    /// filesystem. Returns the number of routes installed.
    pub fn register_all<R>(&self, app: &mut R) -> Result<usize, DiscoveryError>
    where
        R: RouteRegistrar<H> + ?Sized,
    {
        let mut routes = 0;
        for (name, handlers) in &self.controllers {
            let resource = inflect::resource_name(name)?;
            register_convention_routes(app, &resource, handlers)?;
            info!(controller = %name, resource = %format!("/{resource}"), "Registered controller");
            routes += handlers.len();
        }
        Ok(routes)
    }
}

impl<H> Default for ControllerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> ControllerLoader<H> for ControllerRegistry<H> {
    fn load(&self, controller_name: &str, _path: &Path) -> Result<HandlerSet<H>, DiscoveryError> {
        self.get(controller_name)
            .cloned()
            .ok_or_else(|| DiscoveryError::NotRegistered(controller_name.to_string()))
    }
}

/// A controller registered during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredController {
    pub name: String,
    pub resource: String,
    pub file: PathBuf,
    pub routes: usize,
}

/// A controller file that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedController {
    pub file: PathBuf,
    pub reason: String,
}

/// Outcome of [`discover_controllers`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub registered: Vec<DiscoveredController>,
    pub skipped: Vec<SkippedController>,
}

impl DiscoveryReport {
    /// Total number of routes installed.
    pub fn route_count(&self) -> usize {
        self.registered.iter().map(|c| c.routes).sum()
    }
}

/// Whether `file_name` looks like a controller file:
/// `UserController.rs`, `user_controller.rs`, …
pub fn is_controller_file(file_name: &str) -> bool {
    let path = Path::new(file_name);
    if path.extension().is_none() {
        return false;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| {
            stem.ends_with(inflect::CONTROLLER_SUFFIX)
                || stem.ends_with(inflect::CONTROLLER_FILE_SUFFIX)
        })
}

/// Controller files in `dir`, sorted by file name.
pub fn controller_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_candidate = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_controller_file);
        if is_candidate {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Scan `dir` for controller files and register their convention routes.
///
/// - missing directory: warning, empty report
/// - loader failure or unusable name: logged, file listed in `skipped`
/// - registrar failure: returned as is
pub fn discover_controllers<H, R, L>(
    app: &mut R,
    dir: &Path,
    loader: &L,
) -> Result<DiscoveryReport, RouteError>
where
    R: RouteRegistrar<H> + ?Sized,
    L: ControllerLoader<H> + ?Sized,
{
    let mut report = DiscoveryReport::default();

    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Controllers directory not found");
        return Ok(report);
    }

    let files = match controller_files(dir) {
        Ok(files) => files,
        Err(err) => {
            error!(dir = %dir.display(), error = %err, "Failed to read controllers directory");
            return Ok(report);
        }
    };

    for file in files {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = inflect::controller_name_from_stem(&stem);

        let loaded = loader
            .load(&name, &file)
            .and_then(|handlers| Ok((inflect::resource_name(&name)?, handlers)));

        let (resource, handlers) = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(file = %file.display(), error = %err, "Failed to load controller");
                report.skipped.push(SkippedController {
                    file,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        register_convention_routes(app, &resource, &handlers)?;
        info!(controller = %name, resource = %format!("/{resource}"), "Registered controller");

        report.registered.push(DiscoveredController {
            name,
            resource,
            file,
            routes: handlers.len(),
        });
    }

    Ok(report)
}
