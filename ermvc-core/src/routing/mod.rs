//! Convention router: binds a controller's action handlers to CRUD routes.
//!
//! | action    | method   | path               |
//! |-----------|----------|--------------------|
//! | `index`   | `GET`    | `/{resource}`      |
//! | `show`    | `GET`    | `/{resource}/{id}` |
//! | `store`   | `POST`   | `/{resource}`      |
//! | `update`  | `PUT`    | `/{resource}/{id}` |
//! | `destroy` | `DELETE` | `/{resource}/{id}` |
//!
//! The table is fixed. Registration always walks it in the order above, so
//! the resulting route table does not depend on how the [`HandlerSet`] was
//! filled.
//!
//! The router does not talk to a web framework directly: anything that
//! implements [`RouteRegistrar`] can receive bindings. [`RouteTable`] records
//! them (used by the CLI and in tests); [`ConventionRouter`] installs them on
//! an `axum::Router`.

mod router;
mod table;

use std::collections::BTreeMap;

use tracing::{debug, info};

pub use router::{ActionHandler, ConventionRouter};
pub use table::{RegisteredRoute, RouteTable};

/// Name of the path parameter used for item routes.
pub const ID_PARAM: &str = "id";

/// The closed vocabulary of CRUD actions the router understands.
///
/// Variant order is registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKey {
    Index,
    Show,
    Store,
    Update,
    Destroy,
}

impl ActionKey {
    /// All actions, in registration order.
    pub const ALL: [ActionKey; 5] = [
        ActionKey::Index,
        ActionKey::Show,
        ActionKey::Store,
        ActionKey::Update,
        ActionKey::Destroy,
    ];

    /// The exported handler name for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKey::Index => "index",
            ActionKey::Show => "show",
            ActionKey::Store => "store",
            ActionKey::Update => "update",
            ActionKey::Destroy => "destroy",
        }
    }

    /// Look up an action by handler name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        ActionKey::ALL.into_iter().find(|key| key.as_str() == name)
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            ActionKey::Index | ActionKey::Show => HttpMethod::Get,
            ActionKey::Store => HttpMethod::Post,
            ActionKey::Update => HttpMethod::Put,
            ActionKey::Destroy => HttpMethod::Delete,
        }
    }

    /// Whether the action addresses a single item (`/{resource}/{id}`).
    pub fn is_member(&self) -> bool {
        matches!(self, ActionKey::Show | ActionKey::Update | ActionKey::Destroy)
    }

    /// Path template for this action under `base` (e.g. `/users`).
    ///
    /// An empty base mounts at the root: `/` and `/{id}`.
    pub fn path(&self, base: &str) -> String {
        if self.is_member() {
            format!("{base}/{{{ID_PARAM}}}")
        } else if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        }
    }
}

impl std::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verbs used by the convention table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for axum::http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => axum::http::Method::GET,
            HttpMethod::Post => axum::http::Method::POST,
            HttpMethod::Put => axum::http::Method::PUT,
            HttpMethod::Delete => axum::http::Method::DELETE,
        }
    }
}

/// A controller's handlers, keyed by action.
///
/// Absent actions are simply not routed.
pub struct HandlerSet<H> {
    handlers: BTreeMap<ActionKey, H>,
}

impl<H> HandlerSet<H> {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, action: ActionKey, handler: H) -> Self {
        self.handlers.insert(action, handler);
        self
    }

    pub fn index(self, handler: H) -> Self {
        self.with(ActionKey::Index, handler)
    }

    pub fn show(self, handler: H) -> Self {
        self.with(ActionKey::Show, handler)
    }

    pub fn store(self, handler: H) -> Self {
        self.with(ActionKey::Store, handler)
    }

    pub fn update(self, handler: H) -> Self {
        self.with(ActionKey::Update, handler)
    }

    pub fn destroy(self, handler: H) -> Self {
        self.with(ActionKey::Destroy, handler)
    }

    /// Insert a handler, returning the one it replaced.
    pub fn insert(&mut self, action: ActionKey, handler: H) -> Option<H> {
        self.handlers.insert(action, handler)
    }

    /// Insert a handler by exported name.
    ///
    /// Names outside the action vocabulary are dropped and `false` is
    /// returned; that is not an error.
    pub fn insert_named(&mut self, name: &str, handler: H) -> bool {
        match ActionKey::from_name(name) {
            Some(action) => {
                self.handlers.insert(action, handler);
                true
            }
            None => {
                debug!(name, "Ignoring handler outside the action vocabulary");
                false
            }
        }
    }

    pub fn get(&self, action: ActionKey) -> Option<&H> {
        self.handlers.get(&action)
    }

    pub fn contains(&self, action: ActionKey) -> bool {
        self.handlers.contains_key(&action)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Present actions, in registration order.
    pub fn actions(&self) -> impl Iterator<Item = ActionKey> + '_ {
        self.handlers.keys().copied()
    }
}

impl<H> Default for HandlerSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> Clone for HandlerSet<H> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<H> std::fmt::Debug for HandlerSet<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.actions()).finish()
    }
}

/// One computed route: method, path template, and the handler behind it.
#[derive(Debug)]
pub struct RouteBinding<'a, H> {
    pub action: ActionKey,
    pub method: HttpMethod,
    pub path: String,
    pub handler: &'a H,
}

/// Error returned by a [`RouteRegistrar`] that refuses a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The (method, path) pair is already taken.
    Duplicate { method: HttpMethod, path: String },
    /// An extra route claims a path that already has routes.
    PathTaken { path: String },
    /// The registrar refused the binding for another reason.
    Rejected {
        method: HttpMethod,
        path: String,
        reason: String,
    },
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::Duplicate { method, path } => {
                write!(f, "Route {method} {path} is already registered")
            }
            RouteError::PathTaken { path } => {
                write!(f, "Path {path} already has routes")
            }
            RouteError::Rejected {
                method,
                path,
                reason,
            } => write!(f, "Route {method} {path} was rejected: {reason}"),
        }
    }
}

impl std::error::Error for RouteError {}

/// Something that can hold (method, path, handler) triples.
pub trait RouteRegistrar<H> {
    fn register(&mut self, method: HttpMethod, path: &str, handler: &H) -> Result<(), RouteError>;
}

/// Compute the bindings for `handlers` under `base_path`, in table order.
pub fn route_bindings<'a, H>(base_path: &str, handlers: &'a HandlerSet<H>) -> Vec<RouteBinding<'a, H>> {
    ActionKey::ALL
        .into_iter()
        .filter_map(|action| {
            handlers.get(action).map(|handler| RouteBinding {
                action,
                method: action.method(),
                path: action.path(base_path),
                handler,
            })
        })
        .collect()
}

/// Register the convention routes of `handlers` under `/{resource}`.
///
/// The first registrar error aborts and is returned as is; bindings
/// registered before it stay registered.
pub fn register_convention_routes<H, R>(
    app: &mut R,
    resource: &str,
    handlers: &HandlerSet<H>,
) -> Result<(), RouteError>
where
    R: RouteRegistrar<H> + ?Sized,
{
    register_controller(app, resource, handlers)
}

/// Register the convention routes of `handlers` under an explicit base path.
///
/// A missing leading `/` is added and a trailing `/` is dropped, so
/// `"admin/users"` and `"/admin/users/"` both mount at `/admin/users`.
pub fn register_controller<H, R>(
    app: &mut R,
    base_path: &str,
    handlers: &HandlerSet<H>,
) -> Result<(), RouteError>
where
    R: RouteRegistrar<H> + ?Sized,
{
    let base = normalize_base_path(base_path);
    for binding in route_bindings(&base, handlers) {
        app.register(binding.method, &binding.path, binding.handler)?;
        debug!(
            method = %binding.method,
            path = %binding.path,
            action = %binding.action,
            "Route registered"
        );
    }
    info!(base = %base, routes = handlers.len(), "Registered convention routes");
    Ok(())
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
