use std::collections::HashSet;

use axum::handler::Handler;
use axum::routing::{delete, get, post, put, MethodRouter};
use axum::Router;

use super::{HttpMethod, RouteError, RouteRegistrar};

/// A type-erased axum handler that can be mounted under any convention verb.
///
/// ```ignore
/// async fn index() -> &'static str { "all users" }
///
/// let handlers = HandlerSet::new().index(ActionHandler::new(index));
/// ```
pub struct ActionHandler<S = ()> {
    get: MethodRouter<S>,
    post: MethodRouter<S>,
    put: MethodRouter<S>,
    delete: MethodRouter<S>,
}

impl<S> ActionHandler<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        Self {
            get: get(handler.clone()),
            post: post(handler.clone()),
            put: put(handler.clone()),
            delete: delete(handler),
        }
    }

    /// A method router that only answers `method`.
    pub fn method_router(&self, method: HttpMethod) -> MethodRouter<S> {
        match method {
            HttpMethod::Get => self.get.clone(),
            HttpMethod::Post => self.post.clone(),
            HttpMethod::Put => self.put.clone(),
            HttpMethod::Delete => self.delete.clone(),
        }
    }
}

impl<S> Clone for ActionHandler<S> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            post: self.post.clone(),
            put: self.put.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<S> std::fmt::Debug for ActionHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHandler").finish_non_exhaustive()
    }
}

/// Registrar that installs convention routes on an `axum::Router`.
///
/// axum panics on overlapping method routes; this wrapper tracks what it
/// has installed and returns [`RouteError::Duplicate`] instead. Extra routes
/// added with [`try_route`](Self::try_route) are tracked by path, since a
/// `MethodRouter` does not expose the methods it answers.
pub struct ConventionRouter<S = ()> {
    router: Router<S>,
    registered: HashSet<(HttpMethod, String)>,
    extra_paths: HashSet<String>,
}

impl<S> ConventionRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::from_router(Router::new())
    }

    /// Wrap an existing router.
    pub fn from_router(router: Router<S>) -> Self {
        Self {
            router,
            registered: HashSet::new(),
            extra_paths: HashSet::new(),
        }
    }

    /// Add a route outside the convention table (e.g. `/users/{id}/edit`).
    ///
    /// # Panics
    ///
    /// Like `axum::Router::route`, when a method on `path` is already routed.
    /// Use [`try_route`](Self::try_route) to get an error instead.
    pub fn route(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Add a route outside the convention table, refusing any `path` that
    /// already carries a convention route or another extra route.
    ///
    /// Put every method of one extra path in a single `MethodRouter`.
    pub fn try_route(
        mut self,
        path: &str,
        method_router: MethodRouter<S>,
    ) -> Result<Self, RouteError> {
        if self.path_taken(path) {
            return Err(RouteError::PathTaken {
                path: path.to_string(),
            });
        }
        self.extra_paths.insert(path.to_string());
        self.router = self.router.route(path, method_router);
        Ok(self)
    }

    fn path_taken(&self, path: &str) -> bool {
        self.extra_paths.contains(path) || self.registered.iter().any(|(_, p)| p == path)
    }

    /// Convention routes installed so far.
    pub fn registered(&self) -> impl Iterator<Item = (HttpMethod, &str)> {
        self.registered.iter().map(|(m, p)| (*m, p.as_str()))
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

impl<S> Default for ConventionRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RouteRegistrar<ActionHandler<S>> for ConventionRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn register(
        &mut self,
        method: HttpMethod,
        path: &str,
        handler: &ActionHandler<S>,
    ) -> Result<(), RouteError> {
        if self.extra_paths.contains(path) {
            return Err(RouteError::PathTaken {
                path: path.to_string(),
            });
        }
        if !self.registered.insert((method, path.to_string())) {
            return Err(RouteError::Duplicate {
                method,
                path: path.to_string(),
            });
        }
        let router = std::mem::replace(&mut self.router, Router::new());
        self.router = router.route(path, handler.method_router(method));
        Ok(())
    }
}
