use super::{HttpMethod, RouteError, RouteRegistrar};

/// A route recorded by [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRoute<H> {
    pub method: HttpMethod,
    pub path: String,
    pub handler: H,
}

/// In-memory registrar that records every binding in registration order.
///
/// Rejects a second registration of the same (method, path) pair with
/// [`RouteError::Duplicate`].
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<RegisteredRoute<H>>,
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn routes(&self) -> &[RegisteredRoute<H>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn contains(&self, method: HttpMethod, path: &str) -> bool {
        self.find(method, path).is_some()
    }

    /// Handler registered for `method` + `path`, if any.
    pub fn find(&self, method: HttpMethod, path: &str) -> Option<&H> {
        self.routes
            .iter()
            .find(|r| r.method == method && r.path == path)
            .map(|r| &r.handler)
    }

    pub fn into_routes(self) -> Vec<RegisteredRoute<H>> {
        self.routes
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> RouteRegistrar<H> for RouteTable<H> {
    fn register(&mut self, method: HttpMethod, path: &str, handler: &H) -> Result<(), RouteError> {
        if self.contains(method, path) {
            return Err(RouteError::Duplicate {
                method,
                path: path.to_string(),
            });
        }
        self.routes.push(RegisteredRoute {
            method,
            path: path.to_string(),
            handler: handler.clone(),
        });
        Ok(())
    }
}
