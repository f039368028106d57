//! Application bootstrap: builder, shared state and server loop.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::response::Html;
use axum::routing::MethodRouter;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::MvcConfig;
use crate::discovery::{discover_controllers, ControllerRegistry, DiscoveryError};
use crate::error::HttpError;
use crate::layers;
use crate::routing::{ActionHandler, ConventionRouter, HttpMethod};
use crate::secure_headers::SecureHeaders;
use crate::session::{session_middleware, SessionCookie, SessionLayer, SessionStore};
use crate::views::Views;

#[cfg(feature = "database")]
use crate::db::Database;

/// Handler type stored in a controller registry for an ermvc application.
pub type Action = ActionHandler<AppContext>;

/// Controller registry for an ermvc application.
pub type Controllers = ControllerRegistry<Action>;

/// State shared by every handler: `State(ctx): State<AppContext>`.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<MvcConfig>,
    views: Views,
    #[cfg(feature = "database")]
    database: Option<Database>,
}

impl AppContext {
    pub fn new(config: MvcConfig, views: Views) -> Self {
        Self {
            config: Arc::new(config),
            views,
            #[cfg(feature = "database")]
            database: None,
        }
    }

    pub fn config(&self) -> &MvcConfig {
        &self.config
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    /// Render a view, mapping failures to a 500.
    pub fn render(&self, name: &str, context: serde_json::Value) -> Result<Html<String>, HttpError> {
        Ok(self.views.render_html(name, &context)?)
    }

    #[cfg(feature = "database")]
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    #[cfg(feature = "database")]
    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    /// The database handle, or a 500 when the app was built without one.
    #[cfg(feature = "database")]
    pub fn db(&self) -> Result<&Database, HttpError> {
        self.database
            .as_ref()
            .ok_or_else(|| HttpError::Internal("Database is not configured".to_string()))
    }
}

/// A built application: router plus the state it was built with.
pub struct MvcApp {
    router: Router,
    context: AppContext,
    convention_routes: Vec<(HttpMethod, String)>,
}

impl MvcApp {
    pub fn builder(config: MvcConfig) -> MvcAppBuilder {
        MvcAppBuilder::new(config)
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Convention routes installed from the controller registry, sorted by path.
    pub fn convention_routes(&self) -> &[(HttpMethod, String)] {
        &self.convention_routes
    }

    /// Serve on the configured port until Ctrl-C / SIGTERM, then release
    /// the database.
    pub async fn serve(self) -> std::io::Result<()> {
        let port = self.context.config().port();
        let result = start_server(self.router, port).await;
        #[cfg(feature = "database")]
        if let Some(database) = self.context.database() {
            database.close().await;
        }
        result
    }
}

/// Builder for [`MvcApp`].
pub struct MvcAppBuilder {
    config: MvcConfig,
    views_path: PathBuf,
    public_path: PathBuf,
    controllers: Option<Controllers>,
    controllers_dir: Option<PathBuf>,
    cors: Option<CorsLayer>,
    secure_headers: Option<SecureHeaders>,
    session_store: Option<Arc<dyn SessionStore>>,
    #[cfg(feature = "database")]
    database: Option<Database>,
    routes: Vec<(String, MethodRouter<AppContext>)>,
}

impl MvcAppBuilder {
    fn new(config: MvcConfig) -> Self {
        Self {
            config,
            views_path: PathBuf::from("src/views"),
            public_path: PathBuf::from("public"),
            controllers: None,
            controllers_dir: None,
            cors: None,
            secure_headers: Some(SecureHeaders::default()),
            session_store: None,
            #[cfg(feature = "database")]
            database: None,
            routes: Vec::new(),
        }
    }

    /// Directory holding `<view>.html` templates (default `src/views`).
    pub fn views_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.views_path = path.into();
        self
    }

    /// Directory served as static files (default `public`).
    pub fn public_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_path = path.into();
        self
    }

    /// Controllers whose convention routes are mounted.
    pub fn controllers(mut self, registry: Controllers) -> Self {
        self.controllers = Some(registry);
        self
    }

    /// Only mount registry entries whose controller file exists in `dir`.
    pub fn controllers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.controllers_dir = Some(dir.into());
        self
    }

    /// CORS layer; defaults to [`layers::cors_from_config`].
    pub fn cors(mut self, cors: CorsLayer) -> Self {
        self.cors = Some(cors);
        self
    }

    pub fn secure_headers(mut self, headers: SecureHeaders) -> Self {
        self.secure_headers = Some(headers);
        self
    }

    pub fn without_secure_headers(mut self) -> Self {
        self.secure_headers = None;
        self
    }

    /// Custom session backend instead of the in-memory store.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    #[cfg(feature = "database")]
    pub fn database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Extra route outside the convention table (`/`, `/users/{id}/edit`, …).
    ///
    /// The path must not be one the controllers claim; [`build`](Self::build)
    /// fails with [`RouteError::PathTaken`](crate::routing::RouteError::PathTaken)
    /// otherwise.
    pub fn route(mut self, path: &str, method_router: MethodRouter<AppContext>) -> Self {
        self.routes.push((path.to_string(), method_router));
        self
    }

    /// Assemble the router.
    ///
    /// # Errors
    ///
    /// A controller name that yields no valid resource, two controllers
    /// claiming the same route, or an extra route on a path already taken.
    pub fn build(self) -> Result<MvcApp, DiscoveryError> {
        let views = Views::new(&self.views_path);
        #[allow(unused_mut)]
        let mut context = AppContext::new(self.config, views);
        #[cfg(feature = "database")]
        if let Some(database) = self.database {
            context = context.with_database(database);
        }
        let config = context.config();

        let mut routes = ConventionRouter::new();
        if let Some(registry) = &self.controllers {
            match &self.controllers_dir {
                Some(dir) => {
                    let report = discover_controllers(&mut routes, dir, registry)?;
                    info!(
                        controllers = report.registered.len(),
                        skipped = report.skipped.len(),
                        routes = report.route_count(),
                        "Controller discovery finished"
                    );
                }
                None => {
                    registry.register_all(&mut routes)?;
                }
            }
        }

        let mut convention_routes: Vec<(HttpMethod, String)> = routes
            .registered()
            .map(|(method, path)| (method, path.to_string()))
            .collect();
        convention_routes.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        for (path, method_router) in self.routes {
            routes = routes.try_route(&path, method_router)?;
        }

        let sessions = match self.session_store {
            Some(store) => SessionLayer::new(store, SessionCookie::from_config(config)),
            None => SessionLayer::from_config(config),
        };
        let cors = self.cors.unwrap_or_else(|| layers::cors_from_config(config));

        let mut router: Router = routes
            .into_router()
            .fallback_service(ServeDir::new(&self.public_path))
            .layer(axum::middleware::from_fn_with_state(sessions, session_middleware))
            .with_state(context.clone());

        if let Some(headers) = self.secure_headers {
            router = headers.layer_onto(router);
        }
        let router = router.layer(cors).layer(layers::default_trace());

        Ok(MvcApp {
            router,
            context,
            convention_routes,
        })
    }
}

/// Bind `0.0.0.0:port` and serve `router` until a shutdown signal.
pub async fn start_server(router: Router, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    serve_with_listener(listener, router).await
}

/// Serve on an already bound listener until a shutdown signal.
pub async fn serve_with_listener(listener: TcpListener, router: Router) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Server listening on port {}", addr.port());
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
