pub mod app;
pub mod config;
#[cfg(feature = "database")]
pub mod db;
pub mod discovery;
pub mod error;
pub mod inflect;
pub mod layers;
pub mod prelude;
pub mod routing;
pub mod secure_headers;
pub mod session;
pub mod views;

pub use app::{start_server, Action, AppContext, Controllers, MvcApp, MvcAppBuilder};
pub use config::{ConfigError, ConfigValue, FromConfigValue, MvcConfig};
#[cfg(feature = "database")]
pub use db::{Database, DatabaseError};
pub use discovery::{
    discover_controllers, ControllerLoader, ControllerRegistry, DiscoveryError, DiscoveryReport,
};
pub use error::{error_response, HttpError};
pub use inflect::{pluralize, resource_name, NameError};
pub use layers::{default_cors, default_trace, init_tracing};
pub use routing::{
    register_controller, register_convention_routes, ActionHandler, ActionKey, ConventionRouter,
    HandlerSet, HttpMethod, RouteError, RouteRegistrar, RouteTable,
};
pub use secure_headers::SecureHeaders;
pub use session::{MemorySessionStore, Session, SessionStore};
pub use views::{ViewError, Views};

pub use axum;
pub use serde_json;
pub use tokio;
pub use tracing;
