//! Everything a controller file needs.
//!
//! ```ignore
//! use ermvc_core::prelude::*;
//!
//! pub async fn index(State(ctx): State<AppContext>) -> Result<Html<String>, HttpError> {
//!     ctx.render("users/index", json!({ "title": "Users" }))
//! }
//!
//! pub fn handlers() -> HandlerSet<Action> {
//!     HandlerSet::new().index(ActionHandler::new(index))
//! }
//! ```

pub use crate::app::{Action, AppContext, Controllers, MvcApp};
pub use crate::config::MvcConfig;
#[cfg(feature = "database")]
pub use crate::db::Database;
pub use crate::error::HttpError;
pub use crate::routing::{ActionHandler, HandlerSet};
pub use crate::session::Session;

pub use axum::extract::{Form, Path, Query, State};
pub use axum::http::StatusCode;
pub use axum::response::{Html, IntoResponse, Redirect, Response};
pub use axum::routing::{delete, get, post, put};
pub use axum::Json;
pub use serde::{Deserialize, Serialize};
pub use serde_json::json;
