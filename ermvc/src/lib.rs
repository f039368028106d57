//! ermvc: convention-driven MVC on top of Axum.
//!
//! A controller named `UserController` exporting `index`, `show`, `store`,
//! `update` and `destroy` is served at `/users` and `/users/{id}` without
//! any route declarations.
//!
//! ```ignore
//! use ermvc::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     ermvc::init_tracing();
//!     let config = MvcConfig::load("development")?;
//!     let app = MvcApp::builder(config)
//!         .controllers(controllers::registry())
//!         .build()?;
//!     app.serve().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Feature flags
//!
//! | Feature    | Default | Crate                    |
//! |------------|---------|--------------------------|
//! | `security` | **yes** | `ermvc-security`         |
//! | `database` | no      | `ermvc-core/database`    |

pub extern crate ermvc_core;

pub use ermvc_core::*;

#[cfg(feature = "security")]
pub use ermvc_security;

/// Unified prelude: `use ermvc::prelude::*`.
pub mod prelude {
    pub use ermvc_core::prelude::*;

    #[cfg(feature = "security")]
    pub use ermvc_security::prelude::*;
}
