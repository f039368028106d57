pub mod error;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::SecurityError;
pub use extractor::{bearer_token, AuthenticatedUser};
pub use jwt::{TokenService, DEFAULT_TOKEN_TTL};
pub use middleware::authenticate;
pub use password::{hash_password, verify_password};

pub mod prelude {
    //! Re-exports of the most commonly used security types.
    pub use crate::{authenticate, hash_password, verify_password, AuthenticatedUser, TokenService};
}
