use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ermvc_core::error::error_response;
use ermvc_core::HttpError;

/// Errors raised while authenticating a request or handling credentials.
#[derive(Debug)]
pub enum SecurityError {
    /// The Authorization header is missing from the request.
    MissingAuthHeader,

    /// The authorization scheme is not "Bearer".
    InvalidAuthScheme,

    /// The token is malformed or its signature does not match.
    InvalidToken(String),

    /// The token has expired.
    TokenExpired,

    /// No signing secret is configured (`jwt.secret` / `JWT_SECRET`).
    MissingSecret,

    /// Claims to sign are not a JSON object.
    InvalidClaims(String),

    /// Password hashing failed or the stored hash is malformed.
    Hash(String),
}

impl std::fmt::Display for SecurityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityError::MissingAuthHeader => write!(f, "Missing Authorization header"),
            SecurityError::InvalidAuthScheme => write!(f, "Invalid authorization scheme"),
            SecurityError::InvalidToken(msg) => write!(f, "Invalid token: {msg}"),
            SecurityError::TokenExpired => write!(f, "Token expired"),
            SecurityError::MissingSecret => {
                write!(f, "JWT secret is not set (configure jwt.secret or JWT_SECRET)")
            }
            SecurityError::InvalidClaims(msg) => write!(f, "Invalid claims: {msg}"),
            SecurityError::Hash(msg) => write!(f, "Password hash error: {msg}"),
        }
    }
}

impl std::error::Error for SecurityError {}

impl SecurityError {
    pub fn status(&self) -> StatusCode {
        match self {
            SecurityError::MissingAuthHeader
            | SecurityError::InvalidAuthScheme
            | SecurityError::InvalidToken(_)
            | SecurityError::TokenExpired => StatusCode::UNAUTHORIZED,
            SecurityError::MissingSecret
            | SecurityError::InvalidClaims(_)
            | SecurityError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            SecurityError::MissingAuthHeader | SecurityError::InvalidAuthScheme => "Unauthorized",
            SecurityError::InvalidToken(_) | SecurityError::TokenExpired => "Invalid token",
            _ => "Internal server error",
        }
    }
}

impl IntoResponse for SecurityError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.public_message())
    }
}

impl From<SecurityError> for HttpError {
    fn from(err: SecurityError) -> Self {
        match err.status() {
            StatusCode::UNAUTHORIZED => HttpError::Unauthorized(err.public_message().to_string()),
            _ => HttpError::Internal(err.public_message().to_string()),
        }
    }
}
