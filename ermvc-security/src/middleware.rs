use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::extractor::{bearer_token, AuthenticatedUser};
use crate::jwt::TokenService;

/// Bearer-token guard.
///
/// - no `Authorization: Bearer` header → 401 `{"error":"Unauthorized"}`
/// - token fails verification → 401 `{"error":"Invalid token"}`
/// - otherwise the claims are attached as [`AuthenticatedUser`]
///
/// ```ignore
/// let protected = Router::new()
///     .route("/me", get(me))
///     .route_layer(axum::middleware::from_fn_with_state(tokens, authenticate));
/// ```
pub async fn authenticate(
    State(tokens): State<TokenService>,
    mut req: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(req.headers()).and_then(|token| tokens.verify(token));

    match verified {
        Ok(claims) => {
            let user = AuthenticatedUser::from_claims(claims);
            debug!(uri = %req.uri(), sub = ?user.sub(), "Authenticated request");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => {
            warn!(uri = %req.uri(), error = %err, "Authentication failed");
            err.into_response()
        }
    }
}
