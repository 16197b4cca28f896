//! Authentication middleware
//!
//! Validates the bearer token on every `/api/` route except the public ones
//! and injects [`CurrentUser`] into the request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::policy::{Operation, authorize};
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Routes reachable without a token
pub const PUBLIC_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/register", "/api/health"];

/// Require a valid bearer token
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (so they 404 normally)
/// - [`PUBLIC_ROUTES`]
///
/// # Errors
///
/// | Case | Status |
/// |------|--------|
/// | no Authorization header | 401 NotAuthenticated |
/// | malformed header / bad signature | 401 TokenInvalid |
/// | expired token | 401 TokenExpired |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_ROUTES.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let user = authenticate(&state, header, path)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Turn an Authorization header value into the caller
pub(crate) fn authenticate(
    state: &ServerState,
    header: Option<&str>,
    path: &str,
) -> Result<CurrentUser, AppError> {
    let Some(header) = header else {
        security_log!(WARN, "auth_missing", uri = path);
        return Err(AppError::not_authenticated());
    };

    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed token claims: {e}"))),
        Err(e) => {
            security_log!(
                WARN,
                "auth_failed",
                error = format!("{e}"),
                uri = path
            );
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Route layer gating a route on the role matrix
///
/// Runs before the handler's extractors, so a caller whose role is not
/// allowed gets 403 even when the body would not parse.
///
/// ```ignore
/// Router::new().route(
///     "/",
///     post(handler::create).route_layer(middleware::from_fn(require_operation(Operation::CreateTask))),
/// );
/// ```
pub fn require_operation(
    op: Operation,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;
            authorize(user, op)?;
            Ok(next.run(req).await)
        })
    }
}
