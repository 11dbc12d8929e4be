use axum::extract::{Extension, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use taskpro_core::AppError;
use taskpro_domain::{Permission, Role, UserIdentity};
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::state::AppState;

/// Route-level authorization requirement, installed as a request extension.
#[derive(Debug, Clone, Copy)]
pub enum AccessRule {
    /// The actor's role must grant this permission.
    Permission(Permission),
    /// The actor's role must grant at least one of these permissions.
    AnyPermission(&'static [Permission]),
    /// Legacy role allow-list.
    Roles(&'static [Role]),
}

/// Resolves the bearer credential to an identity and stores it on the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);

    let identity = match state
        .session_service
        .authenticate(authorization.as_deref())
        .await
    {
        Ok(identity) => identity,
        Err(error) => {
            log_rejection(&request, &error);
            return Err(error.into());
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Applies the route's [`AccessRule`] to the identity stored by [`require_auth`].
pub async fn require_access(
    State(state): State<AppState>,
    Extension(rule): Extension<AccessRule>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let actor = request.extensions().get::<UserIdentity>();
    let authorization = &state.authorization_service;

    let decision = match rule {
        AccessRule::Permission(permission) => authorization.require_permission(actor, permission),
        AccessRule::AnyPermission(permissions) => authorization.require_any(actor, permissions),
        AccessRule::Roles(roles) => authorization.require_role(actor, roles),
    };

    if let Err(error) = decision {
        log_rejection(&request, &error);
        return Err(error.into());
    }

    Ok(next.run(request).await)
}

fn log_rejection(request: &Request, error: &AppError) {
    let method = request.method();
    let path = request.uri().path();

    match error {
        AppError::Forbidden(_) => {
            warn!(%method, path, reason = error.message(), "request rejected");
        }
        AppError::Unauthorized(_) => {
            debug!(%method, path, reason = error.message(), "request rejected");
        }
        _ => {}
    }
}
