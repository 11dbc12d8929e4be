use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use taskpro_application::RegisterParams;
use taskpro_domain::UserIdentity;
use tracing::{debug, info};

use crate::dto::{
    AuthLoginRequest, AuthRegisterRequest, AuthResponse, PermissionCatalogResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthRegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if let Some(requested_role) = payload.role.as_deref() {
        debug!(requested_role, "ignoring role requested at registration");
    }

    let session = state
        .user_service
        .register(RegisterParams {
            display_name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    info!(
        user_id = %session.identity.id(),
        role = %session.identity.role(),
        "account registered"
    );

    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse::from(session)))
}

pub async fn me_handler(Extension(user): Extension<UserIdentity>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn permissions_handler(State(state): State<AppState>) -> Json<PermissionCatalogResponse> {
    Json(PermissionCatalogResponse::from(state.catalog().as_ref()))
}
