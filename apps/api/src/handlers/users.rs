use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use taskpro_application::UpdateProfileInput;
use taskpro_domain::{Role, UserId, UserIdentity};
use tracing::info;

use crate::dto::{ChangePasswordRequest, ChangeRoleRequest, UpdateProfileRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserResponse>> {
    let profile = state.user_service.profile(&user).await?;
    Ok(Json(UserResponse::from(profile)))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let updated = state
        .user_service
        .update_profile(
            &user,
            UpdateProfileInput {
                display_name: payload.name,
                email: payload.email,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .change_password(&user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users(&user).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn change_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let target = user_id.parse::<UserId>()?;
    let role = payload.role.trim().parse::<Role>()?;

    let updated = state.user_service.change_role(&user, target, role).await?;
    info!(
        actor = %user.id(),
        target = %target,
        role = %role,
        "role changed"
    );

    Ok(Json(UserResponse::from(updated)))
}
