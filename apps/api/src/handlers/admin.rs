use axum::Json;
use axum::extract::State;
use taskpro_domain::Role;

use crate::dto::SystemSettingsResponse;
use crate::state::AppState;

pub async fn system_settings_handler(State(state): State<AppState>) -> Json<SystemSettingsResponse> {
    Json(SystemSettingsResponse {
        storage_backend: state.storage_backend.as_str().to_owned(),
        token_ttl_minutes: state.token_ttl_minutes,
        roles: Role::all()
            .iter()
            .map(|role| role.as_str().to_owned())
            .collect(),
    })
}
