use serde::Serialize;
use taskpro_domain::UserIdentity;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of an account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

impl From<UserIdentity> for UserResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            id: identity.id().to_string(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().as_str().to_owned(),
            role: identity.role().as_str().to_owned(),
        }
    }
}

/// Runtime settings visible to administrators.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/system-settings-response.ts"
)]
pub struct SystemSettingsResponse {
    pub storage_backend: String,
    pub token_ttl_minutes: i64,
    pub roles: Vec<String>,
}
