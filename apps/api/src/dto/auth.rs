use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use taskpro_application::AuthenticatedSession;
use taskpro_domain::{PermissionCatalog, Role};
use ts_rs::TS;

use super::UserResponse;

/// Incoming payload for registration.
///
/// `role` is accepted for compatibility with older dashboards and ignored.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-register-request.ts"
)]
pub struct AuthRegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    #[ts(optional)]
    pub role: Option<String>,
}

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Token and identity returned by login and registration.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-response.ts"
)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

impl From<AuthenticatedSession> for AuthResponse {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            token: session.token.into(),
            expires_at: session.expires_at.to_rfc3339(),
            user: session.identity.into(),
        }
    }
}

/// Role to permission catalog enforced by this API.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-catalog-response.ts"
)]
pub struct PermissionCatalogResponse {
    pub roles: BTreeMap<String, Vec<String>>,
}

impl From<&PermissionCatalog> for PermissionCatalogResponse {
    fn from(catalog: &PermissionCatalog) -> Self {
        let roles = Role::all()
            .iter()
            .map(|role| {
                let permissions = catalog
                    .permissions_for(*role)
                    .iter()
                    .map(|permission| permission.as_str().to_owned())
                    .collect();
                (role.as_str().to_owned(), permissions)
            })
            .collect();

        Self { roles }
    }
}
