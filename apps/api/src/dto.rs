mod auth;
mod common;
mod tasks;
mod users;

pub use auth::{AuthLoginRequest, AuthRegisterRequest, AuthResponse, PermissionCatalogResponse};
pub use common::{HealthResponse, SystemSettingsResponse, UserResponse};
pub use tasks::{
    AssigneeWorkloadResponse, CreateTaskRequest, ReportSummaryResponse, TaskListQueryParams,
    TaskPriorityCountsResponse, TaskRecurrenceBody, TaskResponse, TaskStatsResponse,
    TaskStatusCountsResponse, UpdateTaskRequest,
};
pub use users::{ChangePasswordRequest, ChangeRoleRequest, UpdateProfileRequest};

#[cfg(test)]
mod tests {
    use super::{
        AssigneeWorkloadResponse, AuthLoginRequest, AuthRegisterRequest, AuthResponse,
        ChangePasswordRequest, ChangeRoleRequest, CreateTaskRequest, HealthResponse,
        PermissionCatalogResponse, ReportSummaryResponse, SystemSettingsResponse,
        TaskPriorityCountsResponse, TaskRecurrenceBody, TaskResponse, TaskStatsResponse,
        TaskStatusCountsResponse, UpdateProfileRequest, UpdateTaskRequest, UserResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AuthRegisterRequest::export(&config)?;
        AuthLoginRequest::export(&config)?;
        AuthResponse::export(&config)?;
        PermissionCatalogResponse::export(&config)?;
        UserResponse::export(&config)?;
        UpdateProfileRequest::export(&config)?;
        ChangePasswordRequest::export(&config)?;
        ChangeRoleRequest::export(&config)?;
        TaskRecurrenceBody::export(&config)?;
        TaskResponse::export(&config)?;
        CreateTaskRequest::export(&config)?;
        UpdateTaskRequest::export(&config)?;
        TaskStatusCountsResponse::export(&config)?;
        TaskPriorityCountsResponse::export(&config)?;
        TaskStatsResponse::export(&config)?;
        AssigneeWorkloadResponse::export(&config)?;
        ReportSummaryResponse::export(&config)?;
        SystemSettingsResponse::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
