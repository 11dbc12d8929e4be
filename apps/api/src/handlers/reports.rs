use axum::Json;
use axum::extract::{Extension, State};
use taskpro_domain::UserIdentity;

use crate::dto::ReportSummaryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn report_summary_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<ReportSummaryResponse>> {
    let summary = state.task_service.report_summary(&user).await?;
    Ok(Json(ReportSummaryResponse::from(summary)))
}
