use crate::{handlers::AppState, inference::ModelStatus, response::ApiResponse};
use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

/// 健康检查响应
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    /// 模型状态：loading、ready 或 failed
    #[schema(value_type = String)]
    pub model: ModelStatus,
    pub timestamp: String,
}

/// 健康检查处理器，同时报告模型是否就绪
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "服务运行中", body = HealthStatus)
    )
)]
pub async fn health_check(State(app_state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        model: app_state.pipeline.model().status(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
