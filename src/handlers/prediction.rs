use crate::{
    error::{AppError, AppResult},
    handlers::AppState,
    models::{HistoryEntry, PredictionRecord},
    response::ApiResponse,
    upload::read_image_field,
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

/// 预测成功时的消息
pub const PREDICTION_SUCCESS_MESSAGE: &str = "Model is predicted successfully";

/// 预测上传表单
#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictUpload {
    /// 待分类的图片，最大1000000字节，MIME类型须为 image/*
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// 图片预测处理器
///
/// 校验上传文件后执行预测，并把结果追加到历史记录。
#[utoipa::path(
    post,
    path = "/predict",
    tag = "prediction",
    request_body(content = PredictUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "预测成功", body = PredictionRecord),
        (status = 400, description = "未上传文件、文件不是图片或预测失败"),
        (status = 413, description = "文件超过1000000字节")
    )
)]
pub async fn predict(
    State(app_state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<PredictionRecord>>> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::warn!("请求不是有效的multipart表单: {}", rejection.body_text());
            return Err(AppError::MissingFile);
        }
    };

    let candidate = read_image_field(&mut multipart).await?;
    let image = app_state.validator.validate(candidate)?;

    tracing::info!(
        "收到图片: {} ({}, {} 字节)",
        image.file_name.as_deref().unwrap_or("<unnamed>"),
        image.content_type,
        image.data.len()
    );

    let record = app_state.pipeline.predict(image).await?;
    app_state.history.append(&record).await?;

    Ok(Json(ApiResponse::success_with_message(
        record,
        PREDICTION_SUCCESS_MESSAGE,
    )))
}

/// 预测历史查询处理器
#[utoipa::path(
    get,
    path = "/predict/histories",
    tag = "prediction",
    responses(
        (status = 200, description = "全部历史记录，按写入顺序", body = Vec<HistoryEntry>),
        (status = 500, description = "历史记录无法读取")
    )
)]
pub async fn get_histories(
    State(app_state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<HistoryEntry>>>> {
    let records = app_state.history.read_all().await?;
    let entries = records.into_iter().map(HistoryEntry::from).collect();

    Ok(Json(ApiResponse::success(entries)))
}
