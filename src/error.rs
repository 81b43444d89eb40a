use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ApiResponse;
use crate::upload::MAX_UPLOAD_BYTES;

/// 预测流程失败时返回给客户端的统一消息
pub const PREDICTION_FAILED_MESSAGE: &str = "Terjadi kesalahan dalam melakukan prediksi";

/// 读取历史记录失败时返回给客户端的统一消息
pub const HISTORY_FAILED_MESSAGE: &str = "Terjadi kesalahan saat mengambil riwayat prediksi";

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("未上传文件")]
    MissingFile,

    #[error("文件过大: 最大允许大小 {} 字节", MAX_UPLOAD_BYTES)]
    PayloadTooLarge,

    #[error("不支持的文件类型: {mime_type}")]
    UnsupportedMediaType { mime_type: String },

    #[error("图片解码失败: {0}")]
    DecodeError(String),

    #[error("模型不可用: {0}")]
    ModelUnavailable(String),

    #[error("预测失败: {0}")]
    PredictionFailed(String),

    #[error("历史记录读取失败: {0}")]
    StoreReadError(String),

    #[error("历史记录写入失败: {0}")]
    StoreWriteError(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP状态码与对外消息
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::MissingFile => (StatusCode::BAD_REQUEST, "No file uploaded".to_string()),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "Payload content length greater than maximum allowed: {}",
                    MAX_UPLOAD_BYTES
                ),
            ),
            AppError::UnsupportedMediaType { .. } => (
                StatusCode::BAD_REQUEST,
                "Uploaded file is not an image".to_string(),
            ),
            // 流水线与写入错误统一成一条消息，细节只进日志
            AppError::DecodeError(_)
            | AppError::ModelUnavailable(_)
            | AppError::PredictionFailed(_)
            | AppError::StoreWriteError(_) => (
                StatusCode::BAD_REQUEST,
                PREDICTION_FAILED_MESSAGE.to_string(),
            ),
            AppError::StoreReadError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                HISTORY_FAILED_MESSAGE.to_string(),
            ),
            AppError::Config(_) | AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }

    fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingFile
                | AppError::PayloadTooLarge
                | AppError::UnsupportedMediaType { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // 记录错误日志
        if self.is_client_error() {
            tracing::warn!("请求被拒绝: {}", self);
        } else {
            tracing::error!("应用错误: {}", self);
        }

        (status, Json(ApiResponse::<()>::fail(message))).into_response()
    }
}

/// 应用程序Result类型别名
pub type AppResult<T> = Result<T, AppError>;

/// 错误构造辅助函数
impl AppError {
    pub fn unsupported_media_type<T: Into<String>>(mime_type: T) -> Self {
        Self::UnsupportedMediaType {
            mime_type: mime_type.into(),
        }
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::DecodeError(msg.into())
    }

    pub fn model_unavailable<T: Into<String>>(msg: T) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn prediction_failed<T: Into<String>>(msg: T) -> Self {
        Self::PredictionFailed(msg.into())
    }

    pub fn store_read<T: Into<String>>(msg: T) -> Self {
        Self::StoreReadError(msg.into())
    }

    pub fn store_write<T: Into<String>>(msg: T) -> Self {
        Self::StoreWriteError(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}
