pub mod validator;

pub use validator::UploadValidator;

use crate::error::{AppError, AppResult};
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;

/// 单个上传文件允许的最大字节数
pub const MAX_UPLOAD_BYTES: u64 = 1_000_000;

/// 承载图片的表单字段名
pub const IMAGE_FIELD: &str = "image";

/// 从multipart中读取到的候选文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 客户端声明的文件名
    pub file_name: Option<String>,
    /// 客户端声明的MIME类型
    pub content_type: Option<String>,
    /// 文件内容
    pub data: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// 通过校验的图片，内容原样透传
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

/// 读取名为 `image` 的文件字段，其余字段直接跳过
///
/// 没有 `filename` 的同名字段是普通表单文本，不算上传文件。
pub async fn read_image_field(multipart: &mut Multipart) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!("跳过没有文件名的 {} 字段", IMAGE_FIELD);
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await.map_err(map_multipart_error)?;

        return Ok(Some(UploadedFile {
            file_name: Some(file_name),
            content_type,
            data,
        }));
    }

    Ok(None)
}

/// 传输层超限与文件超限返回同一个错误
fn map_multipart_error(err: MultipartError) -> AppError {
    let error_msg = err.body_text();
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE
        || error_msg.contains("length limit")
        || error_msg.contains("body longer than")
    {
        AppError::PayloadTooLarge
    } else {
        tracing::warn!("multipart解析失败: {}", error_msg);
        AppError::MissingFile
    }
}
