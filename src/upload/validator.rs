use super::{AcceptedImage, MAX_UPLOAD_BYTES, UploadedFile};
use crate::error::{AppError, AppResult};

/// 上传文件验证器
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(MAX_UPLOAD_BYTES)
    }
}

impl UploadValidator {
    /// 创建新的上传验证器
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// 依次检查：是否上传、大小、MIME类型
    pub fn validate(&self, candidate: Option<UploadedFile>) -> AppResult<AcceptedImage> {
        let file = candidate.ok_or(AppError::MissingFile)?;

        self.validate_file_size(&file)?;
        let content_type = self.validate_mime_type(file.content_type.as_deref())?;

        Ok(AcceptedImage {
            file_name: file.file_name,
            content_type,
            data: file.data,
        })
    }

    /// 验证文件大小
    fn validate_file_size(&self, file: &UploadedFile) -> AppResult<()> {
        if file.size() > self.max_file_size {
            return Err(AppError::PayloadTooLarge);
        }

        Ok(())
    }

    /// 只看客户端声明的类型，不做内容嗅探
    fn validate_mime_type(&self, mime_type: Option<&str>) -> AppResult<String> {
        match mime_type {
            Some(mime) if mime.starts_with("image/") => Ok(mime.to_string()),
            Some(mime) => Err(AppError::unsupported_media_type(mime)),
            None => Err(AppError::unsupported_media_type("")),
        }
    }
}
