use crate::error::{AppError, AppResult};
use crate::upload::MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 应用程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    pub model: ModelConfig,
    pub history: HistoryConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// 上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// 传输层为multipart边界和头部额外预留的字节数
    pub multipart_overhead: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            multipart_overhead: 64 * 1024,
        }
    }
}

/// 模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// ONNX模型文件路径
    pub path: String,
    /// 单次推理使用的线程数
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_intra_threads() -> usize {
    1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "submissions-model/model.onnx".to_string(),
            intra_threads: default_intra_threads(),
        }
    }
}

/// 历史记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// 历史记录JSON文件路径
    pub path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "predictions.json".to_string(),
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::config(format!("解析配置文件失败: {}", e)))?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::config("服务器端口不能为0"));
        }

        if self.model.path.is_empty() {
            return Err(AppError::config("模型路径不能为空"));
        }

        if self.model.intra_threads == 0 {
            return Err(AppError::config("推理线程数不能为0"));
        }

        if self.history.path.is_empty() {
            return Err(AppError::config("历史记录路径不能为空"));
        }

        Ok(())
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 请求体大小上限：文件上限加上multipart开销
    pub fn body_limit(&self) -> usize {
        MAX_UPLOAD_BYTES as usize + self.upload.multipart_overhead
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
