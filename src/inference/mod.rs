pub mod onnx;
pub mod pipeline;
pub mod preprocess;

pub use onnx::OnnxClassifier;
pub use pipeline::PredictionPipeline;

use crate::config::ModelConfig;
use crate::error::{AppError, AppResult};
use ndarray::ArrayD;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// 二分类模型接口：输入张量，输出张量
pub trait Classifier: Send + Sync + 'static {
    fn predict(&self, input: ArrayD<f32>) -> anyhow::Result<ArrayD<f32>>;
}

/// 模型加载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed,
}

enum ModelSlot {
    Ready(Arc<dyn Classifier>),
    Failed(String),
}

/// 进程内共享的模型句柄，只能设置一次
#[derive(Clone, Default)]
pub struct ModelHandle {
    slot: Arc<OnceLock<ModelSlot>>,
}

impl ModelHandle {
    /// 创建尚未加载的句柄
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建已就绪的句柄
    pub fn ready(classifier: impl Classifier) -> Self {
        let handle = Self::new();
        handle.install(Arc::new(classifier));
        handle
    }

    /// 安装加载完成的模型，已设置过则返回false
    pub fn install(&self, classifier: Arc<dyn Classifier>) -> bool {
        self.slot.set(ModelSlot::Ready(classifier)).is_ok()
    }

    /// 标记加载失败，进程重启前不再重试
    pub fn mark_failed(&self, reason: impl Into<String>) -> bool {
        self.slot.set(ModelSlot::Failed(reason.into())).is_ok()
    }

    pub fn status(&self) -> ModelStatus {
        match self.slot.get() {
            None => ModelStatus::Loading,
            Some(ModelSlot::Ready(_)) => ModelStatus::Ready,
            Some(ModelSlot::Failed(_)) => ModelStatus::Failed,
        }
    }

    /// 获取模型，未就绪时快速失败
    pub fn classifier(&self) -> AppResult<Arc<dyn Classifier>> {
        match self.slot.get() {
            Some(ModelSlot::Ready(classifier)) => Ok(classifier.clone()),
            Some(ModelSlot::Failed(reason)) => Err(AppError::model_unavailable(format!(
                "模型加载失败: {}",
                reason
            ))),
            None => Err(AppError::model_unavailable("模型尚未加载完成")),
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("status", &self.status())
            .finish()
    }
}

/// 在阻塞线程池中加载模型，服务无需等待加载完成即可启动
pub fn spawn_model_loader(handle: ModelHandle, config: ModelConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("开始加载模型: {}", config.path);

        let loaded = tokio::task::spawn_blocking(move || OnnxClassifier::load(&config)).await;

        match loaded {
            Ok(Ok(classifier)) => {
                handle.install(Arc::new(classifier));
                tracing::info!("模型加载成功");
            }
            Ok(Err(e)) => {
                tracing::error!("模型加载失败: {:#}", e);
                handle.mark_failed(e.to_string());
            }
            Err(e) => {
                tracing::error!("模型加载任务异常退出: {}", e);
                handle.mark_failed(e.to_string());
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Classifier for Echo {
        fn predict(&self, input: ArrayD<f32>) -> anyhow::Result<ArrayD<f32>> {
            Ok(input)
        }
    }

    #[test]
    fn test_handle_starts_loading() {
        let handle = ModelHandle::new();
        assert_eq!(handle.status(), ModelStatus::Loading);
        assert!(matches!(
            handle.classifier(),
            Err(AppError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_handle_is_set_once() {
        let handle = ModelHandle::ready(Echo);
        assert_eq!(handle.status(), ModelStatus::Ready);
        assert!(handle.classifier().is_ok());

        // 之后的设置全部被忽略
        assert!(!handle.mark_failed("late failure"));
        assert!(!handle.install(Arc::new(Echo)));
        assert_eq!(handle.status(), ModelStatus::Ready);
    }

    #[test]
    fn test_failed_load_is_permanent() {
        let handle = ModelHandle::new();
        assert!(handle.mark_failed("file not found"));
        assert_eq!(handle.status(), ModelStatus::Failed);

        assert!(!handle.install(Arc::new(Echo)));
        assert!(matches!(
            handle.classifier(),
            Err(AppError::ModelUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_loader_marks_missing_model_failed() {
        let handle = ModelHandle::new();
        let config = ModelConfig {
            path: "does/not/exist.onnx".to_string(),
            intra_threads: 1,
        };

        spawn_model_loader(handle.clone(), config).await.unwrap();

        assert_eq!(handle.status(), ModelStatus::Failed);
    }
}
