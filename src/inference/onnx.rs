use super::Classifier;
use crate::config::ModelConfig;
use anyhow::{Context, anyhow};
use ndarray::ArrayD;
use ort::{
    environment::Environment,
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::path::Path;
use std::sync::Mutex;

/// 进程级默认 ONNX Runtime 环境（ort 每个进程只允许一个环境）
fn default_environment() -> ort::Result<Environment> {
    static ENV: Mutex<Option<Environment>> = Mutex::new(None);
    let mut guard = ENV.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(env) = guard.as_ref() {
        return Ok(env.clone());
    }
    let env = ort::init().build()?;
    *guard = Some(env.clone());
    Ok(env)
}

/// 基于 ONNX Runtime 的分类器，会话只读共享，运行时独占
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl OnnxClassifier {
    /// 从本地文件加载模型
    pub fn load(config: &ModelConfig) -> anyhow::Result<Self> {
        let path = Path::new(&config.path);
        if !path.exists() {
            return Err(anyhow!("模型文件不存在: {}", path.display()));
        }

        let session = default_environment()
            .and_then(|env| Session::builder(&env))
            .map_err(|e| anyhow!("创建会话构建器失败: {}", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| anyhow!("设置优化级别失败: {}", e))?
            .with_intra_threads(config.intra_threads)
            .map_err(|e| anyhow!("设置线程数失败: {}", e))?
            .commit_from_file(path)
            .map_err(|e| anyhow!("加载模型失败: {}", e))?;

        tracing::info!("ONNX会话已创建: {}", path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: ArrayD<f32>) -> anyhow::Result<ArrayD<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("session mutex poisoned: {}", e))?;

        let input = input.as_standard_layout();
        let tensor_ref = TensorRef::from_array_view(input.view())
            .map_err(|e| anyhow!("failed to build tensor: {}", e))?;

        let outputs = session
            .run(ort::inputs![tensor_ref])
            .map_err(|e| anyhow!("inference failed: {}", e))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| anyhow!("failed to extract tensor: {}", e))?;

        ArrayD::from_shape_vec(shape.to_ixdyn(), data.to_vec()).context("invalid tensor shape")
    }
}
