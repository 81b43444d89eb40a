use super::{ModelHandle, preprocess};
use crate::error::{AppError, AppResult};
use crate::models::{PredictionRecord, PredictionResult};
use crate::upload::AcceptedImage;
use ndarray::ArrayD;

/// 预测流水线：解码 → 预处理 → 推理 → 阈值判定 → 生成记录
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    model: ModelHandle,
}

impl PredictionPipeline {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// 对已通过校验的图片执行一次预测
    pub async fn predict(&self, image: AcceptedImage) -> AppResult<PredictionRecord> {
        let classifier = self.model.classifier()?;

        let score = tokio::task::spawn_blocking(move || -> AppResult<f64> {
            let input = preprocess::prepare_input(&image.data)?;
            let output = classifier
                .predict(input)
                .map_err(|e| AppError::prediction_failed(format!("{:#}", e)))?;
            extract_score(&output)
        })
        .await
        .map_err(|e| AppError::prediction_failed(format!("推理任务异常退出: {}", e)))??;

        let result = PredictionResult::from_score(score);
        tracing::info!("预测完成: score={:.3}, result={}", score, result);

        Ok(PredictionRecord::new(result))
    }
}

/// 取输出的第一个元素作为分数，保留三位小数
pub fn extract_score(output: &ArrayD<f32>) -> AppResult<f64> {
    let raw = output
        .iter()
        .next()
        .copied()
        .ok_or_else(|| AppError::prediction_failed("模型输出为空"))?;

    if !raw.is_finite() {
        return Err(AppError::prediction_failed(format!("模型输出非法分数: {}", raw)));
    }

    let score = round_score(raw as f64);
    tracing::debug!("原始分数: {}, 取整后: {}", raw, score);

    Ok(score)
}

pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
