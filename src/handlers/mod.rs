pub mod prediction;
pub mod system;

pub use prediction::{get_histories, predict};
pub use system::health_check;

use crate::{
    config::Config, inference::PredictionPipeline, storage::HistoryStore,
    upload::UploadValidator,
};
use std::sync::Arc;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PredictionPipeline,
    pub history: Arc<dyn HistoryStore>,
    pub validator: UploadValidator,
    pub config: Config,
}

impl AppState {
    pub fn new(pipeline: PredictionPipeline, history: Arc<dyn HistoryStore>, config: Config) -> Self {
        Self {
            pipeline,
            history,
            validator: UploadValidator::default(),
            config,
        }
    }
}
