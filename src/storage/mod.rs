pub mod json_file;

pub use json_file::JsonFileStore;

use crate::error::AppResult;
use crate::models::PredictionRecord;

/// 预测历史存储接口，只追加不修改
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// 追加一条记录
    async fn append(&self, record: &PredictionRecord) -> AppResult<()>;

    /// 按写入顺序读取全部记录，存储不存在时返回空列表
    async fn read_all(&self) -> AppResult<Vec<PredictionRecord>>;
}
