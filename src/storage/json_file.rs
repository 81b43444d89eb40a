use super::HistoryStore;
use crate::error::{AppError, AppResult};
use crate::models::PredictionRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// 单个JSON文件保存全部历史，每次追加整体重写
///
/// 追加操作通过互斥锁串行执行，并发预测不会丢失记录。
/// 写入先落到临时文件再重命名，读取方不会看到写了一半的文件，因此读取不加锁。
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<PredictionRecord>, LoadError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LoadError::Io(e)),
        };

        serde_json::from_slice(&content).map_err(LoadError::Parse)
    }

    async fn persist(&self, records: &[PredictionRecord]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_vec_pretty(records)?;
        let temp_path = self.temp_path();

        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

enum LoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "读取文件失败: {}", e),
            LoadError::Parse(e) => write!(f, "解析JSON失败: {}", e),
        }
    }
}

#[async_trait::async_trait]
impl HistoryStore for JsonFileStore {
    async fn append(&self, record: &PredictionRecord) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await.map_err(|e| {
            AppError::store_write(format!("无法读取现有历史 {}: {}", self.path.display(), e))
        })?;
        records.push(record.clone());

        self.persist(&records).await.map_err(|e| {
            AppError::store_write(format!("写入历史失败 {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("已追加预测记录 {}, 共 {} 条", record.id, records.len());
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Vec<PredictionRecord>> {
        self.load()
            .await
            .map_err(|e| AppError::store_read(format!("{}: {}", self.path.display(), e)))
    }
}
