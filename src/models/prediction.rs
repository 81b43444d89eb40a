use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

/// 判定阈值，分数严格大于该值才判为 Cancer
pub const CANCER_THRESHOLD: f64 = 0.58;

/// 预测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PredictionResult {
    /// 检测到癌症
    Cancer,
    /// 未检测到癌症
    #[serde(alias = "Non-cancer")]
    NonCancer,
}

impl PredictionResult {
    /// 根据分类器分数判定结果
    pub fn from_score(score: f64) -> Self {
        if score > CANCER_THRESHOLD {
            PredictionResult::Cancer
        } else {
            PredictionResult::NonCancer
        }
    }

    /// 获取对应的建议
    pub fn suggestion(&self) -> &'static str {
        match self {
            PredictionResult::Cancer => "Segera periksa ke dokter!",
            PredictionResult::NonCancer => "Penyakit kanker tidak terdeteksi.",
        }
    }
}

impl std::fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionResult::Cancer => write!(f, "Cancer"),
            PredictionResult::NonCancer => write!(f, "NonCancer"),
        }
    }
}

/// 预测记录，写入后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    /// 记录唯一标识符（UUID v4 字符串）
    pub id: String,
    /// 预测结果
    pub result: PredictionResult,
    /// 根据结果给出的建议
    pub suggestion: String,
    /// 创建时间（UTC，ISO-8601 毫秒精度）
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// 为一次成功的预测创建新记录，时间截断到毫秒以便与落盘格式一致
    pub fn new(result: PredictionResult) -> Self {
        Self::with_timestamp(result, Utc::now().trunc_subsecs(3))
    }

    pub fn with_timestamp(result: PredictionResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            result,
            suggestion: result.suggestion().to_string(),
            created_at,
        }
    }
}

/// 历史记录展示格式中的明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetail {
    pub result: PredictionResult,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub suggestion: String,
    pub id: String,
}

/// 历史记录展示格式，id 在外层和 history 内各出现一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub id: String,
    pub history: HistoryDetail,
}

impl From<PredictionRecord> for HistoryEntry {
    fn from(record: PredictionRecord) -> Self {
        Self {
            id: record.id.clone(),
            history: HistoryDetail {
                result: record.result,
                created_at: record.created_at,
                suggestion: record.suggestion,
                id: record.id,
            },
        }
    }
}

/// `Date.prototype.toISOString` 风格的时间格式
mod iso_millis {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(PredictionResult::from_score(0.91), PredictionResult::Cancer);
        assert_eq!(PredictionResult::from_score(0.581), PredictionResult::Cancer);
        assert_eq!(PredictionResult::from_score(0.58), PredictionResult::NonCancer);
        assert_eq!(PredictionResult::from_score(0.0), PredictionResult::NonCancer);
    }

    #[test]
    fn test_suggestion_follows_result() {
        let record = PredictionRecord::new(PredictionResult::Cancer);
        assert_eq!(record.suggestion, "Segera periksa ke dokter!");

        let record = PredictionRecord::new(PredictionResult::NonCancer);
        assert_eq!(record.suggestion, "Penyakit kanker tidak terdeteksi.");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = PredictionRecord::new(PredictionResult::Cancer);
        let b = PredictionRecord::new(PredictionResult::Cancer);
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_record_wire_format() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 30).unwrap();
        let mut record = PredictionRecord::with_timestamp(PredictionResult::NonCancer, created_at);
        record.id = "abc".to_string();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "abc",
                "result": "NonCancer",
                "suggestion": "Penyakit kanker tidak terdeteksi.",
                "createdAt": "2024-05-01T10:20:30.000Z"
            })
        );
    }

    #[test]
    fn test_reads_legacy_result_label() {
        let record: PredictionRecord = serde_json::from_value(json!({
            "id": "legacy",
            "result": "Non-cancer",
            "suggestion": "Penyakit kanker tidak terdeteksi.",
            "createdAt": "2024-11-02T08:15:42.517Z"
        }))
        .unwrap();

        assert_eq!(record.result, PredictionResult::NonCancer);
        assert_eq!(record.created_at.timestamp_subsec_millis(), 517);
    }

    #[test]
    fn test_history_entry_duplicates_id() {
        let record = PredictionRecord::new(PredictionResult::Cancer);
        let entry = HistoryEntry::from(record.clone());

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], json!(record.id));
        assert_eq!(value["history"]["id"], json!(record.id));
        assert_eq!(value["history"]["result"], json!("Cancer"));
        assert_eq!(value["history"]["suggestion"], json!(record.suggestion));
        assert!(value["history"]["createdAt"].is_string());
    }
}
