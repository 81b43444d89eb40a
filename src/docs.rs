use crate::{
    handlers::{prediction::PredictUpload, system::HealthStatus},
    models::{HistoryDetail, HistoryEntry, PredictionRecord, PredictionResult},
    response::ResponseStatus,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // 预测API
        crate::handlers::prediction::predict,
        crate::handlers::prediction::get_histories,
        // 系统API
        crate::handlers::system::health_check,
    ),
    components(
        schemas(
            PredictionRecord,
            PredictionResult,
            HistoryEntry,
            HistoryDetail,
            PredictUpload,
            HealthStatus,
            ResponseStatus,
        )
    ),
    tags(
        (name = "prediction", description = "图片预测与历史记录"),
        (name = "system", description = "健康检查")
    ),
    info(
        title = "Cancer Prediction API",
        version = "0.1.0",
        description = "上传图片进行二分类预测，并查询预测历史"
    )
)]
pub struct ApiDoc;
