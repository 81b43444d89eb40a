use crate::docs::ApiDoc;
use crate::handlers::{AppState, get_histories, health_check, predict};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    response::Json,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// 创建API路由
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict)) // 上传图片并预测
        .route("/predict/histories", get(get_histories)) // 预测历史
}

/// 组装完整应用：业务路由、健康检查、文档以及中间件
pub fn create_app(app_state: AppState) -> Router {
    let body_limit = app_state.config.body_limit();

    // 创建CORS中间件
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(create_api_routes())
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(body_limit)) // 设置请求体大小限制
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
