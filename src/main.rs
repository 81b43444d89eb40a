/*
 * Cancer Prediction Service
 * Copyright (c) 2024 Cancer Prediction Project
 *
 * This work is licensed under CC BY-NC-SA 4.0
 * https://creativecommons.org/licenses/by-nc-sa/4.0/
 */

use cancer_prediction_backend::{
    config::Config,
    error::AppResult,
    handlers::AppState,
    inference::{ModelHandle, PredictionPipeline, spawn_model_loader},
    routes::create_app,
    storage::JsonFileStore,
};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AppResult<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cancer_prediction_backend=debug,tower_http=debug,ort=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = match Config::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("已加载配置文件: config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("未能加载配置文件({})，使用默认配置", e);
            let default_config = Config::default();
            // 保存默认配置到文件
            if let Err(e) = default_config.save_to_file("config.toml") {
                tracing::warn!("保存默认配置失败: {}", e);
            }
            default_config
        }
    };

    tracing::info!("服务器配置: {}", config.server_addr());

    // 后台加载模型，加载完成前的预测请求直接失败
    let model = ModelHandle::new();
    spawn_model_loader(model.clone(), config.model.clone());

    let history = Arc::new(JsonFileStore::new(&config.history.path));
    tracing::info!("历史记录文件: {}", history.path().display());

    // 创建应用状态
    let app_state = AppState::new(PredictionPipeline::new(model), history, config.clone());
    let app = create_app(app_state);

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("服务器启动成功，监听地址: {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("服务器已关闭");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("收到关闭信号，开始优雅关闭");
}
