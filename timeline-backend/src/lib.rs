// src/lib.rs
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod signals;
pub mod tasks;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use types::ApiResponse;

use crate::config::AppConfig;
use crate::db::{create_db_pool, create_schema, schema_exists, DbPool};
use crate::error::AppError;
use crate::repository::class_repository::ClassRepository;
use crate::repository::notification_store::NotificationStore;
use crate::signals::mail_handler::ClassStartingMailHandler;
use crate::signals::SignalBus;
use crate::tasks::JobScheduler;
use crate::utils::email::{EmailService, Mailer};
use std::sync::Arc;

/// DB接続（スキーマ指定があれば作成してから接続）
pub async fn connect_database(config: &AppConfig) -> Result<DbPool, AppError> {
    if let Some(schema) = &config.db_schema {
        tracing::info!("Using schema: {}", schema);

        // search_path を設定しない基本接続でスキーマを確認
        let base_config = AppConfig {
            db_schema: None,
            ..config.clone()
        };
        let base_pool = create_db_pool(&base_config).await?;

        if !schema_exists(&base_pool, schema).await? {
            tracing::info!("Schema does not exist, creating it: {}", schema);
            create_schema(&base_pool, schema).await?;
        }
    }

    Ok(create_db_pool(config).await?)
}

/// 通知ジョブ一式を組み立てる（メール送信ハンドラをシグナルバスに接続）
pub fn build_job_scheduler(config: &AppConfig, db_pool: DbPool) -> Result<JobScheduler, AppError> {
    let mailer: Arc<dyn Mailer> = Arc::new(EmailService::from_env()?);
    let store: Arc<dyn NotificationStore> = Arc::new(ClassRepository::new(db_pool));

    let signals = SignalBus::new()
        .with_handler(Arc::new(ClassStartingMailHandler::new(mailer.clone())));
    tracing::debug!(handlers = signals.handler_count(), "Signal handlers connected");

    Ok(tasks::build_scheduler(
        config,
        store,
        Arc::new(signals),
        mailer,
    ))
}
