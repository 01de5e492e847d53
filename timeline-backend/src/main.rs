// src/main.rs
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use timeline_backend::api::{app_router, AppState};
use timeline_backend::config::AppConfig;
use timeline_backend::logging::init_tracing;
use timeline_backend::service::calendar_service::CalendarService;
use timeline_backend::{build_job_scheduler, connect_database};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    tracing::info!("Starting Timeline Backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        scheduler_enabled = app_config.scheduler.enabled,
        "Configuration loaded"
    );

    let db_pool = connect_database(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    Migrator::up(&db_pool, None).await?;
    tracing::info!("Migrations applied.");

    // 定期ジョブの開始
    if app_config.scheduler.enabled {
        let scheduler = build_job_scheduler(&app_config, db_pool.clone())?;
        tracing::info!(jobs = ?scheduler.job_names(), "Starting job scheduler");
        let _handles = scheduler.spawn();
    } else {
        tracing::info!("Job scheduler disabled");
    }

    let app_config = Arc::new(app_config);
    let app_state = AppState::new(
        Arc::new(CalendarService::new(db_pool.clone())),
        app_config.clone(),
    );
    let app_router = app_router(app_state);

    let server_addr = app_config.server_addr();
    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
