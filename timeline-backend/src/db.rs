// src/db.rs
use crate::config::AppConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_db_pool(config: &AppConfig) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());

    // 接続オプションを設定
    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(false);

    if let Some(schema) = &config.db_schema {
        opt.set_schema_search_path(schema.clone());
    }

    Database::connect(opt).await
}

// スキーマが存在するか確認するヘルパー関数
pub async fn schema_exists(conn: &DbPool, schema: &str) -> Result<bool, DbErr> {
    let result_opt = conn
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT EXISTS (SELECT 1 FROM information_schema.schemata WHERE schema_name = $1);",
            [schema.into()],
        ))
        .await?;

    // 結果が存在すれば処理、なければfalseを返す
    if let Some(result) = result_opt {
        let exists: bool = result.try_get("", "exists")?;
        Ok(exists)
    } else {
        Ok(false)
    }
}

// スキーマを作成するヘルパー関数
pub async fn create_schema(conn: &DbPool, schema: &str) -> Result<(), DbErr> {
    let create_schema = format!("CREATE SCHEMA IF NOT EXISTS \"{}\";", schema);
    conn.execute(Statement::from_string(
        sea_orm::DatabaseBackend::Postgres,
        create_schema,
    ))
    .await?;
    Ok(())
}
