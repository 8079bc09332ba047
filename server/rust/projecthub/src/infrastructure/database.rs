use sqlx::PgPool;

use super::config::DatabaseConfig;

/// PostgreSQL 接続プールを作成する。DATABASE_URL が設定されていれば設定ファイルより優先する。
pub async fn connect(cfg: Option<&DatabaseConfig>) -> anyhow::Result<Option<PgPool>> {
    let env_url = std::env::var("DATABASE_URL").ok();
    let (url, max_connections) = match (env_url, cfg) {
        (Some(url), Some(cfg)) => (url, cfg.max_open_conns),
        (Some(url), None) => (url, 25),
        (None, Some(cfg)) => (cfg.connection_url(), cfg.max_open_conns),
        (None, None) => return Ok(None),
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&url)
        .await?;
    Ok(Some(pool))
}

/// スキーマのマイグレーションを適用する。
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
