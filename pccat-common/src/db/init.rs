//! Database connection and schema bootstrap
//!
//! Opening a pool never creates tables. Table creation happens only in
//! [`ensure_schema`], which the operator runs explicitly (`pccat-admin init`).

use crate::catalog::EntityKind;
use crate::config::DatabaseConfig;
use crate::db::schema::{check_table, create_table_sql, SchemaDrift, SchemaIntrospector};
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, warn};

/// Open a pool on the configured store
///
/// With `create_if_missing` the database file (and its parent directory) is
/// created; otherwise an absent file is `StorageUnavailable`.
pub async fn open_pool(config: &DatabaseConfig, create_if_missing: bool) -> Result<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| Error::Config(format!("Invalid database URL '{}': {}", config.url, e)))?
        .busy_timeout(config.busy_timeout);

    if !config.is_in_memory() {
        let db_path = options.get_filename().to_path_buf();
        if create_if_missing {
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        } else if !db_path.exists() {
            return Err(Error::StorageUnavailable(format!(
                "Database not found: {} (run `pccat-admin init` first)",
                db_path.display()
            )));
        }

        // WAL allows concurrent readers with one writer
        options = options
            .create_if_missing(create_if_missing)
            .journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    info!("Opened catalog database: {}", config.url);
    Ok(pool)
}

/// Create every catalog table that does not exist yet
///
/// Idempotent and non-destructive: existing tables and rows are untouched.
/// Returns the tables created by this call.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<Vec<&'static str>> {
    let mut created = Vec::new();

    for kind in EntityKind::ALL {
        let table = kind.table_name();
        if SchemaIntrospector::table_exists(pool, table).await? {
            continue;
        }

        sqlx::query(&create_table_sql(table, &kind.columns()))
            .execute(pool)
            .await?;
        info!("Created table '{}'", table);
        created.push(table);
    }

    if created.is_empty() {
        info!("Catalog schema already present");
    }

    Ok(created)
}

/// Compare every catalog table with its declaration; nothing is modified
pub async fn verify_schema(pool: &SqlitePool) -> Result<Vec<SchemaDrift>> {
    let mut drift = Vec::new();

    for kind in EntityKind::ALL {
        let table_drift = check_table(pool, kind.table_name(), &kind.columns()).await?;
        for item in &table_drift {
            warn!("Schema drift: {}", item);
        }
        drift.extend(table_drift);
    }

    if drift.is_empty() {
        info!("✓ Catalog schema up to date");
    }

    Ok(drift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = open_pool(&DatabaseConfig::in_memory(), false).await.unwrap();

        let first = ensure_schema(&pool).await.unwrap();
        assert_eq!(first.len(), 8);
        assert_eq!(first[0], "motherboards");
        assert_eq!(first[7], "builds");

        let second = ensure_schema(&pool).await.unwrap();
        assert!(second.is_empty());

        assert!(verify_schema(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_only_missing_tables() {
        let pool = open_pool(&DatabaseConfig::in_memory(), false).await.unwrap();

        sqlx::query(&create_table_sql("gpus", &EntityKind::Gpu.columns()))
            .execute(&pool)
            .await
            .unwrap();

        let created = ensure_schema(&pool).await.unwrap();
        assert_eq!(created.len(), 7);
        assert!(!created.contains(&"gpus"));
    }

    #[tokio::test]
    async fn test_verify_reports_missing_tables_before_bootstrap() {
        let pool = open_pool(&DatabaseConfig::in_memory(), false).await.unwrap();

        let drift = verify_schema(&pool).await.unwrap();
        assert_eq!(drift.len(), 8);
        assert!(drift
            .iter()
            .all(|d| matches!(d, SchemaDrift::MissingTable { .. })));
    }

    #[tokio::test]
    async fn test_open_without_create_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("absent.db").display());

        let err = open_pool(&DatabaseConfig::new(url), false).await.unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_open_with_create_makes_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("catalog.db");
        let url = format!("sqlite://{}", db_path.display());

        let pool = open_pool(&DatabaseConfig::new(url), true).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool.close().await;

        assert!(db_path.exists());
    }
}
