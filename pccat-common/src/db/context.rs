//! Data-access context
//!
//! [`CatalogContext`] owns the pool and hands out one [`Collection`] per
//! entity type. Every operation validates (for writes), acquires one pooled
//! connection, runs a single statement, and releases the connection when the
//! guard drops, on success and failure alike.

use crate::catalog::{
    Build, Case, Entity, EntityKind, Gpu, MemoryModule, Motherboard, PowerSupply, Processor,
    StorageDevice,
};
use crate::config::DatabaseConfig;
use crate::db::init::{ensure_schema, open_pool, verify_schema};
use crate::db::schema::SchemaDrift;
use crate::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::marker::PhantomData;
use tracing::debug;

/// Catalog table with its row count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub row_count: i64,
}

/// A build reference that names no existing component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub kind: EntityKind,
    pub model: String,
}

/// Entry point to the persisted catalog
#[derive(Debug, Clone)]
pub struct CatalogContext {
    pool: SqlitePool,
}

impl CatalogContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to an existing store; tables are not created
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(open_pool(config, false).await?))
    }

    /// Create the store if needed and materialize missing tables
    ///
    /// Returns the context and the tables created by this call.
    pub async fn bootstrap(config: &DatabaseConfig) -> Result<(Self, Vec<&'static str>)> {
        let ctx = Self::new(open_pool(config, true).await?);
        let created = ctx.ensure_schema().await?;
        Ok((ctx, created))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn ensure_schema(&self) -> Result<Vec<&'static str>> {
        ensure_schema(&self.pool).await
    }

    pub async fn verify_schema(&self) -> Result<Vec<SchemaDrift>> {
        verify_schema(&self.pool).await
    }

    pub fn collection<E: Entity>(&self) -> Collection<'_, E> {
        Collection {
            pool: &self.pool,
            _entity: PhantomData,
        }
    }

    pub fn motherboards(&self) -> Collection<'_, Motherboard> {
        self.collection()
    }

    pub fn processors(&self) -> Collection<'_, Processor> {
        self.collection()
    }

    pub fn memory_modules(&self) -> Collection<'_, MemoryModule> {
        self.collection()
    }

    pub fn gpus(&self) -> Collection<'_, Gpu> {
        self.collection()
    }

    pub fn storage_devices(&self) -> Collection<'_, StorageDevice> {
        self.collection()
    }

    pub fn power_supplies(&self) -> Collection<'_, PowerSupply> {
        self.collection()
    }

    pub fn cases(&self) -> Collection<'_, Case> {
        self.collection()
    }

    pub fn builds(&self) -> Collection<'_, Build> {
        self.collection()
    }

    /// Key presence check for any kind, without decoding the row
    pub async fn key_exists(&self, kind: EntityKind, key: &str) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            kind.table_name(),
            kind.key_column()
        );
        let mut conn = self.pool.acquire().await?;
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }

    /// References of `build` that name no existing component
    ///
    /// Read-only; build writes never consult this.
    pub async fn dangling_references(&self, build: &Build) -> Result<Vec<DanglingReference>> {
        let mut dangling = Vec::new();
        for (kind, model) in build.component_refs() {
            if !self.key_exists(kind, model).await? {
                dangling.push(DanglingReference {
                    kind,
                    model: model.to_string(),
                });
            }
        }
        Ok(dangling)
    }

    /// Row counts of all catalog tables, in registry order
    pub async fn table_overview(&self) -> Result<Vec<TableInfo>> {
        let mut tables = Vec::with_capacity(EntityKind::ALL.len());
        let mut conn = self.pool.acquire().await?;

        for kind in EntityKind::ALL {
            let row_count: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.table_name()))
                    .fetch_one(&mut *conn)
                    .await?;
            tables.push(TableInfo {
                name: kind.table_name(),
                row_count,
            });
        }

        Ok(tables)
    }
}

/// CRUD access to one entity table
pub struct Collection<'a, E> {
    pool: &'a SqlitePool,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Collection<'a, E> {
    fn not_found(key: &str) -> Error {
        Error::NotFound {
            entity: E::KIND.label(),
            key: key.to_string(),
        }
    }

    /// Insert a new record; `DuplicateKey` if the key is taken
    pub async fn insert(&self, record: &E) -> Result<()> {
        record.check()?;

        let sql = E::insert_sql();
        let query = record.bind_fields(sqlx::query(&sql).bind(record.key()));

        let mut conn = self.pool.acquire().await?;
        match query.execute(&mut *conn).await {
            Ok(_) => {
                debug!("Inserted {} '{}'", E::KIND, record.key());
                Ok(())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::DuplicateKey {
                    entity: E::KIND.label(),
                    key: record.key().to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace every non-key field of an existing record
    pub async fn update(&self, record: &E) -> Result<()> {
        record.check()?;

        let sql = E::update_sql();
        let query = record.bind_fields(sqlx::query(&sql)).bind(record.key());

        let mut conn = self.pool.acquire().await?;
        let result = query.execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(Self::not_found(record.key()));
        }

        debug!("Updated {} '{}'", E::KIND, record.key());
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", E::table_name(), E::key_column());

        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(&sql).bind(key).execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(Self::not_found(key));
        }

        debug!("Deleted {} '{}'", E::KIND, key);
        Ok(())
    }

    /// Fetch by key; `NotFound` if absent
    pub async fn get(&self, key: &str) -> Result<E> {
        self.find(key).await?.ok_or_else(|| Self::not_found(key))
    }

    pub async fn find(&self, key: &str) -> Result<Option<E>> {
        let sql = format!("{} WHERE {} = ?", E::select_sql(), E::key_column());

        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, E>(&sql)
            .bind(key)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(record)
    }

    /// All records in rowid order
    ///
    /// Rowid order is insertion order until a `VACUUM`, which may renumber
    /// rowids of tables without an `INTEGER PRIMARY KEY`.
    pub async fn list(&self) -> Result<Vec<E>> {
        let sql = format!("{} ORDER BY rowid", E::select_sql());

        let mut conn = self.pool.acquire().await?;
        let records = sqlx::query_as::<_, E>(&sql).fetch_all(&mut *conn).await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::table_name());

        let mut conn = self.pool.acquire().await?;
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
        Ok(count)
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            E::table_name(),
            E::key_column()
        );

        let mut conn = self.pool.acquire().await?;
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }
}
