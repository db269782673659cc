//! Storage device (SSD/HDD)

use super::{decimal_column, Entity, EntityKind, SqliteQuery, COMPONENT_PRICE, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const DEVICE_TYPE_MAX_CHARS: usize = 20;
pub const CAPACITY_GB: IntRange = IntRange::new(1, 20_000, "GB");
/// Applies to both sequential read and write speed
pub const THROUGHPUT_MB_S: IntRange = IntRange::new(10, 15_000, "MB/s");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageDevice {
    pub model: String,
    /// e.g. "NVMe SSD", "HDD"
    pub device_type: String,
    pub capacity_gb: i32,
    pub read_mb_s: i32,
    pub write_mb_s: i32,
    pub price: Decimal,
}

impl Validate for StorageDevice {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .required_text("device_type", "Type", &self.device_type, DEVICE_TYPE_MAX_CHARS)
            .int_range("capacity_gb", "Capacity", self.capacity_gb, CAPACITY_GB)
            .int_range("read_mb_s", "Read speed", self.read_mb_s, THROUGHPUT_MB_S)
            .int_range("write_mb_s", "Write speed", self.write_mb_s, THROUGHPUT_MB_S)
            .decimal_range("price", "Price", self.price, COMPONENT_PRICE)
            .finish()
    }
}

impl TableSchema for StorageDevice {
    fn table_name() -> &'static str {
        EntityKind::StorageDevice.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("device_type", "TEXT").not_null(),
            ColumnDefinition::new("capacity_gb", "INTEGER").not_null(),
            ColumnDefinition::new("read_mb_s", "INTEGER").not_null(),
            ColumnDefinition::new("write_mb_s", "INTEGER").not_null(),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for StorageDevice {
    const KIND: EntityKind = EntityKind::StorageDevice;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.device_type)
            .bind(self.capacity_gb)
            .bind(self.read_mb_s)
            .bind(self.write_mb_s)
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for StorageDevice {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            device_type: row.try_get("device_type")?,
            capacity_gb: row.try_get("capacity_gb")?,
            read_mb_s: row.try_get("read_mb_s")?,
            write_mb_s: row.try_get("write_mb_s")?,
            price: decimal_column(row, "price")?,
        })
    }
}
