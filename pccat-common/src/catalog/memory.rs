//! Memory module (RAM)

use super::{decimal_column, Entity, EntityKind, SqliteQuery, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{DecimalRange, IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const MEMORY_TYPE_MAX_CHARS: usize = 20;
pub const CAPACITY_GB: IntRange = IntRange::new(1, 256, "GB");
pub const FREQUENCY_MHZ: IntRange = IntRange::new(800, 10_000, "MHz");
/// Memory tops out one cent below the other components
pub const MEMORY_PRICE: DecimalRange = DecimalRange::new(1, 99_999_999, 2, "");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryModule {
    pub model: String,
    /// e.g. "DDR4", "DDR5"
    pub memory_type: String,
    /// Capacity of a single module
    pub capacity_gb: i32,
    pub frequency_mhz: i32,
    pub price: Decimal,
}

impl Validate for MemoryModule {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .required_text("memory_type", "Type", &self.memory_type, MEMORY_TYPE_MAX_CHARS)
            .int_range("capacity_gb", "Capacity", self.capacity_gb, CAPACITY_GB)
            .int_range("frequency_mhz", "Frequency", self.frequency_mhz, FREQUENCY_MHZ)
            .decimal_range("price", "Price", self.price, MEMORY_PRICE)
            .finish()
    }
}

impl TableSchema for MemoryModule {
    fn table_name() -> &'static str {
        EntityKind::MemoryModule.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("memory_type", "TEXT").not_null(),
            ColumnDefinition::new("capacity_gb", "INTEGER").not_null(),
            ColumnDefinition::new("frequency_mhz", "INTEGER").not_null(),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for MemoryModule {
    const KIND: EntityKind = EntityKind::MemoryModule;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.memory_type)
            .bind(self.capacity_gb)
            .bind(self.frequency_mhz)
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for MemoryModule {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            memory_type: row.try_get("memory_type")?,
            capacity_gb: row.try_get("capacity_gb")?,
            frequency_mhz: row.try_get("frequency_mhz")?,
            price: decimal_column(row, "price")?,
        })
    }
}
