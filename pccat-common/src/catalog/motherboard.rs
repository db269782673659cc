//! Motherboard

use super::{decimal_column, Entity, EntityKind, SqliteQuery, COMPONENT_PRICE, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const FORM_FACTOR_MAX_CHARS: usize = 50;
pub const SOCKET_MAX_CHARS: usize = 50;
pub const MEMORY_TYPE_MAX_CHARS: usize = 50;
pub const STORAGE_INTERFACES_MAX_CHARS: usize = 100;
pub const MAX_MEMORY_GB: IntRange = IntRange::new(1, 2048, "GB");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Motherboard {
    pub model: String,
    pub form_factor: String,
    pub socket: String,
    /// Supported memory type, e.g. "DDR5"
    pub memory_type: String,
    pub max_memory_gb: i32,
    /// Free-text list, e.g. "SATA, M.2 NVMe"
    pub storage_interfaces: String,
    pub price: Decimal,
}

impl Validate for Motherboard {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .required_text("form_factor", "Form factor", &self.form_factor, FORM_FACTOR_MAX_CHARS)
            .required_text("socket", "Socket", &self.socket, SOCKET_MAX_CHARS)
            .required_text("memory_type", "Memory type", &self.memory_type, MEMORY_TYPE_MAX_CHARS)
            .int_range("max_memory_gb", "Max memory", self.max_memory_gb, MAX_MEMORY_GB)
            .required_text(
                "storage_interfaces",
                "Storage interfaces",
                &self.storage_interfaces,
                STORAGE_INTERFACES_MAX_CHARS,
            )
            .decimal_range("price", "Price", self.price, COMPONENT_PRICE)
            .finish()
    }
}

impl TableSchema for Motherboard {
    fn table_name() -> &'static str {
        EntityKind::Motherboard.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("form_factor", "TEXT").not_null(),
            ColumnDefinition::new("socket", "TEXT").not_null(),
            ColumnDefinition::new("memory_type", "TEXT").not_null(),
            ColumnDefinition::new("max_memory_gb", "INTEGER").not_null(),
            ColumnDefinition::new("storage_interfaces", "TEXT").not_null(),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for Motherboard {
    const KIND: EntityKind = EntityKind::Motherboard;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.form_factor)
            .bind(&self.socket)
            .bind(&self.memory_type)
            .bind(self.max_memory_gb)
            .bind(&self.storage_interfaces)
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Motherboard {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            form_factor: row.try_get("form_factor")?,
            socket: row.try_get("socket")?,
            memory_type: row.try_get("memory_type")?,
            max_memory_gb: row.try_get("max_memory_gb")?,
            storage_interfaces: row.try_get("storage_interfaces")?,
            price: decimal_column(row, "price")?,
        })
    }
}
