//! Processor (CPU)

use super::{decimal_column, Entity, EntityKind, SqliteQuery, COMPONENT_PRICE, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{DecimalRange, IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const SOCKET_MAX_CHARS: usize = 50;
pub const TDP_W: IntRange = IntRange::new(1, 500, "W");
pub const BASE_CLOCK_GHZ: DecimalRange = DecimalRange::new(1, 100, 1, "GHz");
pub const CORE_COUNT: IntRange = IntRange::new(1, 128, "");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Processor {
    pub model: String,
    pub socket: String,
    /// Thermal design power
    pub tdp_w: i32,
    pub base_clock_ghz: Decimal,
    pub core_count: i32,
    pub price: Decimal,
}

impl Validate for Processor {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .required_text("socket", "Socket", &self.socket, SOCKET_MAX_CHARS)
            .int_range("tdp_w", "TDP", self.tdp_w, TDP_W)
            .decimal_range("base_clock_ghz", "Base clock", self.base_clock_ghz, BASE_CLOCK_GHZ)
            .int_range("core_count", "Core count", self.core_count, CORE_COUNT)
            .decimal_range("price", "Price", self.price, COMPONENT_PRICE)
            .finish()
    }
}

impl TableSchema for Processor {
    fn table_name() -> &'static str {
        EntityKind::Processor.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("socket", "TEXT").not_null(),
            ColumnDefinition::new("tdp_w", "INTEGER").not_null(),
            ColumnDefinition::new("base_clock_ghz", "TEXT").not_null(),
            ColumnDefinition::new("core_count", "INTEGER").not_null(),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for Processor {
    const KIND: EntityKind = EntityKind::Processor;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.socket)
            .bind(self.tdp_w)
            .bind(self.base_clock_ghz.to_string())
            .bind(self.core_count)
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Processor {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            socket: row.try_get("socket")?,
            tdp_w: row.try_get("tdp_w")?,
            base_clock_ghz: decimal_column(row, "base_clock_ghz")?,
            core_count: row.try_get("core_count")?,
            price: decimal_column(row, "price")?,
        })
    }
}
