//! Graphics card

use super::{decimal_column, Entity, EntityKind, SqliteQuery, COMPONENT_PRICE, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const PERFORMANCE_TIER_MAX_CHARS: usize = 50;
pub const VRAM_GB: IntRange = IntRange::new(1, 48, "GB");
pub const POWER_DRAW_W: IntRange = IntRange::new(50, 1000, "W");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Gpu {
    pub model: String,
    pub performance_tier: String,
    pub vram_gb: i32,
    pub power_draw_w: i32,
    pub price: Decimal,
}

impl Validate for Gpu {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .required_text(
                "performance_tier",
                "Performance tier",
                &self.performance_tier,
                PERFORMANCE_TIER_MAX_CHARS,
            )
            .int_range("vram_gb", "VRAM", self.vram_gb, VRAM_GB)
            .int_range("power_draw_w", "Power draw", self.power_draw_w, POWER_DRAW_W)
            .decimal_range("price", "Price", self.price, COMPONENT_PRICE)
            .finish()
    }
}

impl TableSchema for Gpu {
    fn table_name() -> &'static str {
        EntityKind::Gpu.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("performance_tier", "TEXT").not_null(),
            ColumnDefinition::new("vram_gb", "INTEGER").not_null(),
            ColumnDefinition::new("power_draw_w", "INTEGER").not_null(),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for Gpu {
    const KIND: EntityKind = EntityKind::Gpu;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.performance_tier)
            .bind(self.vram_gb)
            .bind(self.power_draw_w)
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Gpu {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            performance_tier: row.try_get("performance_tier")?,
            vram_gb: row.try_get("vram_gb")?,
            power_draw_w: row.try_get("power_draw_w")?,
            price: decimal_column(row, "price")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Gpu {
        Gpu {
            model: "NVIDIA GeForce RTX 4070".to_string(),
            performance_tier: "High".to_string(),
            vram_gb: 12,
            power_draw_w: 200,
            price: Decimal::new(6_499_900, 2),
        }
    }

    #[test]
    fn test_power_draw_bounds() {
        for (w, ok) in [(49, false), (50, true), (1000, true), (1001, false)] {
            let gpu = Gpu {
                power_draw_w: w,
                ..card()
            };
            assert_eq!(gpu.validate().is_empty(), ok, "power draw {}", w);
        }
    }

    #[test]
    fn test_vram_bounds() {
        for (gb, ok) in [(0, false), (1, true), (48, true), (49, false)] {
            let gpu = Gpu { vram_gb: gb, ..card() };
            assert_eq!(gpu.validate().is_empty(), ok, "vram {}", gb);
        }
    }

    #[test]
    fn test_price_bounds() {
        for (cents, ok) in [
            (0, false),
            (1, true),
            (100_000_000, true),
            (100_000_001, false),
        ] {
            let gpu = Gpu {
                price: Decimal::new(cents, 2),
                ..card()
            };
            assert_eq!(gpu.validate().is_empty(), ok, "price {}", cents);
        }
    }
}
