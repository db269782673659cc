//! Pre-built configuration
//!
//! A build names exactly one component of each type by its model string.
//! The references are plain text columns: no foreign keys are declared, so a
//! build may outlive or predate the components it names. Totals are stored
//! as supplied, never recomputed here.

use super::{decimal_column, Entity, EntityKind, SqliteQuery};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{DecimalRange, IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const BUILD_ID_MAX_CHARS: usize = 50;
pub const PERFORMANCE_TIER_MAX_CHARS: usize = 50;
pub const TOTAL_PRICE: DecimalRange = DecimalRange::new(1, 1_000_000_000, 2, "");
pub const TOTAL_POWER_W: IntRange = IntRange::new(100, 2000, "W");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Build {
    pub build_id: String,
    pub motherboard_model: String,
    pub processor_model: String,
    pub memory_model: String,
    pub gpu_model: String,
    pub storage_model: String,
    pub power_supply_model: String,
    pub case_model: String,
    /// Aggregate performance tier of the whole build
    pub performance_tier: String,
    pub total_price: Decimal,
    pub total_power_w: i32,
}

impl Build {
    /// Component references paired with the kind each one names
    pub fn component_refs(&self) -> [(EntityKind, &str); 7] {
        [
            (EntityKind::Motherboard, self.motherboard_model.as_str()),
            (EntityKind::Processor, self.processor_model.as_str()),
            (EntityKind::MemoryModule, self.memory_model.as_str()),
            (EntityKind::Gpu, self.gpu_model.as_str()),
            (EntityKind::StorageDevice, self.storage_model.as_str()),
            (EntityKind::PowerSupply, self.power_supply_model.as_str()),
            (EntityKind::Case, self.case_model.as_str()),
        ]
    }
}

impl Validate for Build {
    fn validate(&self) -> Vec<Violation> {
        // Reference columns carry no length rule, only presence
        Validator::new()
            .required_text("build_id", "Build ID", &self.build_id, BUILD_ID_MAX_CHARS)
            .required("motherboard_model", "Motherboard", &self.motherboard_model)
            .required("processor_model", "Processor", &self.processor_model)
            .required("memory_model", "Memory", &self.memory_model)
            .required("gpu_model", "GPU", &self.gpu_model)
            .required("storage_model", "Storage", &self.storage_model)
            .required("power_supply_model", "Power supply", &self.power_supply_model)
            .required("case_model", "Case", &self.case_model)
            .required_text(
                "performance_tier",
                "Performance tier",
                &self.performance_tier,
                PERFORMANCE_TIER_MAX_CHARS,
            )
            .decimal_range("total_price", "Total price", self.total_price, TOTAL_PRICE)
            .int_range("total_power_w", "Total power", self.total_power_w, TOTAL_POWER_W)
            .finish()
    }
}

impl TableSchema for Build {
    fn table_name() -> &'static str {
        EntityKind::Build.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("build_id", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("motherboard_model", "TEXT").not_null(),
            ColumnDefinition::new("processor_model", "TEXT").not_null(),
            ColumnDefinition::new("memory_model", "TEXT").not_null(),
            ColumnDefinition::new("gpu_model", "TEXT").not_null(),
            ColumnDefinition::new("storage_model", "TEXT").not_null(),
            ColumnDefinition::new("power_supply_model", "TEXT").not_null(),
            ColumnDefinition::new("case_model", "TEXT").not_null(),
            ColumnDefinition::new("performance_tier", "TEXT").not_null(),
            ColumnDefinition::new("total_price", "TEXT").not_null(),
            ColumnDefinition::new("total_power_w", "INTEGER").not_null(),
        ]
    }
}

impl Entity for Build {
    const KIND: EntityKind = EntityKind::Build;

    fn key(&self) -> &str {
        &self.build_id
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.motherboard_model)
            .bind(&self.processor_model)
            .bind(&self.memory_model)
            .bind(&self.gpu_model)
            .bind(&self.storage_model)
            .bind(&self.power_supply_model)
            .bind(&self.case_model)
            .bind(&self.performance_tier)
            .bind(self.total_price.to_string())
            .bind(self.total_power_w)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Build {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            build_id: row.try_get("build_id")?,
            motherboard_model: row.try_get("motherboard_model")?,
            processor_model: row.try_get("processor_model")?,
            memory_model: row.try_get("memory_model")?,
            gpu_model: row.try_get("gpu_model")?,
            storage_model: row.try_get("storage_model")?,
            power_supply_model: row.try_get("power_supply_model")?,
            case_model: row.try_get("case_model")?,
            performance_tier: row.try_get("performance_tier")?,
            total_price: decimal_column(row, "total_price")?,
            total_power_w: row.try_get("total_power_w")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaming() -> Build {
        Build {
            build_id: "GAMING-2024-01".to_string(),
            motherboard_model: "ASUS ROG STRIX Z790-E".to_string(),
            processor_model: "Intel Core i9-13900K".to_string(),
            memory_model: "Kingston FURY Beast 16GB".to_string(),
            gpu_model: "NVIDIA GeForce RTX 4070".to_string(),
            storage_model: "Samsung 990 PRO 2TB".to_string(),
            power_supply_model: "Corsair RM850x".to_string(),
            case_model: "Fractal Design North".to_string(),
            performance_tier: "High".to_string(),
            total_price: Decimal::new(18_999_900, 2),
            total_power_w: 850,
        }
    }

    #[test]
    fn test_valid_build() {
        assert!(gaming().validate().is_empty());
    }

    #[test]
    fn test_every_reference_is_required() {
        let build = Build {
            motherboard_model: String::new(),
            processor_model: String::new(),
            memory_model: String::new(),
            gpu_model: String::new(),
            storage_model: String::new(),
            power_supply_model: String::new(),
            case_model: "  ".to_string(),
            ..gaming()
        };
        let violations = build.validate();
        assert_eq!(violations.len(), 7);
        assert!(violations.iter().all(|v| v.message.ends_with("is required")));
    }

    #[test]
    fn test_totals_bounds() {
        let build = Build {
            total_price: Decimal::new(1_000_000_001, 2),
            total_power_w: 99,
            ..gaming()
        };
        let fields: Vec<&str> = build.validate().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["total_price", "total_power_w"]);

        let build = Build {
            total_price: Decimal::from(10_000_000),
            total_power_w: 2000,
            ..gaming()
        };
        assert!(build.validate().is_empty());
    }

    #[test]
    fn test_component_refs_cover_every_component_kind() {
        let build = gaming();
        let refs = build.component_refs();
        let kinds: Vec<EntityKind> = refs.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, EntityKind::ALL[..7].to_vec());
        assert_eq!(refs[1].1, "Intel Core i9-13900K");
    }
}
