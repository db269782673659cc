//! Power supply unit

use super::{decimal_column, Entity, EntityKind, SqliteQuery, COMPONENT_PRICE, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{IntRange, Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const WATTAGE_W: IntRange = IntRange::new(100, 2000, "W");
pub const CERTIFICATION_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerSupply {
    pub model: String,
    pub wattage_w: i32,
    /// Efficiency certification, e.g. "80 PLUS Gold"; stored as NULL when absent
    #[serde(default)]
    pub certification: Option<String>,
    pub price: Decimal,
}

impl Validate for PowerSupply {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .int_range("wattage_w", "Wattage", self.wattage_w, WATTAGE_W)
            .optional_text(
                "certification",
                "Certification",
                self.certification.as_deref(),
                CERTIFICATION_MAX_CHARS,
            )
            .decimal_range("price", "Price", self.price, COMPONENT_PRICE)
            .finish()
    }
}

impl TableSchema for PowerSupply {
    fn table_name() -> &'static str {
        EntityKind::PowerSupply.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("wattage_w", "INTEGER").not_null(),
            ColumnDefinition::new("certification", "TEXT"),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for PowerSupply {
    const KIND: EntityKind = EntityKind::PowerSupply;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.wattage_w)
            .bind(self.certification.as_deref())
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for PowerSupply {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            wattage_w: row.try_get("wattage_w")?,
            certification: row.try_get("certification")?,
            price: decimal_column(row, "price")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psu() -> PowerSupply {
        PowerSupply {
            model: "Corsair RM850x".to_string(),
            wattage_w: 850,
            certification: Some("80 PLUS Gold".to_string()),
            price: Decimal::new(1_349_000, 2),
        }
    }

    #[test]
    fn test_wattage_bounds() {
        for (w, ok) in [(99, false), (100, true), (2000, true), (2001, false)] {
            let p = PowerSupply {
                wattage_w: w,
                ..psu()
            };
            assert_eq!(p.validate().is_empty(), ok, "wattage {}", w);
        }
    }

    #[test]
    fn test_certification_is_optional_but_bounded() {
        let p = PowerSupply {
            certification: None,
            ..psu()
        };
        assert!(p.validate().is_empty());

        let p = PowerSupply {
            certification: Some("G".repeat(CERTIFICATION_MAX_CHARS + 1)),
            ..psu()
        };
        assert_eq!(p.validate()[0].field, "certification");
    }

    #[test]
    fn test_certification_may_be_omitted_in_json() {
        let p: PowerSupply =
            serde_json::from_str(r#"{"model":"be quiet! Pure Power 12","wattage_w":650,"price":"7990"}"#)
                .unwrap();
        assert_eq!(p.certification, None);
        assert!(p.validate().is_empty());
    }

    #[test]
    fn test_price_bounds() {
        for (cents, ok) in [
            (0, false),
            (1, true),
            (100_000_000, true),
            (100_000_001, false),
        ] {
            let p = PowerSupply {
                price: Decimal::new(cents, 2),
                ..psu()
            };
            assert_eq!(p.validate().is_empty(), ok, "price {}", cents);
        }
    }
}
