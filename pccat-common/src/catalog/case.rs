//! Computer case

use super::{decimal_column, Entity, EntityKind, SqliteQuery, COMPONENT_PRICE, MODEL_MAX_CHARS};
use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{Validate, Validator, Violation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

pub const FORM_FACTORS_MAX_CHARS: usize = 200;
pub const DIMENSIONS_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub model: String,
    /// Free-text list, e.g. "ATX, Micro-ATX, Mini-ITX"
    pub form_factors: String,
    /// Free text, e.g. "450 x 230 x 480 mm"
    pub dimensions: String,
    pub price: Decimal,
}

impl Validate for Case {
    fn validate(&self) -> Vec<Violation> {
        Validator::new()
            .required_text("model", "Model", &self.model, MODEL_MAX_CHARS)
            .required_text(
                "form_factors",
                "Supported form factors",
                &self.form_factors,
                FORM_FACTORS_MAX_CHARS,
            )
            .required_text("dimensions", "Dimensions", &self.dimensions, DIMENSIONS_MAX_CHARS)
            .decimal_range("price", "Price", self.price, COMPONENT_PRICE)
            .finish()
    }
}

impl TableSchema for Case {
    fn table_name() -> &'static str {
        EntityKind::Case.table_name()
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
            ColumnDefinition::new("form_factors", "TEXT").not_null(),
            ColumnDefinition::new("dimensions", "TEXT").not_null(),
            ColumnDefinition::new("price", "TEXT").not_null(),
        ]
    }
}

impl Entity for Case {
    const KIND: EntityKind = EntityKind::Case;

    fn key(&self) -> &str {
        &self.model
    }

    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(&self.form_factors)
            .bind(&self.dimensions)
            .bind(self.price.to_string())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Case {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            model: row.try_get("model")?,
            form_factors: row.try_get("form_factors")?,
            dimensions: row.try_get("dimensions")?,
            price: decimal_column(row, "price")?,
        })
    }
}
