//! Catalog entities
//!
//! Seven component types plus the composite [`Build`]. Every entity is keyed
//! by a natural string key (the model name, or the build id) which is also the
//! table's primary key.

pub mod build;
pub mod case;
pub mod gpu;
pub mod memory;
pub mod motherboard;
pub mod power_supply;
pub mod processor;
pub mod storage;

pub use build::Build;
pub use case::Case;
pub use gpu::Gpu;
pub use memory::MemoryModule;
pub use motherboard::Motherboard;
pub use power_supply::PowerSupply;
pub use processor::Processor;
pub use storage::StorageDevice;

use crate::db::schema::{ColumnDefinition, TableSchema};
use crate::validation::{DecimalRange, Validate};
use crate::Error;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row, Sqlite};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a component model name
pub const MODEL_MAX_CHARS: usize = 100;

/// Price bounds shared by most components: 0.01 to 1,000,000.00
pub const COMPONENT_PRICE: DecimalRange = DecimalRange::new(1, 100_000_000, 2, "");

/// Query with bound arguments, as built by [`Entity::bind_fields`]
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// The eight persisted entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Motherboard,
    Processor,
    MemoryModule,
    Gpu,
    StorageDevice,
    PowerSupply,
    Case,
    Build,
}

impl EntityKind {
    /// Components first, builds last
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Motherboard,
        EntityKind::Processor,
        EntityKind::MemoryModule,
        EntityKind::Gpu,
        EntityKind::StorageDevice,
        EntityKind::PowerSupply,
        EntityKind::Case,
        EntityKind::Build,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Motherboard => "motherboards",
            EntityKind::Processor => "processors",
            EntityKind::MemoryModule => "memory_modules",
            EntityKind::Gpu => "gpus",
            EntityKind::StorageDevice => "storage_devices",
            EntityKind::PowerSupply => "power_supplies",
            EntityKind::Case => "cases",
            EntityKind::Build => "builds",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            EntityKind::Build => "build_id",
            _ => "model",
        }
    }

    /// Short name used in messages and on the command line
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Motherboard => "motherboard",
            EntityKind::Processor => "processor",
            EntityKind::MemoryModule => "memory",
            EntityKind::Gpu => "gpu",
            EntityKind::StorageDevice => "storage",
            EntityKind::PowerSupply => "power-supply",
            EntityKind::Case => "case",
            EntityKind::Build => "build",
        }
    }

    /// Declared columns of this kind's table
    pub fn columns(self) -> Vec<ColumnDefinition> {
        match self {
            EntityKind::Motherboard => Motherboard::expected_columns(),
            EntityKind::Processor => Processor::expected_columns(),
            EntityKind::MemoryModule => MemoryModule::expected_columns(),
            EntityKind::Gpu => Gpu::expected_columns(),
            EntityKind::StorageDevice => StorageDevice::expected_columns(),
            EntityKind::PowerSupply => PowerSupply::expected_columns(),
            EntityKind::Case => Case::expected_columns(),
            EntityKind::Build => Build::expected_columns(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serialized as its label
impl Serialize for EntityKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    /// Accepts the label, the table name, or a common alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let kind = match normalized.as_str() {
            "motherboard" | "motherboards" | "mobo" => EntityKind::Motherboard,
            "processor" | "processors" | "cpu" => EntityKind::Processor,
            "memory" | "memory-modules" | "memory-module" | "ram" => EntityKind::MemoryModule,
            "gpu" | "gpus" | "video-card" => EntityKind::Gpu,
            "storage" | "storage-devices" | "storage-device" | "drive" => EntityKind::StorageDevice,
            "power-supply" | "power-supplies" | "psu" => EntityKind::PowerSupply,
            "case" | "cases" => EntityKind::Case,
            "build" | "builds" => EntityKind::Build,
            _ => return Err(Error::Config(format!("Unknown entity kind: {}", s))),
        };
        Ok(kind)
    }
}

/// A persisted catalog record
///
/// `expected_columns()` fixes the column order; `bind_fields` must bind every
/// column after the key in exactly that order.
pub trait Entity:
    TableSchema
    + Validate
    + Serialize
    + DeserializeOwned
    + for<'r> FromRow<'r, SqliteRow>
    + Send
    + Sync
    + Unpin
    + 'static
{
    const KIND: EntityKind;

    /// Natural primary key
    fn key(&self) -> &str;

    /// Bind all non-key columns in declaration order
    fn bind_fields<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// Decode one JSON object, or an array of objects, into records
///
/// Unknown keys are rejected, so a misspelled optional field fails instead of
/// being stored as absent.
pub fn records_from_json<E: Entity>(input: &str) -> crate::Result<Vec<E>> {
    let items = match serde_json::from_str::<serde_json::Value>(input)? {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Error::from))
        .collect()
}

/// Decode a decimal stored as canonical text
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let text: String = row.try_get(column)?;
    Decimal::from_str(&text).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_are_snake_case_and_unique() {
        let mut names: Vec<&str> = EntityKind::ALL.iter().map(|k| k.table_name()).collect();
        for name in &names {
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_first_column_is_primary_key() {
        for kind in EntityKind::ALL {
            let columns = kind.columns();
            assert_eq!(columns[0].name, kind.key_column(), "{}", kind);
            assert!(columns[0].primary_key);
            assert!(columns[0].not_null);
            assert_eq!(columns.iter().filter(|c| c.primary_key).count(), 1);
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("cpu".parse::<EntityKind>().unwrap(), EntityKind::Processor);
        assert_eq!(
            "power_supplies".parse::<EntityKind>().unwrap(),
            EntityKind::PowerSupply
        );
        assert_eq!("Memory".parse::<EntityKind>().unwrap(), EntityKind::MemoryModule);
        for kind in EntityKind::ALL {
            assert_eq!(kind.label().parse::<EntityKind>().unwrap(), kind);
            assert_eq!(kind.table_name().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("monitor".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_records_from_json_accepts_object_or_array() {
        let one: Vec<Case> = records_from_json(
            r#"{"model": "Fractal Design North", "form_factors": "ATX",
                "dimensions": "447 x 215 x 469 mm", "price": "139.99"}"#,
        )
        .unwrap();
        assert_eq!(one.len(), 1);

        let many: Vec<Case> = records_from_json(
            r#"[{"model": "A", "form_factors": "ATX", "dimensions": "1", "price": 10},
                {"model": "B", "form_factors": "ATX", "dimensions": "2", "price": 20}]"#,
        )
        .unwrap();
        let models: Vec<&str> = many.iter().map(|c| c.model.as_str()).collect();
        assert_eq!(models, vec!["A", "B"]);
    }

    #[test]
    fn test_records_from_json_rejects_unknown_and_malformed_input() {
        let err = records_from_json::<PowerSupply>(
            r#"{"model": "Seasonic PRIME TX-1000", "wattage_w": 1000,
                "certifcation": "80 PLUS Titanium", "price": "329.99"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)), "{:?}", err);
        assert!(err.to_string().contains("certifcation"), "{}", err);
        assert!(err.is_recoverable());

        let err = records_from_json::<PowerSupply>(r#"{"model": "#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
