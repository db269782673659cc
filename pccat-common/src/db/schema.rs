//! Declarative table schemas and drift detection
//!
//! Each catalog entity describes its table once, as an ordered list of
//! [`ColumnDefinition`]s. That list drives table creation and every CRUD
//! statement, and is compared against `PRAGMA table_info` output to detect
//! drift.
//!
//! Drift is reported, never repaired: there is no ALTER TABLE path here.
//!
//! ```rust,ignore
//! impl TableSchema for Processor {
//!     fn table_name() -> &'static str { "processors" }
//!
//!     fn expected_columns() -> Vec<ColumnDefinition> {
//!         vec![
//!             ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
//!             ColumnDefinition::new("socket", "TEXT").not_null(),
//!         ]
//!     }
//! }
//! ```

use crate::Result;
use sqlx::{Row, SqlitePool};
use std::fmt;

/// Column definition with SQL constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: &'static str,
    /// SQL type (e.g., "TEXT", "INTEGER")
    pub sql_type: &'static str,
    /// NOT NULL constraint
    pub not_null: bool,
    /// PRIMARY KEY constraint
    pub primary_key: bool,
}

impl ColumnDefinition {
    /// Create new column definition
    pub const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            not_null: false,
            primary_key: false,
        }
    }

    /// Mark column as PRIMARY KEY
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark column as NOT NULL
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    fn ddl(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

/// Actual column from database introspection (PRAGMA table_info result)
#[derive(Debug, Clone)]
pub struct ActualColumn {
    /// Column ID (position in table)
    pub cid: i32,
    pub name: String,
    /// SQL type from PRAGMA table_info
    pub type_name: String,
    pub not_null: bool,
    /// PRIMARY KEY flag
    pub pk: bool,
}

/// Difference between the declared and the actual schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDrift {
    /// Table absent from database
    MissingTable { table: String },
    /// Column absent from database
    MissingColumn {
        table: String,
        column: ColumnDefinition,
    },
    /// Column type differs (outside SQLite affinity equivalence)
    TypeMismatch {
        table: String,
        column: String,
        expected: String,
        actual: String,
    },
    /// Declared constraint not present on the column
    ConstraintMismatch {
        table: String,
        column: String,
        constraint: &'static str, // "NOT NULL", "PRIMARY KEY"
    },
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDrift::MissingTable { table } => write!(f, "table '{}' is missing", table),
            SchemaDrift::MissingColumn { table, column } => write!(
                f,
                "column {}.{} ({}) is missing",
                table, column.name, column.sql_type
            ),
            SchemaDrift::TypeMismatch {
                table,
                column,
                expected,
                actual,
            } => write!(
                f,
                "column {}.{} has type '{}', expected '{}'",
                table, column, actual, expected
            ),
            SchemaDrift::ConstraintMismatch {
                table,
                column,
                constraint,
            } => write!(f, "column {}.{} lacks {}", table, column, constraint),
        }
    }
}

/// Defines expected schema for a database table
pub trait TableSchema {
    /// Table name in database
    fn table_name() -> &'static str;

    /// Expected column definitions; the first column is the key
    fn expected_columns() -> Vec<ColumnDefinition>;

    fn key_column() -> &'static str {
        Self::expected_columns()
            .first()
            .map(|c| c.name)
            .unwrap_or("rowid")
    }

    fn create_table_sql() -> String {
        create_table_sql(Self::table_name(), &Self::expected_columns())
    }

    /// `INSERT` binding the key first, then every other column in order
    fn insert_sql() -> String {
        let columns = Self::expected_columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
        let placeholders = vec!["?"; names.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::table_name(),
            names.join(", "),
            placeholders
        )
    }

    /// `UPDATE` binding every non-key column in order, then the key
    fn update_sql() -> String {
        let columns = Self::expected_columns();
        let assignments: Vec<String> = columns
            .iter()
            .skip(1)
            .map(|c| format!("{} = ?", c.name))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ?",
            Self::table_name(),
            assignments.join(", "),
            Self::key_column()
        )
    }

    fn select_sql() -> String {
        let names: Vec<&str> = Self::expected_columns().iter().map(|c| c.name).collect();
        format!("SELECT {} FROM {}", names.join(", "), Self::table_name())
    }
}

/// `CREATE TABLE IF NOT EXISTS` for a declared column list
pub fn create_table_sql(table: &str, columns: &[ColumnDefinition]) -> String {
    let body: Vec<String> = columns.iter().map(|c| format!("    {}", c.ddl())).collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        table,
        body.join(",\n")
    )
}

/// Schema introspection - read actual database schema
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// Read actual columns from database table using PRAGMA table_info
    ///
    /// Returns columns in database order (by cid)
    pub async fn introspect_table(pool: &SqlitePool, table_name: &str) -> Result<Vec<ActualColumn>> {
        let query = format!("PRAGMA table_info({})", table_name);
        let rows = sqlx::query(&query).fetch_all(pool).await?;

        let mut columns: Vec<ActualColumn> = rows
            .iter()
            .map(|row| ActualColumn {
                cid: row.get("cid"),
                name: row.get("name"),
                type_name: row.get("type"),
                not_null: row.get::<i32, _>("notnull") != 0,
                pk: row.get::<i32, _>("pk") != 0,
            })
            .collect();

        columns.sort_by_key(|c| c.cid);

        Ok(columns)
    }

    pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sqlite_master
                WHERE type='table' AND name = ?
            )
            "#,
        )
        .bind(table_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}

/// Schema comparison - detect drift between expected and actual
pub struct SchemaDiff;

impl SchemaDiff {
    /// Compare expected schema to actual database schema
    pub fn compare(
        table_name: &str,
        expected: &[ColumnDefinition],
        actual: &[ActualColumn],
    ) -> Vec<SchemaDrift> {
        let mut drift = Vec::new();

        for expected_col in expected {
            let Some(actual_col) = actual.iter().find(|c| c.name == expected_col.name) else {
                drift.push(SchemaDrift::MissingColumn {
                    table: table_name.to_string(),
                    column: expected_col.clone(),
                });
                continue;
            };

            if !Self::types_compatible(expected_col.sql_type, &actual_col.type_name) {
                drift.push(SchemaDrift::TypeMismatch {
                    table: table_name.to_string(),
                    column: expected_col.name.to_string(),
                    expected: expected_col.sql_type.to_string(),
                    actual: actual_col.type_name.clone(),
                });
            }

            if expected_col.not_null && !actual_col.not_null {
                drift.push(SchemaDrift::ConstraintMismatch {
                    table: table_name.to_string(),
                    column: expected_col.name.to_string(),
                    constraint: "NOT NULL",
                });
            }

            if expected_col.primary_key && !actual_col.pk {
                drift.push(SchemaDrift::ConstraintMismatch {
                    table: table_name.to_string(),
                    column: expected_col.name.to_string(),
                    constraint: "PRIMARY KEY",
                });
            }
        }

        drift
    }

    /// Check if SQL types are compatible (SQLite type affinity rules)
    fn types_compatible(expected: &str, actual: &str) -> bool {
        let exp = expected.to_uppercase();
        let act = actual.to_uppercase();

        if exp == act {
            return true;
        }

        let is_int = |t: &str| t.contains("INT");
        let is_text = |t: &str| t.contains("TEXT") || t.contains("CHAR") || t.contains("CLOB");
        let is_real = |t: &str| t.contains("REAL") || t.contains("FLOAT") || t.contains("DOUBLE");

        (is_int(&exp) && is_int(&act))
            || (is_text(&exp) && is_text(&act))
            || (is_real(&exp) && is_real(&act))
    }
}

/// Check one declared table against the database without modifying it
pub async fn check_table(
    pool: &SqlitePool,
    table_name: &str,
    expected: &[ColumnDefinition],
) -> Result<Vec<SchemaDrift>> {
    if !SchemaIntrospector::table_exists(pool, table_name).await? {
        return Ok(vec![SchemaDrift::MissingTable {
            table: table_name.to_string(),
        }]);
    }

    let actual = SchemaIntrospector::introspect_table(pool, table_name).await?;
    Ok(SchemaDiff::compare(table_name, expected, &actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    struct WidgetSchema;

    impl TableSchema for WidgetSchema {
        fn table_name() -> &'static str {
            "widgets"
        }

        fn expected_columns() -> Vec<ColumnDefinition> {
            vec![
                ColumnDefinition::new("model", "TEXT").primary_key().not_null(),
                ColumnDefinition::new("watts", "INTEGER").not_null(),
                ColumnDefinition::new("note", "TEXT"),
            ]
        }
    }

    #[test]
    fn test_column_definition_builder() {
        let col = ColumnDefinition::new("model", "TEXT").primary_key().not_null();

        assert_eq!(col.name, "model");
        assert_eq!(col.sql_type, "TEXT");
        assert!(col.not_null);
        assert!(col.primary_key);
        assert_eq!(col.ddl(), "model TEXT PRIMARY KEY NOT NULL");
    }

    #[test]
    fn test_generated_statements() {
        assert_eq!(WidgetSchema::key_column(), "model");
        assert_eq!(
            WidgetSchema::insert_sql(),
            "INSERT INTO widgets (model, watts, note) VALUES (?, ?, ?)"
        );
        assert_eq!(
            WidgetSchema::update_sql(),
            "UPDATE widgets SET watts = ?, note = ? WHERE model = ?"
        );
        assert_eq!(WidgetSchema::select_sql(), "SELECT model, watts, note FROM widgets");
        assert_eq!(
            WidgetSchema::create_table_sql(),
            "CREATE TABLE IF NOT EXISTS widgets (\n    model TEXT PRIMARY KEY NOT NULL,\n    watts INTEGER NOT NULL,\n    note TEXT\n)"
        );
    }

    #[test]
    fn test_types_compatible() {
        assert!(SchemaDiff::types_compatible("TEXT", "TEXT"));
        assert!(SchemaDiff::types_compatible("text", "TEXT"));
        assert!(SchemaDiff::types_compatible("INTEGER", "INT"));
        assert!(SchemaDiff::types_compatible("TEXT", "VARCHAR(100)"));
        assert!(SchemaDiff::types_compatible("REAL", "DOUBLE"));

        assert!(!SchemaDiff::types_compatible("TEXT", "INTEGER"));
        assert!(!SchemaDiff::types_compatible("INTEGER", "REAL"));
    }

    #[tokio::test]
    async fn test_created_table_has_no_drift() {
        let pool = setup_test_db().await;

        sqlx::query(&WidgetSchema::create_table_sql())
            .execute(&pool)
            .await
            .unwrap();

        let drift = check_table(&pool, "widgets", &WidgetSchema::expected_columns())
            .await
            .unwrap();
        assert!(drift.is_empty(), "unexpected drift: {:?}", drift);

        let columns = SchemaIntrospector::introspect_table(&pool, "widgets")
            .await
            .unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns[0].pk);
        assert!(columns[1].not_null);
        assert!(!columns[2].not_null);
    }

    #[tokio::test]
    async fn test_missing_table_reported() {
        let pool = setup_test_db().await;

        let drift = check_table(&pool, "widgets", &WidgetSchema::expected_columns())
            .await
            .unwrap();
        assert_eq!(
            drift,
            vec![SchemaDrift::MissingTable {
                table: "widgets".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_detect_missing_column_and_constraints() {
        let pool = setup_test_db().await;

        sqlx::query("CREATE TABLE widgets (model TEXT, watts TEXT)")
            .execute(&pool)
            .await
            .unwrap();

        let drift = check_table(&pool, "widgets", &WidgetSchema::expected_columns())
            .await
            .unwrap();

        assert!(drift.contains(&SchemaDrift::ConstraintMismatch {
            table: "widgets".to_string(),
            column: "model".to_string(),
            constraint: "PRIMARY KEY",
        }));
        assert!(drift.contains(&SchemaDrift::TypeMismatch {
            table: "widgets".to_string(),
            column: "watts".to_string(),
            expected: "INTEGER".to_string(),
            actual: "TEXT".to_string(),
        }));
        assert!(drift
            .iter()
            .any(|d| matches!(d, SchemaDrift::MissingColumn { column, .. } if column.name == "note")));

        // Nothing was altered
        let columns = SchemaIntrospector::introspect_table(&pool, "widgets")
            .await
            .unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[tokio::test]
    async fn test_table_exists() {
        let pool = setup_test_db().await;

        assert!(!SchemaIntrospector::table_exists(&pool, "widgets").await.unwrap());

        sqlx::query("CREATE TABLE widgets (model TEXT)")
            .execute(&pool)
            .await
            .unwrap();

        assert!(SchemaIntrospector::table_exists(&pool, "widgets").await.unwrap());
    }
}
