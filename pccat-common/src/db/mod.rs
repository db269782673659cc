//! Database access: schema declarations, bootstrap, and the catalog context

pub mod context;
pub mod init;
pub mod schema;

pub use context::{CatalogContext, Collection, DanglingReference, TableInfo};
pub use init::{ensure_schema, open_pool, verify_schema};
pub use schema::{ColumnDefinition, SchemaDrift, TableSchema};
