//! # PC Catalog Common Library
//!
//! Data layer for the PC hardware component catalog:
//! - Entity types for seven component kinds and pre-built configurations
//! - Field validation with collected, per-field violations
//! - Declarative table schemas and explicit schema bootstrap
//! - The [`CatalogContext`] data-access entry point
//! - Configuration loading

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod validation;

pub use catalog::{
    Build, Case, Entity, EntityKind, Gpu, MemoryModule, Motherboard, PowerSupply, Processor,
    StorageDevice,
};
pub use db::CatalogContext;
pub use error::{Error, Result};
pub use validation::{Validate, ValidationErrors, Violation};
