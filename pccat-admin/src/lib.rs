//! pccat-admin - Command-line administration of the PC component catalog
//!
//! Bootstraps and checks the catalog schema and runs single-record CRUD
//! against any entity table. Records are read and written as JSON.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use pccat_common::config::TomlConfig;
use pccat_common::db::open_pool;
use pccat_common::catalog::records_from_json;
use pccat_common::{
    Build, Case, CatalogContext, Entity, EntityKind, Error, Gpu, MemoryModule, Motherboard,
    PowerSupply, Processor, StorageDevice,
};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line arguments for pccat-admin
#[derive(Parser, Debug)]
#[command(name = "pccat-admin")]
#[command(about = "Administration tool for the PC component catalog")]
#[command(version)]
pub struct Cli {
    /// Database URL (overrides PCCAT_DATABASE_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Config file (default: ~/.config/pccat/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// KIND accepts motherboard, processor, memory, gpu, storage, power-supply,
/// case, build, or the table name.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and any missing tables
    Init,

    /// Compare stored tables with the declared schema
    Check,

    /// Row count of every catalog table
    Tables,

    /// Print all records of a kind as a JSON array
    List { kind: EntityKind },

    /// Print one record as JSON
    Get { kind: EntityKind, key: String },

    /// Insert records from a JSON file (object or array, `-` for stdin)
    Insert { kind: EntityKind, input: PathBuf },

    /// Replace existing records from a JSON file (object or array, `-` for stdin)
    Update { kind: EntityKind, input: PathBuf },

    /// Delete one record by key
    Delete { kind: EntityKind, key: String },

    /// List the components a build names that are not in the catalog
    Refs { build_id: String },
}

/// Run the command selected by the parsed arguments, writing results to `out`
pub async fn run<W: Write>(cli: &Cli, config: &TomlConfig, out: &mut W) -> Result<()> {
    let db_config = config.database_config(cli.database_url.as_deref());

    let ctx = match cli.command {
        Command::Init => CatalogContext::new(open_pool(&db_config, true).await?),
        _ => CatalogContext::connect(&db_config).await?,
    };
    let result = execute(&ctx, &cli.command, out).await;
    ctx.close().await;
    result
}

/// Expand `$func::<E, _>(args)` for the entity type matching `$kind`
macro_rules! for_kind {
    ($kind:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            EntityKind::Motherboard => $func::<Motherboard, _>($($arg),*).await,
            EntityKind::Processor => $func::<Processor, _>($($arg),*).await,
            EntityKind::MemoryModule => $func::<MemoryModule, _>($($arg),*).await,
            EntityKind::Gpu => $func::<Gpu, _>($($arg),*).await,
            EntityKind::StorageDevice => $func::<StorageDevice, _>($($arg),*).await,
            EntityKind::PowerSupply => $func::<PowerSupply, _>($($arg),*).await,
            EntityKind::Case => $func::<Case, _>($($arg),*).await,
            EntityKind::Build => $func::<Build, _>($($arg),*).await,
        }
    };
}

async fn execute<W: Write>(ctx: &CatalogContext, command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Init => {
            let created = ctx.ensure_schema().await?;
            if created.is_empty() {
                writeln!(out, "Schema already present")?;
            }
            for table in &created {
                writeln!(out, "Created table {}", table)?;
            }
            Ok(())
        }
        Command::Check => {
            let drift = ctx.verify_schema().await?;
            if drift.is_empty() {
                writeln!(out, "Schema OK")?;
                return Ok(());
            }
            for item in &drift {
                writeln!(out, "{}", item)?;
            }
            Err(anyhow!("Schema drift detected: {} issue(s)", drift.len()))
        }
        Command::Tables => {
            for table in ctx.table_overview().await? {
                writeln!(out, "{:<16} {:>8}", table.name, table.row_count)?;
            }
            Ok(())
        }
        Command::List { kind } => for_kind!(*kind, list_records(ctx, out)),
        Command::Get { kind, key } => for_kind!(*kind, get_record(ctx, key, out)),
        Command::Insert { kind, input } => {
            let input = read_input(input)?;
            for_kind!(*kind, insert_records(ctx, &input, out))
        }
        Command::Update { kind, input } => {
            let input = read_input(input)?;
            for_kind!(*kind, update_records(ctx, &input, out))
        }
        Command::Delete { kind, key } => for_kind!(*kind, delete_record(ctx, key, out)),
        Command::Refs { build_id } => {
            let build = ctx.builds().get(build_id).await?;
            let dangling = ctx.dangling_references(&build).await?;
            if dangling.is_empty() {
                writeln!(out, "All references of build '{}' resolve", build_id)?;
            }
            for reference in &dangling {
                writeln!(out, "missing {}: {}", reference.kind, reference.model)?;
            }
            Ok(())
        }
    }
}

async fn list_records<E: Entity, W: Write>(ctx: &CatalogContext, out: &mut W) -> Result<()> {
    let records = ctx.collection::<E>().list().await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
    Ok(())
}

async fn get_record<E: Entity, W: Write>(ctx: &CatalogContext, key: &str, out: &mut W) -> Result<()> {
    let record = ctx.collection::<E>().get(key).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

/// Records are written in input order; the first failure stops the batch
async fn insert_records<E: Entity, W: Write>(
    ctx: &CatalogContext,
    input: &str,
    out: &mut W,
) -> Result<()> {
    let records = records_from_json::<E>(input)
        .with_context(|| format!("Invalid {} input", E::KIND))?;
    let collection = ctx.collection::<E>();
    for record in records {
        collection.insert(&record).await?;
        info!("Inserted {} '{}'", E::KIND, record.key());
        writeln!(out, "Inserted {} '{}'", E::KIND, record.key())?;
    }
    Ok(())
}

async fn update_records<E: Entity, W: Write>(
    ctx: &CatalogContext,
    input: &str,
    out: &mut W,
) -> Result<()> {
    let records = records_from_json::<E>(input)
        .with_context(|| format!("Invalid {} input", E::KIND))?;
    let collection = ctx.collection::<E>();
    for record in records {
        collection.update(&record).await?;
        info!("Updated {} '{}'", E::KIND, record.key());
        writeln!(out, "Updated {} '{}'", E::KIND, record.key())?;
    }
    Ok(())
}

async fn delete_record<E: Entity, W: Write>(ctx: &CatalogContext, key: &str, out: &mut W) -> Result<()> {
    ctx.collection::<E>().delete(key).await?;
    info!("Deleted {} '{}'", E::KIND, key);
    writeln!(out, "Deleted {} '{}'", E::KIND, key)?;
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Text printed to stderr for a failed command
///
/// Validation failures print one `field: message` line per violation.
pub fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(Error::Validation(errors)) => errors
            .violations()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => format!("Error: {:#}", err),
    }
}

/// Process exit status for a failed command
///
/// 1 when the input can be corrected (invalid, duplicate, or missing
/// records, malformed JSON); 2 for storage and environment failures.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_recoverable() => 1,
        _ => 2,
    }
}
