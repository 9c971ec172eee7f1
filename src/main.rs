//! Binary entry point for lexistore.
//!
//! Command-line interface over the flat-file record stores: CRUD, random
//! sampling, and bulk import/export per entity kind.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print macros in the CLI binary.
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use lexistore::io::formats::Format;
use lexistore::{
    EntityKind, ExportService, ImportOptions, ImportService, RecordStore, StoreConfig, bulk,
    mappings,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;

/// Lexistore - flat-file vocabulary record store with bulk import/export.
#[derive(Parser)]
#[command(name = "lexistore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory holding the collection files.
    #[arg(long, global = true, env = "LEXISTORE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List the entity kinds and their record counts.
    Kinds,

    /// Create a record.
    Add {
        /// Entity kind (word, phrase, ...).
        kind: String,

        /// Payload fields as a JSON object.
        #[arg(long)]
        fields: String,
    },

    /// List every record of a kind.
    List {
        /// Entity kind.
        kind: String,
    },

    /// Show one record.
    Get {
        /// Entity kind.
        kind: String,

        /// Record id.
        id: String,
    },

    /// Update a record with a partial payload (shallow merge).
    Set {
        /// Entity kind.
        kind: String,

        /// Record id.
        id: String,

        /// Partial payload as a JSON object.
        #[arg(long)]
        fields: String,
    },

    /// Delete one or more records, reporting per-id outcomes.
    Remove {
        /// Entity kind.
        kind: String,

        /// Record ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Draw a uniform random sample.
    Sample {
        /// Entity kind.
        kind: String,

        /// Sample size.
        #[arg(short = 'k', long, default_value_t = 10)]
        count: usize,
    },

    /// Import records from a CSV or JSON file.
    Import {
        /// Entity kind.
        kind: String,

        /// Source file.
        file: PathBuf,

        /// Source format (csv, json); detected from the extension if omitted.
        #[arg(long)]
        format: Option<String>,

        /// Validate and map without creating records.
        #[arg(long)]
        dry_run: bool,
    },

    /// Export records to a CSV or JSON file.
    Export {
        /// Entity kind.
        kind: String,

        /// Output file; defaults to a dated name in the current directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format (csv, json).
        #[arg(long, default_value = "csv")]
        format: String,

        /// Export only the given record ids.
        #[arg(long = "id")]
        ids: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "lexistore=debug" } else { "lexistore=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli
        .data_dir
        .as_ref()
        .map_or_else(StoreConfig::from_env, StoreConfig::new);

    match run(&cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(command: &Commands, config: &StoreConfig) -> anyhow::Result<()> {
    match command {
        Commands::Kinds => cmd_kinds(config),
        Commands::Add { kind, fields } => cmd_add(config, kind, fields),
        Commands::List { kind } => cmd_list(config, kind),
        Commands::Get { kind, id } => cmd_get(config, kind, id),
        Commands::Set { kind, id, fields } => cmd_set(config, kind, id, fields),
        Commands::Remove { kind, ids } => cmd_remove(config, kind, ids),
        Commands::Sample { kind, count } => cmd_sample(config, kind, *count),
        Commands::Import {
            kind,
            file,
            format,
            dry_run,
        } => cmd_import(config, kind, file, format.as_deref(), *dry_run),
        Commands::Export {
            kind,
            out,
            format,
            ids,
        } => cmd_export(config, kind, out.as_deref(), format, ids),
    }
}

fn open_store(config: &StoreConfig, kind: &str) -> anyhow::Result<RecordStore> {
    let kind = EntityKind::parse(kind)
        .with_context(|| format!("unknown entity kind '{kind}' (try 'lexistore kinds')"))?;
    Ok(RecordStore::open(config, kind)?)
}

fn parse_fields(fields: &str) -> anyhow::Result<Map<String, Value>> {
    serde_json::from_str(fields).context("--fields must be a JSON object")
}

fn cmd_kinds(config: &StoreConfig) -> anyhow::Result<()> {
    for kind in EntityKind::all() {
        let store = RecordStore::open(config, *kind)?;
        println!("{:<16} {} records", kind.as_str(), store.count()?);
    }
    Ok(())
}

fn cmd_add(config: &StoreConfig, kind: &str, fields: &str) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    let record = store.create(parse_fields(fields)?)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_list(config: &StoreConfig, kind: &str) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    let records = store.find_all()?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn cmd_get(config: &StoreConfig, kind: &str, id: &str) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    match store.find_by_id(id)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        },
        None => bail!("no {kind} record with id {id}"),
    }
}

fn cmd_set(config: &StoreConfig, kind: &str, id: &str, fields: &str) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    match store.update(id, parse_fields(fields)?)? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        },
        None => bail!("no {kind} record with id {id}"),
    }
}

fn cmd_remove(config: &StoreConfig, kind: &str, ids: &[String]) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;

    let outcome = bulk::run(
        ids.iter(),
        |id| (*id).clone(),
        |id| match store.delete(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err("not found".to_string()),
            Err(e) => Err(e.to_string()),
        },
    );

    println!("{}", outcome.summary(3));
    if outcome.is_complete_success() {
        Ok(())
    } else {
        bail!("some deletions failed")
    }
}

fn cmd_sample(config: &StoreConfig, kind: &str, count: usize) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    let sampled = store.sample(count)?;
    println!("{}", serde_json::to_string_pretty(&sampled)?);
    Ok(())
}

fn cmd_import(
    config: &StoreConfig,
    kind: &str,
    file: &std::path::Path,
    format: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    let mapper = mappings::import_mapper(store.kind());

    let mut options = ImportOptions::default().with_dry_run(dry_run);
    if let Some(name) = format {
        let format = Format::parse(name)
            .with_context(|| format!("unknown format '{name}' (expected csv or json)"))?;
        options = options.with_format(format);
    }

    let report = ImportService::new(&store).import_path(file, &mapper, &options)?;
    println!("{}", report.summary(lexistore::io::services::import::DEFAULT_ERROR_SAMPLE));
    Ok(())
}

fn cmd_export(
    config: &StoreConfig,
    kind: &str,
    out: Option<&std::path::Path>,
    format: &str,
    ids: &[String],
) -> anyhow::Result<()> {
    let store = open_store(config, kind)?;
    let service = ExportService::new(&store);

    let format = Format::parse(format)
        .with_context(|| format!("unknown format '{format}' (expected csv or json)"))?;
    let out = out.map_or_else(|| PathBuf::from(service.file_name(format)), PathBuf::from);
    let selection = (!ids.is_empty()).then_some(ids);

    let file = std::fs::File::create(&out)
        .with_context(|| format!("cannot create {}", out.display()))?;
    let writer = std::io::BufWriter::new(file);

    let exported = match format {
        Format::Csv => {
            let formatter = mappings::export_formatter(store.kind());
            service.export_tabular(&formatter, selection, writer)?
        },
        Format::Json => service.export_json(selection, writer)?,
    };

    println!("exported {} records to {}", exported, out.display());
    Ok(())
}
