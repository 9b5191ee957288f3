mod config;
mod export;
mod models;
mod parsers;
mod pipeline;
mod util;

use crate::config::EnvironmentVariables;
use crate::export::Exporter;
use crate::models::{normalize_wiki, Partition, Snapshot};
use crate::pipeline::*;

use anyhow::bail;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// todo:
// follow redirect chains past one hop if a consumer ever needs it (counted as multi_hop for now)

#[derive(Parser)]
#[command(name = "wikilink-graph")]
#[command(about = "Extract the article link graph of one wiki snapshot", long_about = None)]
struct Args {
    /// Wiki to process (en or enwiki)
    #[arg(short, long, default_value = "enwiki")]
    lang: String,

    /// Month of the snapshot (YYYY-MM); defaults to two months ago
    #[arg(short, long)]
    snapshot: Option<String>,

    /// Root of the SQL dumps, laid out as <wiki>/<YYYY-MM>/<wiki>-<table>.sql.gz
    #[arg(long)]
    dumps_dir: Option<PathBuf>,

    /// Tab-separated item/page link table (wiki_db, snapshot, page_id, item_id)
    #[arg(long)]
    entity_table: Option<PathBuf>,

    /// Where files are written before being moved to the output directory
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Ignore entity links older than this (YYYY-MM-DD)
    #[arg(long)]
    entity_min_snapshot: Option<String>,
}

/// A bad snapshot argument is reported and replaced by the default.
fn resolve_snapshot(arg: Option<&str>, today: NaiveDate) -> Snapshot {
    let default = Snapshot::default_for(today);
    match arg {
        None => default,
        Some(s) => match Snapshot::parse(s) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("{}; provide the snapshot as YYYY-MM, using {}", e, default);
                default
            }
        },
    }
}

fn main() -> anyhow::Result<()> {
    let now = Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let env = EnvironmentVariables::from_env()?;

    let wiki = normalize_wiki(&args.lang);
    let snapshot = resolve_snapshot(args.snapshot.as_deref(), Local::now().date_naive());
    let partition = Partition::new(&wiki, snapshot);

    let dumps_dir = args.dumps_dir.unwrap_or(env.dumps_dir);
    let entity_table = args.entity_table.or(env.entity_table);
    let entity_min_snapshot = match args.entity_min_snapshot {
        Some(s) => parsers::parse_entity_snapshot(&s)?,
        None => env.entity_min_snapshot,
    };
    let exporter = Exporter::new(
        args.staging_dir.unwrap_or(env.staging_dir),
        args.output_dir.unwrap_or(env.output_dir),
    );

    if !dump_dir_exists(&dumps_dir, &partition) {
        bail!(
            "no dumps for {} under {}",
            partition,
            dumps_dir.display()
        );
    }

    let source = DumpTables::new(dumps_dir, entity_table);
    let graph = build_graph(&source, &partition, entity_min_snapshot)?;
    let (edges_path, nodes_path) = exporter.export(&graph)?;

    info!(
        "done: {} and {} in {:.2?}",
        edges_path.display(),
        nodes_path.display(),
        now.elapsed()
    );
    Ok(())
}
