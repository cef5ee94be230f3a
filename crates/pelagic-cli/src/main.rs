//! `pelagic` — administrative CLI for the pelagic observation store.
//!
//! # Usage
//!
//! ```
//! pelagic --db data/pelagic.db ingest --data-dir data/json
//! pelagic ingest --file 1900022 /tmp/batch.json
//! pelagic latest 1900022 -n 20
//! pelagic plan "Compare salinity between Float 123 and Float 456" --platforms 123,456
//! ```
//!
//! Ingest inputs are JSON files holding an array of raw record maps, one
//! file per platform. A failed file is logged and the job continues to the
//! next one; any failure still yields a non-zero exit.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use clap::{ArgAction, Parser, Subcommand};
use pelagic_core::{
  PlatformId,
  plan::QueryParams,
  record::RawRecord,
  store::ObservationStore,
};
use pelagic_store_sqlite::SqliteStore;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pelagic", about = "Administrative CLI for the pelagic observation store")]
struct Cli {
  /// Path to the SQLite database file.
  #[arg(long, env = "PELAGIC_DB", default_value = "data/pelagic.db")]
  db: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Ingest (or rebuild) per-platform observation batches.
  Ingest {
    /// Directory of per-platform JSON files; platforms are auto-discovered
    /// from `platform_<digits>.json` / `<digits>.json` names when no
    /// explicit list is given.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Explicit platform ids to register and ingest from `--data-dir`.
    #[arg(long, num_args = 1..)]
    platforms: Vec<String>,

    /// Explicit `PLATFORM PATH` mapping; repeatable.
    #[arg(long, num_args = 2, value_names = ["PLATFORM", "PATH"], action = ArgAction::Append)]
    file: Vec<String>,
  },

  /// Print the latest N rows for one platform as JSON lines.
  Latest {
    platform: String,

    #[arg(short = 'n', long, default_value_t = 20)]
    limit: u32,
  },

  /// Synthesize a query plan from a question and print its SQL.
  Plan {
    question: String,

    /// Caller-supplied latitude context; wins over text-derived values.
    #[arg(long)]
    lat: Option<f64>,

    /// Caller-supplied longitude context; wins over text-derived values.
    #[arg(long)]
    lon: Option<f64>,

    /// Platform whitelist to constrain the plan with.
    #[arg(long, value_delimiter = ',')]
    platforms: Vec<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if let Some(parent) = cli.db.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent)
      .with_context(|| format!("creating database directory {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cli.db)
    .await
    .with_context(|| format!("opening store at {}", cli.db.display()))?;

  match cli.command {
    Command::Ingest { data_dir, platforms, file } => {
      cmd_ingest(&store, data_dir.as_deref(), &platforms, &file).await
    }
    Command::Latest { platform, limit } => cmd_latest(&store, &platform, limit).await,
    Command::Plan { question, lat, lon, platforms } => {
      cmd_plan(&question, lat, lon, &platforms)
    }
  }
}

// ─── Ingest ───────────────────────────────────────────────────────────────────

async fn cmd_ingest(
  store: &SqliteStore,
  data_dir: Option<&Path>,
  platforms: &[String],
  file_pairs: &[String],
) -> anyhow::Result<()> {
  let mut jobs: Vec<(PlatformId, Option<PathBuf>)> = Vec::new();

  for pair in file_pairs.chunks(2) {
    let platform = PlatformId::parse(&pair[0])
      .with_context(|| format!("--file platform {:?}", pair[0]))?;
    jobs.push((platform, Some(PathBuf::from(&pair[1]))));
  }

  for entry in platforms {
    let platform =
      PlatformId::parse(entry).with_context(|| format!("--platforms entry {entry:?}"))?;
    let discovered = data_dir.and_then(|dir| discover_file_for_platform(dir, platform));
    jobs.push((platform, discovered));
  }

  // No explicit list: auto-discover platforms from the data directory.
  if jobs.is_empty() {
    let dir = data_dir.context("nothing to ingest: pass --data-dir, --platforms or --file")?;
    jobs = discover_platform_files(dir)?
      .into_iter()
      .map(|(platform, path)| (platform, Some(path)))
      .collect();
    if jobs.is_empty() {
      bail!("no platform files found in {}", dir.display());
    }
  }

  let mut total_rows = 0usize;
  let mut failures = 0usize;

  for (platform, path) in &jobs {
    store.ensure_partition(*platform).await?;
    let Some(path) = path else {
      continue;
    };
    match ingest_file(store, *platform, path).await {
      Ok(rows) => {
        info!(platform = %platform, path = %path.display(), rows, "ingested batch");
        total_rows += rows;
      }
      Err(e) => {
        // The batch rolled back as a whole; move on to the next file.
        error!(platform = %platform, path = %path.display(), error = %e, "batch failed");
        failures += 1;
      }
    }
  }

  println!(
    "Ingest complete. Upserted {total_rows} rows across {} platforms.",
    jobs.len()
  );
  if failures > 0 {
    bail!("{failures} batch(es) failed");
  }
  Ok(())
}

async fn ingest_file(
  store: &SqliteStore,
  platform: PlatformId,
  path: &Path,
) -> anyhow::Result<usize> {
  let text = fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let records: Vec<RawRecord> = serde_json::from_str(&text)
    .with_context(|| format!("parsing {} as an array of record maps", path.display()))?;
  Ok(store.upsert(platform, records).await?)
}

/// `platform_<digits>.json` or `<digits>.json`, in that preference order.
fn discover_file_for_platform(dir: &Path, platform: PlatformId) -> Option<PathBuf> {
  [format!("platform_{platform}.json"), format!("{platform}.json")]
    .into_iter()
    .map(|name| dir.join(name))
    .find(|path| path.is_file())
}

/// Scan a directory for per-platform files and pair each with its id.
fn discover_platform_files(dir: &Path) -> anyhow::Result<Vec<(PlatformId, PathBuf)>> {
  let mut found = Vec::new();
  let entries = fs::read_dir(dir)
    .with_context(|| format!("reading data directory {}", dir.display()))?;

  for entry in entries {
    let path = entry?.path();
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      continue;
    };
    let Some(stem) = name.strip_suffix(".json") else {
      continue;
    };
    let candidate = stem.strip_prefix("platform_").unwrap_or(stem);
    if let Ok(platform) = PlatformId::parse(candidate) {
      found.push((platform, path));
    }
  }

  found.sort_by_key(|(platform, _)| *platform);
  Ok(found)
}

// ─── Latest ───────────────────────────────────────────────────────────────────

async fn cmd_latest(store: &SqliteStore, platform: &str, limit: u32) -> anyhow::Result<()> {
  let platform = PlatformId::parse(platform)?;
  let rows = store.fetch_latest(&[platform], limit).await?;
  for row in rows {
    println!("{}", serde_json::to_string(&row)?);
  }
  Ok(())
}

// ─── Plan preview ─────────────────────────────────────────────────────────────

fn cmd_plan(
  question: &str,
  lat: Option<f64>,
  lon: Option<f64>,
  platforms: &[String],
) -> anyhow::Result<()> {
  let context = QueryParams { latitude: lat, longitude: lon, ..Default::default() };

  let intent = pelagic_query::classify(question);
  let params = pelagic_query::extract_params(question, &context);
  let mut plan = pelagic_query::render(intent, &params);
  if !platforms.is_empty() {
    plan = pelagic_query::constrain(plan, platforms);
  }

  println!("intent: {intent:?}");
  println!("params: {}", serde_json::to_string(&params)?);
  println!("sql:    {}", plan.to_sql());
  Ok(())
}
