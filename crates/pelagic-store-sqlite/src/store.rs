//! [`SqliteStore`] — the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{info, warn};

use pelagic_core::{
  PlatformId,
  plan::{OrderBy, Predicate, Projection, QueryPlan},
  record::{ObservationRecord, RawRecord},
  store::{ObservationStore, QueryOutput, StatsSummary, StoredObservation},
};

use crate::{
  Error, Result,
  encode::{RawObservation, encode_time},
  schema::SCHEMA,
};

const UPSERT_SQL: &str = "INSERT INTO observations (
     platform_id, profile_id, latitude, longitude, observed_at,
     depth_min, depth_max, temperature_avg, salinity_avg, pressure_avg,
     inserted_at
   ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
   ON CONFLICT (platform_id, profile_id, observed_at) DO UPDATE SET
     latitude        = excluded.latitude,
     longitude       = excluded.longitude,
     depth_min       = excluded.depth_min,
     depth_max       = excluded.depth_max,
     temperature_avg = excluded.temperature_avg,
     salinity_avg    = excluded.salinity_avg,
     pressure_avg    = excluded.pressure_avg";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A pelagic observation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a row-shaped SQL statement and decode the rows.
  async fn query_rows(&self, sql: String) -> Result<Vec<StoredObservation>> {
    let raws: Vec<RawObservation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawObservation {
              platform_id:     row.get(0)?,
              profile_id:      row.get(1)?,
              latitude:        row.get(2)?,
              longitude:       row.get(3)?,
              observed_at:     row.get(4)?,
              depth_min:       row.get(5)?,
              depth_max:       row.get(6)?,
              temperature_avg: row.get(7)?,
              salinity_avg:    row.get(8)?,
              pressure_avg:    row.get(9)?,
              inserted_at:     row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObservation::into_stored).collect()
  }

  /// Run a stats-shaped SQL statement; the aggregate query always yields
  /// exactly one row.
  async fn query_stats(&self, sql: String) -> Result<StatsSummary> {
    let stats = self
      .conn
      .call(move |conn| {
        let stats = conn.query_row(&sql, [], |row| {
          Ok(StatsSummary {
            profile_count:   row.get(0)?,
            avg_temperature: row.get(1)?,
            min_temperature: row.get(2)?,
            max_temperature: row.get(3)?,
            avg_salinity:    row.get(4)?,
            min_salinity:    row.get(5)?,
            max_salinity:    row.get(6)?,
            avg_depth_range: row.get(7)?,
          })
        })?;
        Ok(stats)
      })
      .await?;
    Ok(stats)
  }
}

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = Error;

  // ── Partition lifecycle ───────────────────────────────────────────────────

  async fn ensure_partition(&self, platform: PlatformId) -> Result<()> {
    let pid = platform.as_u64() as i64;
    let registered_at = encode_time(Utc::now().naive_utc());

    let created: usize = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO platforms (platform_id, registered_at) VALUES (?1, ?2)",
          rusqlite::params![pid, registered_at],
        )?;
        Ok(changed)
      })
      .await?;

    if created > 0 {
      info!(platform = %platform, "registered platform partition");
    }
    Ok(())
  }

  async fn partition_exists(&self, platform: PlatformId) -> Result<bool> {
    let pid = platform.as_u64() as i64;

    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM platforms WHERE platform_id = ?1",
              rusqlite::params![pid],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn list_platforms(&self) -> Result<Vec<PlatformId>> {
    let ids: Vec<i64> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT platform_id FROM platforms ORDER BY platform_id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
      })
      .await?;

    Ok(ids.into_iter().map(|id| PlatformId::from(id as u64)).collect())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert(&self, platform: PlatformId, records: Vec<RawRecord>) -> Result<usize> {
    // Normalize up front; records without a usable natural key would never
    // dedupe against anything, so they are dropped, not inserted.
    let mut rows: Vec<ObservationRecord> = Vec::with_capacity(records.len());
    for raw in &records {
      match ObservationRecord::from_raw(raw) {
        Ok(rec) => rows.push(rec),
        Err(e) => {
          warn!(platform = %platform, error = %e, "dropping record from batch");
        }
      }
    }

    let accepted = rows.len();
    if accepted == 0 {
      // Still register the partition: a first ingest of an all-degraded
      // batch leaves the platform addressable.
      self.ensure_partition(platform).await?;
      return Ok(0);
    }

    let pid = platform.as_u64() as i64;
    let inserted_at = encode_time(Utc::now().naive_utc());

    // One transaction per batch: partition registration and every merge
    // commit together or roll back together.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT OR IGNORE INTO platforms (platform_id, registered_at) VALUES (?1, ?2)",
          rusqlite::params![pid, inserted_at],
        )?;
        {
          let mut stmt = tx.prepare(UPSERT_SQL)?;
          for rec in &rows {
            stmt.execute(rusqlite::params![
              pid,
              rec.profile_id,
              rec.latitude,
              rec.longitude,
              encode_time(rec.observed_at),
              rec.depth_min,
              rec.depth_max,
              rec.temperature_avg,
              rec.salinity_avg,
              rec.pressure_avg,
              inserted_at,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(accepted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn fetch_latest(
    &self,
    platforms: &[PlatformId],
    limit: u32,
  ) -> Result<Vec<StoredObservation>> {
    // Soft-fail: platforms without a partition are skipped, not errors.
    let mut registered = Vec::with_capacity(platforms.len());
    for &platform in platforms {
      if self.partition_exists(platform).await? {
        registered.push(platform);
      }
    }
    if registered.is_empty() {
      return Ok(Vec::new());
    }

    let plan = QueryPlan {
      projection: Projection::Observations,
      predicates: vec![
        Predicate::MeasurementsPresent,
        Predicate::PlatformIn(registered),
      ],
      order_by:   Some(OrderBy::TimeDesc),
      limit:      Some(limit),
    };
    self.query_rows(plan.to_sql()).await
  }

  async fn execute_plan(&self, plan: &QueryPlan) -> Result<QueryOutput> {
    let sql = plan.to_sql();
    match plan.projection {
      Projection::Observations => Ok(QueryOutput::Rows(self.query_rows(sql).await?)),
      Projection::Stats => Ok(QueryOutput::Stats(self.query_stats(sql).await?)),
    }
  }
}
