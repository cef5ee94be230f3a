//! The `ObservationStore` trait and read-side row types.
//!
//! The trait is implemented by storage backends (e.g.
//! `pelagic-store-sqlite`). Higher layers depend on this abstraction, not on
//! any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  plan::QueryPlan,
  platform::PlatformId,
  record::{ObservationRecord, RawRecord},
};

// ─── Read-side rows ──────────────────────────────────────────────────────────

/// One persisted observation row, with its owning platform and the
/// store-assigned insertion stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObservation {
  pub platform_id: PlatformId,
  #[serde(flatten)]
  pub record:      ObservationRecord,
  pub inserted_at: NaiveDateTime,
}

/// Aggregates for a stats-projection plan. All aggregates are `None` over an
/// empty row set; only the count is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
  pub profile_count:   i64,
  pub avg_temperature: Option<f64>,
  pub min_temperature: Option<f64>,
  pub max_temperature: Option<f64>,
  pub avg_salinity:    Option<f64>,
  pub min_salinity:    Option<f64>,
  pub max_salinity:    Option<f64>,
  pub avg_depth_range: Option<f64>,
}

/// Result of executing a [`QueryPlan`], shaped by its projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryOutput {
  Rows(Vec<StoredObservation>),
  Stats(StatsSummary),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an observation store backend.
///
/// Partitions (one logical partition per platform) are created lazily on
/// first write and never narrowed; records are appended or merged, never
/// deleted by the core.
pub trait ObservationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Partition lifecycle ───────────────────────────────────────────────

  /// Idempotently register `platform`'s partition.
  fn ensure_partition(
    &self,
    platform: PlatformId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Whether `platform`'s partition has been created.
  fn partition_exists(
    &self,
    platform: PlatformId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All registered platforms, ascending by id.
  fn list_platforms(
    &self,
  ) -> impl Future<Output = Result<Vec<PlatformId>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Normalize and merge a batch of raw records into `platform`'s
  /// partition, in one transaction, keyed on `(profile_id, observed_at)`.
  ///
  /// On conflict every non-key field is overwritten with the incoming
  /// value, which makes retrying the same batch idempotent. Records missing
  /// a usable key are dropped with a warning. Returns the number of records
  /// accepted into the merge (not the number materially changed); a storage
  /// failure rolls the whole batch back.
  fn upsert(
    &self,
    platform: PlatformId,
    records: Vec<RawRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Federated read: the latest rows across `platforms`, globally ordered
  /// by observation time descending and truncated to `limit`.
  ///
  /// Platforms without a partition are skipped without error; only rows
  /// with both temperature and salinity present contribute. Returns an
  /// empty vec when nothing matches.
  fn fetch_latest<'a>(
    &'a self,
    platforms: &'a [PlatformId],
    limit: u32,
  ) -> impl Future<Output = Result<Vec<StoredObservation>, Self::Error>> + Send + 'a;

  /// Execute a structured plan and return output shaped by its projection.
  fn execute_plan<'a>(
    &'a self,
    plan: &'a QueryPlan,
  ) -> impl Future<Output = Result<QueryOutput, Self::Error>> + Send + 'a;
}
