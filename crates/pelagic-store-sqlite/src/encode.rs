//! Encoding and decoding between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored in the canonical `YYYY-MM-DD HH:MM:SS` form (UTC),
//! whose lexicographic order is chronological. Platform ids are stored as
//! integers.

use chrono::NaiveDateTime;
use pelagic_core::{
  PlatformId,
  record::{ObservationRecord, TIME_FORMAT},
  store::StoredObservation,
};

use crate::{Error, Result};

pub fn encode_time(dt: NaiveDateTime) -> String {
  dt.format(TIME_FORMAT).to_string()
}

pub fn decode_time(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, TIME_FORMAT)
    .map_err(|e| Error::TimeParse(format!("{s:?}: {e}")))
}

/// One observation row as read from SQLite, before timestamp decoding.
/// Field order matches [`pelagic_core::plan::OBSERVATION_COLUMNS`].
pub struct RawObservation {
  pub platform_id:     i64,
  pub profile_id:      String,
  pub latitude:        Option<f64>,
  pub longitude:       Option<f64>,
  pub observed_at:     String,
  pub depth_min:       Option<f64>,
  pub depth_max:       Option<f64>,
  pub temperature_avg: Option<f64>,
  pub salinity_avg:    Option<f64>,
  pub pressure_avg:    Option<f64>,
  pub inserted_at:     String,
}

impl RawObservation {
  pub fn into_stored(self) -> Result<StoredObservation> {
    Ok(StoredObservation {
      platform_id: PlatformId::from(self.platform_id as u64),
      record:      ObservationRecord {
        profile_id:      self.profile_id,
        latitude:        self.latitude,
        longitude:       self.longitude,
        observed_at:     decode_time(&self.observed_at)?,
        depth_min:       self.depth_min,
        depth_max:       self.depth_max,
        temperature_avg: self.temperature_avg,
        salinity_avg:    self.salinity_avg,
        pressure_avg:    self.pressure_avg,
      },
      inserted_at: decode_time(&self.inserted_at)?,
    })
  }
}
