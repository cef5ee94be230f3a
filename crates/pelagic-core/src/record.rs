//! Observation records and normalization of raw ingest maps.
//!
//! The ingestion collaborator delivers records as loosely-typed JSON maps
//! ([`RawRecord`]). Normalization coerces numeric-looking values to floats
//! (null on failure, never dropping the record) and collapses the accepted
//! timestamp formats onto one canonical textual form, so that re-ingesting
//! the same profile under a different time spelling still hits the same
//! merge key.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A raw, not-yet-normalized record as delivered by the ingestion
/// collaborator.
pub type RawRecord = serde_json::Map<String, Value>;

/// Canonical textual form for `observed_at`; lexicographic order equals
/// chronological order, which the time-descending index relies on.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Field aliases accepted during normalization, most specific first.
const PROFILE_ALIASES: &[&str] = &["profile_id", "PROFILE_ID", "profile"];
const LAT_ALIASES: &[&str] = &["latitude", "LATITUDE", "lat"];
const LON_ALIASES: &[&str] = &["longitude", "LONGITUDE", "lon"];
const TIME_ALIASES: &[&str] = &["time", "TIME", "date", "observed_at"];
const DEPTH_MIN_ALIASES: &[&str] = &["depth_min", "DEPTH_MIN", "z_min"];
const DEPTH_MAX_ALIASES: &[&str] = &["depth_max", "DEPTH_MAX", "z_max"];
const TEMP_ALIASES: &[&str] = &["temperature_avg", "TEMP_AVG", "temperature"];
const SAL_ALIASES: &[&str] = &["salinity_avg", "SALINITY_AVG", "salinity"];
const PRES_ALIASES: &[&str] = &["pressure_avg", "PRESSURE_AVG", "pressure"];

// ─── Record ──────────────────────────────────────────────────────────────────

/// One normalized measurement/report event for one platform at one time.
///
/// Natural key: `(profile_id, observed_at)`, unique per platform partition.
/// Both key fields are guaranteed non-null by [`ObservationRecord::from_raw`];
/// every other field may be null after a failed coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
  pub profile_id:      String,
  pub latitude:        Option<f64>,
  pub longitude:       Option<f64>,
  pub observed_at:     NaiveDateTime,
  pub depth_min:       Option<f64>,
  pub depth_max:       Option<f64>,
  pub temperature_avg: Option<f64>,
  pub salinity_avg:    Option<f64>,
  pub pressure_avg:    Option<f64>,
}

impl ObservationRecord {
  /// Normalize a raw ingest map.
  ///
  /// Numeric coercion failures degrade the field to `None`; a missing
  /// `profile_id` or an unparseable `observed_at` fails the whole record
  /// (the caller drops it from the batch), since a null merge key would
  /// never dedupe against anything.
  pub fn from_raw(raw: &RawRecord) -> Result<Self> {
    let profile_id = field(raw, PROFILE_ALIASES)
      .and_then(coerce_string)
      .ok_or(Error::MissingKeyField("profile_id"))?;
    let observed_at = field(raw, TIME_ALIASES)
      .and_then(parse_observed_at)
      .ok_or(Error::MissingKeyField("observed_at"))?;

    Ok(Self {
      profile_id,
      latitude: field(raw, LAT_ALIASES).and_then(coerce_f64),
      longitude: field(raw, LON_ALIASES).and_then(coerce_f64),
      observed_at,
      depth_min: field(raw, DEPTH_MIN_ALIASES).and_then(coerce_f64),
      depth_max: field(raw, DEPTH_MAX_ALIASES).and_then(coerce_f64),
      temperature_avg: field(raw, TEMP_ALIASES).and_then(coerce_f64),
      salinity_avg: field(raw, SAL_ALIASES).and_then(coerce_f64),
      pressure_avg: field(raw, PRES_ALIASES).and_then(coerce_f64),
    })
  }
}

// ─── Coercion helpers ────────────────────────────────────────────────────────

fn field<'a>(raw: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
  aliases
    .iter()
    .find_map(|name| raw.get(*name))
    .filter(|v| !v.is_null())
}

fn coerce_string(v: &Value) -> Option<String> {
  match v {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn coerce_f64(v: &Value) -> Option<f64> {
  match v {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
}

/// Try the ordered list of known timestamp forms: unix epoch seconds, then
/// `%Y-%m-%d %H:%M:%S` (optionally fractional), `%Y-%m-%d %H:%M`, and a bare
/// date. `T` separators and a trailing `Z` are folded away first.
pub fn parse_observed_at(v: &Value) -> Option<NaiveDateTime> {
  match v {
    Value::Number(n) => {
      let secs = n.as_f64()? as i64;
      DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
    }
    Value::String(s) => {
      let s = s.trim().replace('T', " ").replace('Z', "");
      for fmt in [TIME_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
          return Some(dt);
        }
      }
      NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn raw(value: Value) -> RawRecord {
    value.as_object().expect("object literal").clone()
  }

  #[test]
  fn normalizes_canonical_fields() {
    let rec = ObservationRecord::from_raw(&raw(json!({
      "profile_id": "P1",
      "latitude": 10.5,
      "longitude": "75.2",
      "time": "2023-03-01 06:30:00",
      "temperature_avg": "21.5",
      "salinity_avg": 35.1,
    })))
    .unwrap();

    assert_eq!(rec.profile_id, "P1");
    assert_eq!(rec.latitude, Some(10.5));
    assert_eq!(rec.longitude, Some(75.2));
    assert_eq!(rec.temperature_avg, Some(21.5));
    assert_eq!(rec.salinity_avg, Some(35.1));
    assert_eq!(rec.observed_at.format(TIME_FORMAT).to_string(), "2023-03-01 06:30:00");
  }

  #[test]
  fn honors_upper_case_and_short_aliases() {
    let rec = ObservationRecord::from_raw(&raw(json!({
      "PROFILE_ID": "P2",
      "lat": -3.25,
      "lon": 80.0,
      "TIME": "2023-03-02",
      "TEMP_AVG": 18.0,
      "z_max": 1500,
    })))
    .unwrap();

    assert_eq!(rec.profile_id, "P2");
    assert_eq!(rec.latitude, Some(-3.25));
    assert_eq!(rec.depth_max, Some(1500.0));
    // Bare dates normalize to midnight.
    assert_eq!(rec.observed_at.format(TIME_FORMAT).to_string(), "2023-03-02 00:00:00");
  }

  #[test]
  fn coercion_failure_nulls_the_field_only() {
    let rec = ObservationRecord::from_raw(&raw(json!({
      "profile_id": "P3",
      "time": "2023-03-01 00:00:00",
      "temperature_avg": "not-a-number",
      "salinity_avg": 35.0,
    })))
    .unwrap();

    assert_eq!(rec.temperature_avg, None);
    assert_eq!(rec.salinity_avg, Some(35.0));
  }

  #[test]
  fn missing_profile_id_fails_the_record() {
    let err = ObservationRecord::from_raw(&raw(json!({
      "time": "2023-03-01 00:00:00",
      "temperature_avg": 21.5,
    })))
    .unwrap_err();
    assert!(matches!(err, Error::MissingKeyField("profile_id")));
  }

  #[test]
  fn unparseable_time_fails_the_record() {
    let err = ObservationRecord::from_raw(&raw(json!({
      "profile_id": "P4",
      "time": "yesterday-ish",
    })))
    .unwrap_err();
    assert!(matches!(err, Error::MissingKeyField("observed_at")));
  }

  #[test]
  fn iso_t_and_z_forms_collapse_to_canonical() {
    let a = parse_observed_at(&json!("2023-03-01T00:00:00Z")).unwrap();
    let b = parse_observed_at(&json!("2023-03-01 00:00:00")).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn epoch_seconds_are_accepted() {
    let dt = parse_observed_at(&json!(1_677_628_800)).unwrap();
    assert_eq!(dt.format(TIME_FORMAT).to_string(), "2023-03-01 00:00:00");
  }

  #[test]
  fn numeric_profile_ids_are_stringified() {
    let rec = ObservationRecord::from_raw(&raw(json!({
      "profile_id": 42,
      "time": "2023-03-01",
    })))
    .unwrap();
    assert_eq!(rec.profile_id, "42");
  }
}
