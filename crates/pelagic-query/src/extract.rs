//! Parameter extraction from free text.
//!
//! Regex-derived values are merged *under* the caller-supplied context:
//! an already-typed value from the caller always wins over anything pulled
//! out of the question text. Extracted values only enter a [`QueryParams`]
//! after passing through the typed gateways (`f64` parse, `NaiveDate`
//! validation, [`PlatformId::parse`]), so malformed text degrades to an
//! absent parameter rather than an error.

use std::sync::OnceLock;

use chrono::NaiveDate;
use pelagic_core::{PlatformId, plan::QueryParams};
use regex::Regex;

fn lat_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"(?i)\blat(?:itude)?\s*:?\s*([+-]?\d+(?:\.\d+)?)")
      .expect("literal regex")
  })
}

fn lon_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"(?i)\blon(?:gitude)?\s*:?\s*([+-]?\d+(?:\.\d+)?)")
      .expect("literal regex")
  })
}

fn date_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("literal regex"))
}

fn depth_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"(?i)\bdepth\s*:?\s*(\d+(?:\.\d+)?)").expect("literal regex")
  })
}

fn platform_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"(?i)\b(?:float|platform)\s*#?:?\s*(\d+)").expect("literal regex")
  })
}

/// Merge regex-derived parameters from `text` under the caller `context`.
pub fn extract_params(text: &str, context: &QueryParams) -> QueryParams {
  let mut params = context.clone();

  if params.latitude.is_none() {
    params.latitude = capture_f64(lat_re(), text);
  }
  if params.longitude.is_none() {
    params.longitude = capture_f64(lon_re(), text);
  }
  if params.date.is_none() {
    params.date = date_re().captures(text).and_then(|c| {
      let year: i32 = c[1].parse().ok()?;
      let month: u32 = c[2].parse().ok()?;
      let day: u32 = c[3].parse().ok()?;
      NaiveDate::from_ymd_opt(year, month, day)
    });
  }
  if params.depth.is_none() {
    params.depth = capture_f64(depth_re(), text);
  }
  if params.platform_id.is_none() {
    params.platform_id = platform_re()
      .captures(text)
      .and_then(|c| PlatformId::parse(&c[1]).ok());
  }

  params
}

fn capture_f64(re: &Regex, text: &str) -> Option<f64> {
  re.captures(text).and_then(|c| c[1].parse().ok())
}
