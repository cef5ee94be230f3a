//! Nearest-platform resolution.
//!
//! The candidate index is an approximate text/embedding search, so its
//! recall on a spatial cue is text-similarity-based rather than spatially
//! exact. The resolver compensates by over-fetching `max(5k, k)` candidates
//! and re-ranking them by exact great-circle distance to each candidate's
//! extent midpoint. A true global nearest can still be missed if the index
//! excludes it from the initial pool; that is a documented property of this
//! contract, not a defect.

use pelagic_core::{
  geo::haversine_km,
  index::{CandidateHit, CandidateIndex, CandidateMatch},
};
use tracing::{debug, warn};

/// Resolve the `k` platforms nearest to `(latitude, longitude)`, ascending
/// by distance. Candidates without extent metadata receive the
/// `f64::INFINITY` sentinel and sort last.
///
/// Index failures degrade: an error or empty pool on the spatial cue is
/// retried once with a plain text cue, and a repeated failure yields an
/// empty result rather than propagating.
pub async fn resolve<I: CandidateIndex>(
  index: &I,
  latitude: f64,
  longitude: f64,
  k: usize,
) -> Vec<CandidateMatch> {
  if k == 0 {
    return Vec::new();
  }
  // Over-fetch to compensate for text-similarity recall.
  let pool = (5 * k).max(k);

  let spatial_cue = format!("lat {latitude:.3} lon {longitude:.3}");
  let hits = match index.query_by_text(&spatial_cue, pool).await {
    Ok(hits) if !hits.is_empty() => hits,
    first => {
      if let Err(e) = &first {
        warn!(error = %e, "spatial cue query failed; falling back to plain text cue");
      } else {
        debug!("spatial cue returned no candidates; falling back to plain text cue");
      }
      let text_cue =
        format!("float observations near latitude {latitude} longitude {longitude}");
      match index.query_by_text(&text_cue, pool).await {
        Ok(hits) => hits,
        Err(e) => {
          warn!(error = %e, "candidate index unavailable; resolving to no matches");
          return Vec::new();
        }
      }
    }
  };

  let mut matches: Vec<CandidateMatch> =
    hits.into_iter().map(|hit| rank(hit, latitude, longitude)).collect();
  // Stable sort: equal distances keep the index's original order.
  matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
  matches.truncate(k);
  matches
}

fn rank(hit: CandidateHit, latitude: f64, longitude: f64) -> CandidateMatch {
  let distance_km = match hit.extent {
    Some(extent) => {
      let (mid_lat, mid_lon) = extent.midpoint();
      haversine_km(latitude, longitude, mid_lat, mid_lon)
    }
    None => f64::INFINITY,
  };
  CandidateMatch { platform_id: hit.platform_id, distance_km }
}
