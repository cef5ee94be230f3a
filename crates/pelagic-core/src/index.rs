//! The candidate-index collaborator seam.
//!
//! The index is an external approximate text/embedding search over platform
//! metadata. The core only sees this trait; the resolver over-fetches from
//! it and re-ranks by exact geodesic distance.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformId;

/// Latitude/longitude bounding extent from a platform's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
  pub lat_min: f64,
  pub lat_max: f64,
  pub lon_min: f64,
  pub lon_max: f64,
}

impl SpatialExtent {
  /// Midpoint used for exact re-ranking.
  pub fn midpoint(&self) -> (f64, f64) {
    (
      (self.lat_min + self.lat_max) / 2.0,
      (self.lon_min + self.lon_max) / 2.0,
    )
  }
}

/// One approximate hit from the index. Extent metadata may be missing, in
/// which case the resolver assigns the infinite-distance sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateHit {
  pub platform_id: PlatformId,
  pub extent:      Option<SpatialExtent>,
}

/// A re-ranked candidate. `distance_km` is `f64::INFINITY` when the hit had
/// no extent metadata, so such candidates sort last rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
  pub platform_id: PlatformId,
  pub distance_km: f64,
}

/// Abstraction over the external approximate-search collaborator.
pub trait CandidateIndex: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return up to `k` approximate matches for a free-text cue.
  fn query_by_text<'a>(
    &'a self,
    text: &'a str,
    k: usize,
  ) -> impl Future<Output = Result<Vec<CandidateHit>, Self::Error>> + Send + 'a;
}
