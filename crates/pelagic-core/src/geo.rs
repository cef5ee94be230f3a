//! Great-circle geometry.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres, via the
/// haversine formula.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
  let phi1 = lat1.to_radians();
  let phi2 = lat2.to_radians();
  let d_phi = (lat2 - lat1).to_radians();
  let d_lambda = (lon2 - lon1).to_radians();

  let a = (d_phi / 2.0).sin().powi(2)
    + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
  let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

  EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_distance_for_identical_points() {
    assert_eq!(haversine_km(10.0, 75.0, 10.0, 75.0), 0.0);
  }

  #[test]
  fn one_degree_of_longitude_at_the_equator() {
    let d = haversine_km(0.0, 0.0, 0.0, 1.0);
    // 2 * pi * 6371 / 360 ≈ 111.19 km
    assert!((d - 111.19).abs() < 0.05, "got {d}");
  }

  #[test]
  fn symmetric() {
    let ab = haversine_km(10.0, 75.0, -3.5, 80.25);
    let ba = haversine_km(-3.5, 80.25, 10.0, 75.0);
    assert!((ab - ba).abs() < 1e-9);
  }
}
