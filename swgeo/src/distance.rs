//! Great-circle distance on the WGS84 mean-radius sphere

/// Mean Earth radius in meters (IUGG mean radius).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Computes the great-circle distance between two points, in meters.
///
/// Uses the haversine formula, which is numerically stable for the short
/// distances (tens of meters to a few kilometers) that audibility radii
/// operate at, as well as for antipodal points.
///
/// Coordinates are decimal degrees. The result is symmetric in its two
/// endpoints.
///
/// # Examples
///
/// ```
/// use swgeo::distance_meters;
///
/// // Same point: zero distance
/// assert_eq!(distance_meters(42.0, -71.0, 42.0, -71.0), 0.0);
/// ```
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}
