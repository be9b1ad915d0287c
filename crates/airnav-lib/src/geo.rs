//! Great-circle helpers for resolving GPS fixes to waypoints.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two `(lat, lon)` pairs in degrees.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Pick the candidate closest to `origin` that lies within `max_distance_m`.
///
/// Returns the item and its distance. Candidates without a position are
/// ignored.
pub fn nearest_within<T>(
    origin: (f64, f64),
    max_distance_m: f64,
    candidates: impl IntoIterator<Item = (T, Option<(f64, f64)>)>,
) -> Option<(T, f64)> {
    candidates
        .into_iter()
        .filter_map(|(item, position)| position.map(|pos| (item, haversine_m(origin, pos))))
        .filter(|(_, distance)| *distance <= max_distance_m)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
