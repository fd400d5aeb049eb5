//! Distance helpers for venue records.

use crate::types::{Coordinates, Distance};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

pub const METERS_PER_MILE: f64 = 1609.34;

/// Great-circle distance between two points, in miles.
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Pick the best distance available for a venue.
///
/// Haversine when both ends have coordinates, then the provider's own
/// figure in meters, then unknown.
pub fn resolve_distance(
    origin: Option<Coordinates>,
    venue: Option<Coordinates>,
    reported_meters: Option<f64>,
) -> Distance {
    if let (Some(from), Some(to)) = (origin, venue) {
        return Distance::from_miles(haversine_miles(from, to));
    }
    match reported_meters {
        Some(m) if m.is_finite() && m >= 0.0 => Distance::from_miles(meters_to_miles(m)),
        _ => Distance::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
