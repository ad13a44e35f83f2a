//! Distances between (latitude, longitude) pairs.
//!
//! All distances are in statute miles.

use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;

/// Earth's mean radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;
/// Length of one degree of latitude, used by the flat-earth approximations.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// A point on Earth in degrees.
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display("({lat:.4}, {lon:.4})")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Haversine distance.
///
/// ```
/// use route_search::geo::{great_circle_miles, LatLon};
///
/// let p = LatLon::new(42.8864, -78.8784);
/// assert_eq!(great_circle_miles(p, p), 0.0);
/// ```
pub fn great_circle_miles(a: LatLon, b: LatLon) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `h` a hair above 1 for antipodes.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    c * EARTH_RADIUS_MILES
}

/// Euclidean distance on raw degrees.
///
/// Ignores the convergence of meridians, so it only holds up at mid and low
/// latitudes.
pub fn planar_miles(a: LatLon, b: LatLon) -> f64 {
    (b.lat - a.lat).hypot(b.lon - a.lon) * MILES_PER_DEGREE
}

/// Taxicab distance on raw degrees.
pub fn taxicab_miles(a: LatLon, b: LatLon) -> f64 {
    ((b.lat - a.lat).abs() + (b.lon - a.lon).abs()) * MILES_PER_DEGREE
}

/// The point at fraction `t` of the great circle from `a` to `b`.
///
/// `t = 0` is `a` and `t = 1` is `b`.
pub fn intermediate_point(a: LatLon, b: LatLon, t: f64) -> LatLon {
    let delta = great_circle_miles(a, b) / EARTH_RADIUS_MILES;
    if delta == 0.0 {
        return a;
    }

    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let wa = ((1.0 - t) * delta).sin() / delta.sin();
    let wb = (t * delta).sin() / delta.sin();

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    LatLon {
        lat: z.atan2(x.hypot(y)).to_degrees(),
        lon: y.atan2(x).to_degrees(),
    }
}
