//! Geographic primitives shared by every engine component

use serde::{Deserialize, Serialize};

/// A WGS84 position in (latitude, longitude) order
///
/// Serialized as a `[lat, lon]` array. Routing providers that speak
/// `[lon, lat]` convert through [`Coordinate::from_lon_lat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from a provider's `[lon, lat]` pair
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lon: pair[0],
        }
    }

    /// Finite and within the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Smallest waypoint list a routing provider can resolve
pub const MIN_ROUTE_WAYPOINTS: usize = 2;

/// Whether a waypoint list is long enough to be sent to a provider
pub fn is_routable(waypoints: Option<&[Coordinate]>) -> bool {
    waypoints.is_some_and(|w| w.len() >= MIN_ROUTE_WAYPOINTS)
}
