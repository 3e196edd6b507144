//! Geographic helpers and third-party lookup clients.
//!
//! # Modules
//!
//! - [`pincode`] - public postal-code lookup (6-digit codes)
//! - [`services`] - nearby civic services via the public map-data API

pub mod pincode;
pub mod services;

use crate::constants;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Fixed fallback used when the caller has no position of their own.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            lat: constants::FALLBACK_LAT,
            lon: constants::FALLBACK_LON,
        }
    }
}

/// Great-circle distance between two positions, in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
