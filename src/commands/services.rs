//! Nearby civic services finder.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::geo::services::{filter_services, ServiceKind, ServicesClient};
use crate::geo::Coordinates;

/// Find and print services near a position.
///
/// With no position given, the fixed fallback position is used, matching
/// the behavior when geolocation is unavailable.
pub async fn near(
    config: &Config,
    lat: Option<f64>,
    lon: Option<f64>,
    kind: Option<ServiceKind>,
    query: String,
) -> Result<()> {
    let origin = match (lat, lon) {
        (Some(lat), Some(lon)) => Coordinates { lat, lon },
        _ => {
            println!("  No position given; using fallback location.");
            Coordinates::fallback()
        }
    };

    let client = ServicesClient::new(&config.overpass_api_url, config.services_radius_m)?;
    let services = client
        .find_nearby(origin)
        .await
        .context("Failed to query nearby services")?;
    let matched = filter_services(&services, kind, &query);

    if matched.is_empty() {
        println!("  No services found within {} m.", config.services_radius_m);
        return Ok(());
    }

    for s in matched {
        println!(
            "  {:>5.1} km  {:<16} {}  ({}, {})",
            s.distance_km,
            s.kind.label(),
            s.name,
            s.address,
            s.phone
        );
    }
    Ok(())
}
