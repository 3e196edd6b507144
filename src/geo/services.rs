//! Nearby civic services via the public map-data (Overpass) API.
//!
//! One query fetches hospital, pharmacy, shelter, community-centre and
//! doctors amenity nodes within a fixed radius of a position; results get a
//! haversine distance from the origin and come back sorted nearest first.
//! Filtering (by kind, by name/address substring) is pure and local so the
//! CLI can re-filter without refetching.

use serde::Deserialize;
use std::collections::HashMap;

use super::{haversine_km, Coordinates};
use crate::constants;
use crate::error::ApiError;

/// Kind of civic service point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Hospital,
    Pharmacy,
    Clinic,
    Shelter,
    CommunityCenter,
}

impl ServiceKind {
    /// Map an OSM amenity tag to a kind. Unknown tags read as clinics,
    /// matching how the feed of amenities queried here is interpreted.
    #[must_use]
    pub fn from_amenity(tag: &str) -> Self {
        match tag {
            "hospital" => Self::Hospital,
            "pharmacy" => Self::Pharmacy,
            "shelter" => Self::Shelter,
            "community_centre" => Self::CommunityCenter,
            _ => Self::Clinic,
        }
    }

    /// Display label, also accepted by the CLI filter flag.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hospital => "Hospital",
            Self::Pharmacy => "Pharmacy",
            Self::Clinic => "Clinic",
            Self::Shelter => "Shelter",
            Self::CommunityCenter => "Community Center",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hospital" => Ok(Self::Hospital),
            "pharmacy" => Ok(Self::Pharmacy),
            "clinic" => Ok(Self::Clinic),
            "shelter" => Ok(Self::Shelter),
            "community-center" | "community_centre" => Ok(Self::CommunityCenter),
            other => Err(format!("unknown service kind: {other}")),
        }
    }
}

/// One service point, with its distance from the query origin.
#[derive(Debug, Clone)]
pub struct ServicePoint {
    pub id: i64,
    pub name: String,
    pub kind: ServiceKind,
    pub lat: f64,
    pub lon: f64,
    pub address: String,
    pub phone: String,
    pub distance_km: f64,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Client for the public Overpass endpoint.
#[derive(Debug, Clone)]
pub struct ServicesClient {
    client: reqwest::Client,
    base_url: String,
    radius_m: u32,
}

impl ServicesClient {
    /// Client against the given Overpass base URL.
    pub fn new(base_url: &str, radius_m: u32) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from_reqwest)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            radius_m,
        })
    }

    /// Fetch all service points around `origin`, sorted nearest first.
    pub async fn find_nearby(&self, origin: Coordinates) -> Result<Vec<ServicePoint>, ApiError> {
        let url = format!("{}/api/interpreter", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("data", build_query(origin, self.radius_m))])
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let mut services: Vec<ServicePoint> = parsed
            .elements
            .into_iter()
            .map(|el| to_service_point(el, origin))
            .collect();
        services.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(services)
    }
}

/// Overpass QL for the amenity kinds the finder knows about.
fn build_query(origin: Coordinates, radius_m: u32) -> String {
    let around = format!("(around:{radius_m},{},{})", origin.lat, origin.lon);
    format!(
        "[out:json];(\
         node[\"amenity\"=\"hospital\"]{around};\
         node[\"amenity\"=\"pharmacy\"]{around};\
         node[\"amenity\"=\"shelter\"]{around};\
         node[\"amenity\"=\"community_centre\"]{around};\
         node[\"amenity\"=\"doctors\"]{around};\
         );out;"
    )
}

fn to_service_point(el: OverpassElement, origin: Coordinates) -> ServicePoint {
    let tag = |name: &str| el.tags.get(name).cloned();

    let address = tag("addr:full").unwrap_or_else(|| {
        format!(
            "{}, {}",
            tag("addr:street").unwrap_or_else(|| "Nearby".to_string()),
            tag("addr:city").unwrap_or_else(|| constants::FALLBACK_CITY.to_string()),
        )
    });

    let position = Coordinates {
        lat: el.lat,
        lon: el.lon,
    };

    ServicePoint {
        id: el.id,
        name: tag("name").unwrap_or_else(|| "Unknown".to_string()),
        kind: ServiceKind::from_amenity(tag("amenity").unwrap_or_default().as_str()),
        lat: el.lat,
        lon: el.lon,
        address,
        phone: tag("phone").unwrap_or_else(|| "N/A".to_string()),
        distance_km: haversine_km(origin, position),
    }
}

/// Filter by kind and case-insensitive name/address substring.
#[must_use]
pub fn filter_services(
    services: &[ServicePoint],
    kind: Option<ServiceKind>,
    query: &str,
) -> Vec<ServicePoint> {
    let needle = query.to_lowercase();
    services
        .iter()
        .filter(|s| kind.map_or(true, |k| s.kind == k))
        .filter(|s| {
            needle.is_empty()
                || s.name.to_lowercase().contains(&needle)
                || s.address.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
