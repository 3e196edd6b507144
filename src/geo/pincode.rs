//! Public postal-code lookup.
//!
//! Resolves a 6-digit pincode to city/state/country for profile autofill.
//! The upstream API answers HTTP 200 even for unknown codes and signals
//! failure through a `Status` field, so classification happens on the body.

use serde::Deserialize;

use crate::constants;
use crate::error::ApiError;

/// Resolved place details for a pincode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalPlace {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Wire shape: the API returns a single-element array.
#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice", default)]
    post_offices: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "Block", default)]
    block: String,
    #[serde(rename = "District", default)]
    district: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Country", default)]
    country: String,
}

/// Client for the public postal-code API.
#[derive(Debug, Clone)]
pub struct PincodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl PincodeClient {
    /// Client against the given API base URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from_reqwest)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a 6-digit pincode.
    ///
    /// Non-6-digit input is rejected client-side; an unknown code comes
    /// back as `Validation` too, so callers clear the dependent fields and
    /// warn inline either way.
    pub async fn lookup(&self, code: &str) -> Result<PostalPlace, ApiError> {
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::missing(&["pincode"]));
        }

        let url = format!("{}/pincode/{code}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let envelopes: Vec<LookupEnvelope> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let Some(envelope) = envelopes.into_iter().next() else {
            return Err(ApiError::Decode("empty lookup response".to_string()));
        };

        let office = match (envelope.status.as_str(), envelope.post_offices) {
            ("Success", Some(offices)) => offices.into_iter().next(),
            _ => None,
        };

        let Some(office) = office else {
            log::debug!("Pincode {code} not found upstream");
            return Err(ApiError::missing(&["pincode"]));
        };

        let city = if office.block.is_empty() {
            office.district
        } else {
            office.block
        };
        let country = if office.country.is_empty() {
            "India".to_string()
        } else {
            office.country
        };

        Ok(PostalPlace {
            city,
            state: office.state,
            country,
        })
    }
}
