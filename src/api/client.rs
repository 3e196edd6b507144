//! HTTP client for the civic backend REST API.
//!
//! This module provides the [`ApiClient`] struct which handles all HTTP
//! communication with the backend. Every endpoint method routes through one
//! `send` path so authorization, JSON handling and error classification
//! stay uniform.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{AuthResponse, Credentials, NewIncidentReport, NewPatientReport};
use crate::constants;
use crate::error::ApiError;
use crate::models::{IncidentReport, PatientReport, UserProfile};

/// API client for the civic backend.
///
/// Encapsulates HTTP client configuration, the base URL, and the optional
/// bearer credential. The credential is captured at construction time and
/// never mutated here -- the session store owns its lifecycle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a new API client against the given server.
    ///
    /// `token` is the session credential if signed in; unauthenticated
    /// clients can still call the endpoints the server leaves open.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(server_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(constants::HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from_reqwest)?;

        Ok(Self::with_client(client, server_url, token))
    }

    /// Creates an API client with a pre-configured HTTP client.
    ///
    /// Useful for testing or when custom client configuration is needed.
    #[must_use]
    pub fn with_client(client: Client, server_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: format!("{}/api", server_url.trim_end_matches('/')),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Returns the resolved API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Exchange credentials for a bearer token.
    pub async fn sign_in(&self, creds: &Credentials) -> Result<AuthResponse, ApiError> {
        creds.validate()?;
        self.send(self.request(Method::POST, "/auth/login").json(creds))
            .await
    }

    /// Register a new account and receive a bearer token.
    pub async fn register(&self, creds: &Credentials) -> Result<AuthResponse, ApiError> {
        creds.validate()?;
        self.send(self.request(Method::POST, "/auth/register").json(creds))
            .await
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// Fetch the signed-in user's profile.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::GET, "/user/me")).await
    }

    /// Replace the signed-in user's profile.
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::PUT, "/user/me").json(profile))
            .await
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// Bulk-fetch all current incident reports (the alerts feed seed).
    pub async fn fetch_incidents(&self) -> Result<Vec<IncidentReport>, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::GET, "/reports/incident")).await
    }

    /// Fetch only the signed-in user's incident reports.
    pub async fn fetch_my_incidents(&self) -> Result<Vec<IncidentReport>, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::GET, "/reports/incident/my"))
            .await
    }

    /// Submit a new incident report. Callers validate first; see
    /// [`crate::reports::submit_incident`].
    pub async fn submit_incident(
        &self,
        report: &NewIncidentReport,
    ) -> Result<IncidentReport, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::POST, "/reports/incident").json(report))
            .await
    }

    /// Fetch the signed-in user's patient reports.
    pub async fn fetch_my_patient_reports(&self) -> Result<Vec<PatientReport>, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::GET, "/reports/patient/my"))
            .await
    }

    /// Submit a new patient report.
    pub async fn submit_patient(
        &self,
        report: &NewPatientReport,
    ) -> Result<PatientReport, ApiError> {
        self.require_credential()?;
        self.send(self.request(Method::POST, "/reports/patient").json(report))
            .await
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn require_credential(&self) -> Result<(), ApiError> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("backend rejected request: HTTP {status}");
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
        ApiClient::new(&server.uri(), token.map(String::from)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_incidents_decodes_and_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/incident"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1,
                    "category": "Weather",
                    "location": "Hitech City",
                    "description": "Severe rainfall.",
                    "createdAt": "2026-03-01T08:30:00Z"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, Some("tok-1"));
        let incidents = api.fetch_incidents().await.unwrap();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].id, 1);
    }

    #[tokio::test]
    async fn test_http_error_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/incident"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = client_for(&server, Some("tok"));
        match api.fetch_incidents().await {
            Err(ApiError::HttpStatus(500)) => {}
            other => panic!("expected HttpStatus(500), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let api = client_for(&server, Some("tok"));
        match api.fetch_profile().await {
            Err(ApiError::Decode(_)) => {}
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_classified() {
        // Nothing listens on port 9; the connect fails before any response.
        let api = ApiClient::new("http://127.0.0.1:9", Some("tok".to_string())).unwrap();
        match api.fetch_incidents().await {
            Err(ApiError::NetworkUnreachable(_)) => {}
            other => panic!("expected NetworkUnreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        // No mock mounted: a request reaching the server would 404 instead.
        let server = MockServer::start().await;
        let api = client_for(&server, None);
        match api.fetch_profile().await {
            Err(ApiError::Unauthenticated) => {}
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_partial_json(serde_json::json!({"email": "a@b.c"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t-9"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server, None);
        let auth = api
            .sign_in(&Credentials {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(auth.token, "t-9");
    }

    #[tokio::test]
    async fn test_sign_in_validation_makes_no_network_call() {
        let server = MockServer::start().await;
        let api = client_for(&server, None);
        let result = api
            .sign_in(&Credentials {
                email: String::new(),
                password: String::new(),
            })
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
