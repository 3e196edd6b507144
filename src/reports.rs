//! Report submission and the per-user draft cache.
//!
//! Submissions are validated before any network call; a rejected form
//! surfaces [`ApiError::Validation`] inline and nothing leaves the machine.
//! Accepted submissions are appended to a local, per-user draft cache so
//! "my reports" renders instantly even when offline. A failed submission
//! leaves both the form input and the cache untouched.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use uuid::Uuid;

use crate::api::{ApiClient, NewIncidentReport, NewPatientReport};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Category, IncidentReport, PatientReport};

/// A locally cached copy of a submitted incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftReport {
    /// Local identifier; the server id is not ours to reuse offline.
    pub id: Uuid,
    pub category: Category,
    pub location: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// File-backed draft storage keyed by the signed-in user.
#[derive(Debug)]
pub struct DraftCache {
    path: PathBuf,
}

impl DraftCache {
    /// Cache for the given user under the config directory.
    pub fn for_user(email: &str) -> Result<Self> {
        let file = format!("reports_{}.json", sanitize_key(email));
        Ok(Self::at(Config::config_dir()?.join("drafts").join(file)))
    }

    /// Cache at an explicit path (tests).
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// All cached drafts, oldest first.
    ///
    /// A missing or corrupt file yields the empty list; the cache is a
    /// convenience, never a reason to fail a command.
    #[must_use]
    pub fn list(&self) -> Vec<DraftReport> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Append one draft and persist.
    pub fn append(&self, draft: DraftReport) -> Result<()> {
        let mut drafts = self.list();
        drafts.push(draft);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&drafts)?)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    /// Drop all cached drafts.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Make an arbitrary user identifier safe as a file name component.
fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Validate and submit an incident report, then cache it locally.
///
/// Validation failures return before any network call. Network or server
/// failures propagate without touching the cache.
pub async fn submit_incident(
    api: &ApiClient,
    drafts: &DraftCache,
    report: NewIncidentReport,
) -> Result<IncidentReport, ApiError> {
    report.validate()?;
    let accepted = api.submit_incident(&report).await?;

    let draft = DraftReport {
        id: Uuid::new_v4(),
        category: accepted.category.clone(),
        location: accepted.location.clone(),
        description: accepted.description.clone(),
        created_at: accepted.created_at,
    };
    if let Err(e) = drafts.append(draft) {
        // The backend accepted the report; a cache miss is not a failure.
        log::warn!("Could not cache submitted report: {e}");
    }

    Ok(accepted)
}

/// Validate and submit a patient report.
pub async fn submit_patient(
    api: &ApiClient,
    report: NewPatientReport,
) -> Result<PatientReport, ApiError> {
    report.validate()?;
    api.submit_patient(&report).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cache_in(dir: &TempDir) -> DraftCache {
        DraftCache::at(dir.path().join("reports_test.json"))
    }

    fn draft(location: &str) -> DraftReport {
        DraftReport {
            id: Uuid::new_v4(),
            category: Category::Power,
            location: location.to_string(),
            description: "outage".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("a@b.c"), "a_b_c");
        assert_eq!(sanitize_key("plain123"), "plain123");
    }

    #[test]
    fn test_empty_cache_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(cache_in(&dir).list().is_empty());
    }

    #[test]
    fn test_append_persists_in_order() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.append(draft("Ward 1")).unwrap();
        cache.append(draft("Ward 2")).unwrap();

        let drafts = cache.list();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].location, "Ward 1");
        assert_eq!(drafts[1].location, "Ward 2");
    }

    #[test]
    fn test_corrupt_cache_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        fs::write(dir.path().join("reports_test.json"), "{{{").unwrap();
        assert!(cache.list().is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.append(draft("x")).unwrap();
        cache.clear().unwrap();
        cache.clear().unwrap();
        assert!(cache.list().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_submission_makes_zero_network_calls() {
        let server = MockServer::start().await;
        let api = ApiClient::new(&server.uri(), Some("tok".to_string())).unwrap();
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        let incomplete = NewIncidentReport {
            category: Category::Traffic,
            location: String::new(),
            description: "jam".to_string(),
        };
        let result = submit_incident(&api, &cache, incomplete).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
        assert!(cache.list().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_submission_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reports/incident"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 11,
                "category": "Traffic",
                "location": "Main Road",
                "description": "jam",
                "createdAt": "2026-03-01T09:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Some("tok".to_string())).unwrap();
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        let report = NewIncidentReport {
            category: Category::Traffic,
            location: "Main Road".to_string(),
            description: "jam".to_string(),
        };
        let accepted = submit_incident(&api, &cache, report).await.unwrap();

        assert_eq!(accepted.id, 11);
        let drafts = cache.list();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].location, "Main Road");
    }

    #[tokio::test]
    async fn test_server_rejection_leaves_cache_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reports/incident"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Some("tok".to_string())).unwrap();
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        let report = NewIncidentReport {
            category: Category::Traffic,
            location: "Main Road".to_string(),
            description: "jam".to_string(),
        };
        let result = submit_incident(&api, &cache, report).await;

        assert!(matches!(result, Err(ApiError::HttpStatus(503))));
        assert!(cache.list().is_empty());
    }
}
