//! Domain types shared across the client.
//!
//! Wire shapes use camelCase field names to match the backend JSON; the
//! push channel delivers the same incident shape as the bulk REST fetch,
//! which is what makes the feed merge in [`crate::feed`] possible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report category.
///
/// The backend stores categories as free strings; the known ones get
/// variants so severity mapping and CLI parsing stay typed, and anything
/// else round-trips through `Other` unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Severe weather events.
    Weather,
    /// Road congestion and accidents.
    Traffic,
    /// Power grid outages.
    Power,
    /// Air or water quality incidents.
    Pollution,
    /// Medical emergencies needing transport.
    Ambulance,
    /// Any category this client does not know by name.
    Other(String),
}

impl Category {
    /// String form used on the wire and in display.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Weather => "Weather",
            Self::Traffic => "Traffic",
            Self::Power => "Power",
            Self::Pollution => "Pollution",
            Self::Ambulance => "Ambulance",
            Self::Other(s) => s,
        }
    }

    /// Severity is derived from the category, not carried on the wire.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Weather => Severity::High,
            Self::Traffic => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Weather" => Self::Weather,
            "Traffic" => Self::Traffic,
            "Power" => Self::Power,
            "Pollution" => Self::Pollution,
            "Ambulance" => Self::Ambulance,
            _ => Self::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// Alert severity, derived from [`Category::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Worth attention.
    Medium,
    /// Act now.
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

/// An incident report as the backend returns it.
///
/// This is also the body shape of every push message on the alerts topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    /// Server-assigned identifier, comparable for recency.
    pub id: i64,
    pub category: Category,
    pub location: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A patient report as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientReport {
    pub id: i64,
    pub patient_name: String,
    pub age: u32,
    pub condition: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The signed-in user's profile, round-tripped through `/user/me`.
///
/// Every field is optional on the wire; absent fields deserialize to the
/// empty string so the CLI can render and re-submit the record unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub pincode: String,
}

/// One entry in the live alerts feed.
///
/// Immutable once constructed; the feed only ever adds or removes whole
/// events.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    /// Unique identifier, server-assigned.
    pub id: i64,
    pub category: Category,
    /// Display text composed from the incident fields.
    pub message: String,
    pub occurred_at: DateTime<Utc>,
    pub severity: Severity,
}

impl From<IncidentReport> for FeedEvent {
    fn from(r: IncidentReport) -> Self {
        let severity = r.category.severity();
        let message = format!(
            "{} reported at {}. {}",
            r.category, r.location, r.description
        );
        Self {
            id: r.id,
            category: r.category,
            message,
            occurred_at: r.created_at,
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_severity_mapping() {
        assert_eq!(Category::Weather.severity(), Severity::High);
        assert_eq!(Category::Traffic.severity(), Severity::Medium);
        assert_eq!(Category::Power.severity(), Severity::Low);
        assert_eq!(
            Category::Other("Flood".to_string()).severity(),
            Severity::Low
        );
    }

    #[test]
    fn test_category_roundtrips_unknown_values() {
        let cat: Category = serde_json::from_str("\"Sinkhole\"").unwrap();
        assert_eq!(cat, Category::Other("Sinkhole".to_string()));
        assert_eq!(serde_json::to_string(&cat).unwrap(), "\"Sinkhole\"");
    }

    #[test]
    fn test_incident_report_deserializes_wire_shape() {
        let json = r#"{
            "id": 17,
            "category": "Traffic",
            "location": "Banjara Hills Main Road",
            "description": "Heavy congestion, slow-moving vehicles.",
            "createdAt": "2026-03-01T08:30:00Z"
        }"#;
        let report: IncidentReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.id, 17);
        assert_eq!(report.category, Category::Traffic);
        assert_eq!(report.location, "Banjara Hills Main Road");
    }

    #[test]
    fn test_feed_event_from_incident() {
        let report = IncidentReport {
            id: 3,
            category: Category::Weather,
            location: "Hitech City".to_string(),
            description: "Severe rainfall.".to_string(),
            created_at: Utc::now(),
        };
        let event = FeedEvent::from(report);
        assert_eq!(event.id, 3);
        assert_eq!(event.severity, Severity::High);
        assert_eq!(event.message, "Weather reported at Hitech City. Severe rainfall.");
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let profile: UserProfile = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(profile.email, "a@b.c");
        assert_eq!(profile.city, "");
    }
}
