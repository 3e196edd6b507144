//! Request and response payload types for the backend REST API.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::Category;

/// Email/password pair for sign-in and sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Reject obviously malformed credentials before any network call.
    ///
    /// The backend owns real validation; this only catches what a form
    /// would have caught inline.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() || !self.email.contains('@') {
            missing.push("email");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::missing(&missing))
        }
    }
}

/// Successful authentication response carrying the bearer credential.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Incident report submission payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewIncidentReport {
    pub category: Category,
    pub location: String,
    pub description: String,
}

impl NewIncidentReport {
    /// Category, location and description are all required.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if self.category.as_str().trim().is_empty() {
            missing.push("category");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::missing(&missing))
        }
    }
}

/// Patient report submission payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatientReport {
    pub patient_name: String,
    pub age: u32,
    pub condition: String,
    pub location: String,
    pub description: String,
}

impl NewPatientReport {
    /// Name, a plausible age, condition and location are required.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if self.patient_name.trim().is_empty() {
            missing.push("patientName");
        }
        if self.age == 0 || self.age > 130 {
            missing.push("age");
        }
        if self.condition.trim().is_empty() {
            missing.push("condition");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::missing(&missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_email_shape() {
        let creds = Credentials {
            email: "not-an-email".to_string(),
            password: "hunter2".to_string(),
        };
        match creds.validate() {
            Err(ApiError::Validation(fields)) => assert_eq!(fields, vec!["email"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_incident_validation_collects_all_missing_fields() {
        let report = NewIncidentReport {
            category: Category::Other(String::new()),
            location: "  ".to_string(),
            description: String::new(),
        };
        match report.validate() {
            Err(ApiError::Validation(fields)) => {
                assert_eq!(fields, vec!["category", "location", "description"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_incident_passes() {
        let report = NewIncidentReport {
            category: Category::Traffic,
            location: "Main Road".to_string(),
            description: "Stalled bus".to_string(),
        };
        assert!(report.validate().is_ok());
    }

    #[test]
    fn test_patient_age_bounds() {
        let mut report = NewPatientReport {
            patient_name: "R. Rao".to_string(),
            age: 0,
            condition: "stable".to_string(),
            location: "Ward 3".to_string(),
            description: String::new(),
        };
        assert!(report.validate().is_err());
        report.age = 45;
        assert!(report.validate().is_ok());
    }
}
