//! Incident and patient report submission, listings, and the draft cache.

use anyhow::{Context, Result};

use crate::api::{NewIncidentReport, NewPatientReport};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::Category;
use crate::reports::{self, DraftCache};
use crate::session::Session;

/// Submit an incident report.
pub async fn incident(
    config: &Config,
    session: &Session,
    category: Category,
    location: String,
    description: String,
) -> Result<()> {
    anyhow::ensure!(session.is_signed_in(), "Not signed in. Run `citywatch login` first.");

    let api = super::api_client(config, session)?;
    let drafts = DraftCache::for_user(&super::cache_identity(session))?;

    let report = NewIncidentReport {
        category,
        location,
        description,
    };
    match reports::submit_incident(&api, &drafts, report).await {
        Ok(accepted) => {
            println!(
                "  Report #{} submitted: {} at {}",
                accepted.id, accepted.category, accepted.location
            );
            Ok(())
        }
        Err(ApiError::Validation(fields)) => {
            eprintln!("  Please fill all required fields: {}", fields.join(", "));
            Ok(())
        }
        Err(e) => Err(e).context("Failed to submit report"),
    }
}

/// Submit a patient report.
pub async fn patient(
    config: &Config,
    session: &Session,
    patient_name: String,
    age: u32,
    condition: String,
    location: String,
    description: String,
) -> Result<()> {
    anyhow::ensure!(session.is_signed_in(), "Not signed in. Run `citywatch login` first.");

    let api = super::api_client(config, session)?;
    let report = NewPatientReport {
        patient_name,
        age,
        condition,
        location,
        description,
    };
    match reports::submit_patient(&api, report).await {
        Ok(accepted) => {
            println!("  Patient report #{} submitted for {}", accepted.id, accepted.patient_name);
            Ok(())
        }
        Err(ApiError::Validation(fields)) => {
            eprintln!("  Please fill all required fields: {}", fields.join(", "));
            Ok(())
        }
        Err(e) => Err(e).context("Failed to submit patient report"),
    }
}

/// List the signed-in user's reports from the backend.
pub async fn mine(config: &Config, session: &Session, patient: bool) -> Result<()> {
    anyhow::ensure!(session.is_signed_in(), "Not signed in. Run `citywatch login` first.");

    let api = super::api_client(config, session)?;
    if patient {
        let reports = api
            .fetch_my_patient_reports()
            .await
            .context("Failed to load patient reports")?;
        if reports.is_empty() {
            println!("  No patient reports yet.");
        }
        for r in reports {
            println!(
                "  #{} {} ({}, age {}) at {} — {}",
                r.id, r.patient_name, r.condition, r.age, r.location, r.created_at
            );
        }
    } else {
        let reports = api
            .fetch_my_incidents()
            .await
            .context("Failed to load incident reports")?;
        if reports.is_empty() {
            println!("  No incident reports yet.");
        }
        for r in reports {
            println!("  #{} {} at {} — {}", r.id, r.category, r.location, r.created_at);
        }
    }
    Ok(())
}

/// List locally cached drafts for the current identity.
pub fn drafts(session: &Session) -> Result<()> {
    let cache = DraftCache::for_user(&super::cache_identity(session))?;
    let drafts = cache.list();
    if drafts.is_empty() {
        println!("  No cached reports.");
    }
    for d in drafts {
        println!("  {} {} at {} — {}", d.id, d.category, d.location, d.created_at);
    }
    Ok(())
}

/// Clear the local draft cache for the current identity.
pub fn clear_drafts(session: &Session) -> Result<()> {
    DraftCache::for_user(&super::cache_identity(session))?.clear()?;
    println!("  Draft cache cleared.");
    Ok(())
}
