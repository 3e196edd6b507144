//! Profile display and update.
//!
//! Setting a pincode triggers the postal lookup: a hit autofills city,
//! state and country; a miss clears them and warns inline, leaving the
//! rest of the update intact.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::ApiError;
use crate::geo::pincode::PincodeClient;
use crate::session::Session;

/// Optional field overrides for `profile update`.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

/// Print the signed-in user's profile.
pub async fn show(config: &Config, session: &Session) -> Result<()> {
    anyhow::ensure!(session.is_signed_in(), "Not signed in. Run `citywatch login` first.");

    let api = super::api_client(config, session)?;
    let profile = api.fetch_profile().await.context("Failed to load profile")?;

    println!("  Name:     {}", profile.name);
    println!("  Email:    {}", profile.email);
    println!("  Phone:    {}", profile.phone);
    println!("  DOB:      {}", profile.dob);
    println!("  Address:  {} {}", profile.address1, profile.address2);
    println!(
        "  Location: {} {} {} {}",
        profile.city, profile.state, profile.country, profile.pincode
    );
    Ok(())
}

/// Apply field overrides, resolve the pincode if one was given, and save.
pub async fn update(config: &Config, session: &Session, update: ProfileUpdate) -> Result<()> {
    anyhow::ensure!(session.is_signed_in(), "Not signed in. Run `citywatch login` first.");

    let api = super::api_client(config, session)?;
    let mut profile = api.fetch_profile().await.context("Failed to load profile")?;

    let pincode = update.pincode.clone();
    apply(&mut profile, update);

    if let Some(code) = pincode {
        profile.pincode = code.clone();
        let lookup = PincodeClient::new(&config.postal_api_url)?.lookup(&code).await;
        match lookup {
            Ok(place) => {
                profile.city = place.city;
                profile.state = place.state;
                profile.country = place.country;
                println!("  Location details auto-filled from pincode.");
            }
            Err(ApiError::Validation(_)) => {
                profile.city.clear();
                profile.state.clear();
                profile.country.clear();
                eprintln!("  Invalid pincode entered.");
            }
            Err(e) => {
                profile.city.clear();
                profile.state.clear();
                profile.country.clear();
                eprintln!("  Could not fetch location details: {e}");
            }
        }
    }

    api.update_profile(&profile)
        .await
        .context("Failed to save profile")?;
    println!("  Profile updated.");
    Ok(())
}

fn apply(profile: &mut crate::models::UserProfile, update: ProfileUpdate) {
    if let Some(name) = update.name {
        profile.name = name;
    }
    if let Some(phone) = update.phone {
        profile.phone = phone;
    }
    if let Some(dob) = update.dob {
        profile.dob = dob;
    }
    if let Some(address1) = update.address1 {
        profile.address1 = address1;
    }
    if let Some(address2) = update.address2 {
        profile.address2 = address2;
    }
    if let Some(city) = update.city {
        profile.city = city;
    }
    if let Some(state) = update.state {
        profile.state = state;
    }
    if let Some(country) = update.country {
        profile.country = country;
    }
}
