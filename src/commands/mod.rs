//! CLI subcommand implementations.
//!
//! Commands are thin: they load config and session, construct the library
//! clients, and render results. All behavior worth testing lives in the
//! library modules; errors are layered with `anyhow::Context` here and
//! printed once at the top level.
//!
//! # Modules
//!
//! - [`auth`] - sign-in, sign-up, sign-out
//! - [`profile`] - profile display and update with pincode autofill
//! - [`report`] - incident/patient submission, my-reports, draft cache
//! - [`alerts`] - one-shot alert listing and the live feed
//! - [`services`] - nearby civic services finder

pub mod alerts;
pub mod auth;
pub mod profile;
pub mod report;
pub mod services;

use crate::api::ApiClient;
use crate::config::Config;
use crate::session::Session;

/// Build an API client carrying the current session credential, if any.
pub(crate) fn api_client(config: &Config, session: &Session) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(
        &config.server_url,
        session.credential().map(String::from),
    )?)
}

/// Identity used for the local draft cache when signed out.
pub(crate) fn cache_identity(session: &Session) -> String {
    session
        .user_email()
        .unwrap_or("guest@example.com")
        .to_string()
}
