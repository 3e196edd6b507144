//! Sign-in, sign-up, and sign-out.
//!
//! Sign-in exchanges credentials for a bearer token and hands it to the
//! session store, the single owner of credential mutation. Sign-out only
//! clears local state; there is no backend call to revoke.

use anyhow::{Context, Result};

use crate::api::Credentials;
use crate::config::Config;
use crate::session::Session;

/// Sign in and persist the credential.
pub async fn login(config: &Config, session: &mut Session, email: String, password: String) -> Result<()> {
    let api = super::api_client(config, session)?;
    let auth = api
        .sign_in(&Credentials {
            email: email.clone(),
            password,
        })
        .await
        .context("Sign-in failed")?;

    session.set_credential(auth.token, email)?;
    println!("  Signed in as {}", session.user_email().unwrap_or("?"));
    Ok(())
}

/// Create an account and sign in.
pub async fn register(
    config: &Config,
    session: &mut Session,
    email: String,
    password: String,
) -> Result<()> {
    let api = super::api_client(config, session)?;
    let auth = api
        .register(&Credentials {
            email: email.clone(),
            password,
        })
        .await
        .context("Sign-up failed")?;

    session.set_credential(auth.token, email)?;
    println!("  Account created; signed in as {}", session.user_email().unwrap_or("?"));
    Ok(())
}

/// Clear the local credential.
pub fn logout(session: &mut Session) -> Result<()> {
    session.clear()?;
    println!("  Signed out.");
    Ok(())
}
