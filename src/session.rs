//! Session store: the bearer credential and the signed-in identity.
//!
//! A [`Session`] is the single owner of the credential. Components that
//! issue authenticated calls receive the token read-only at construction
//! time; only the sign-in and sign-out flows mutate the store. The store
//! keeps no expiry -- a token is treated as valid until the backend answers
//! 401, at which point the caller prompts re-authentication.
//!
//! The session is durable across process restarts via a JSON file in the
//! config directory, written with owner-only permissions on Unix.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::{fs, path::PathBuf};

use crate::config::Config;

/// On-disk shape of the session file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Holds the opaque bearer credential and the signed-in user's email.
#[derive(Debug)]
pub struct Session {
    token: Option<String>,
    email: Option<String>,
    path: PathBuf,
}

impl Session {
    /// Load the session from the default location under the config dir.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(Config::config_dir()?.join("session.json")))
    }

    /// Load a session from an explicit path.
    ///
    /// A missing or unreadable file yields an empty (signed-out) session;
    /// corruption never blocks the user from signing in again.
    pub fn load_from(path: PathBuf) -> Self {
        let stored = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<SessionFile>(&content).ok())
            .unwrap_or_default();

        Self {
            token: stored.token.filter(|t| !t.is_empty()),
            email: stored.email,
            path,
        }
    }

    /// The bearer credential, if signed in.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The signed-in user's email, if known.
    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// True when a credential is present.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Record a fresh credential after sign-in and persist it.
    pub fn set_credential(&mut self, token: String, email: String) -> Result<()> {
        self.token = Some(token);
        self.email = Some(email);
        self.save()
    }

    /// Clear the credential at sign-out and persist the empty state.
    ///
    /// Idempotent; clearing an already-empty session rewrites the file.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        self.email = None;
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let stored = SessionFile {
            token: self.token.clone(),
            email: self.email.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)
            .with_context(|| format!("writing {}", self.path.display()))?;

        // Credential file is owner read/write only
        #[cfg(unix)]
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session_path(dir: &TempDir) -> PathBuf {
        dir.path().join("session.json")
    }

    #[test]
    fn test_missing_file_is_signed_out() {
        let dir = TempDir::new().unwrap();
        let session = Session::load_from(session_path(&dir));
        assert!(!session.is_signed_in());
        assert!(session.credential().is_none());
    }

    #[test]
    fn test_set_credential_roundtrips() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::load_from(session_path(&dir));
        session
            .set_credential("tok-123".to_string(), "a@b.c".to_string())
            .unwrap();

        let reloaded = Session::load_from(session_path(&dir));
        assert_eq!(reloaded.credential(), Some("tok-123"));
        assert_eq!(reloaded.user_email(), Some("a@b.c"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::load_from(session_path(&dir));
        session
            .set_credential("tok".to_string(), "a@b.c".to_string())
            .unwrap();
        session.clear().unwrap();
        session.clear().unwrap();

        let reloaded = Session::load_from(session_path(&dir));
        assert!(!reloaded.is_signed_in());
    }

    #[test]
    fn test_corrupt_file_yields_empty_session() {
        let dir = TempDir::new().unwrap();
        let path = session_path(&dir);
        fs::write(&path, "not json at all").unwrap();
        let session = Session::load_from(path);
        assert!(!session.is_signed_in());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_has_restrictive_permissions() {
        let dir = TempDir::new().unwrap();
        let path = session_path(&dir);
        let mut session = Session::load_from(path.clone());
        session
            .set_credential("tok".to_string(), "a@b.c".to_string())
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
