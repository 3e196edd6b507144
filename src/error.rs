//! Error taxonomy for backend and third-party calls.
//!
//! A single typed enum covers every way a client-side operation can fail
//! short of a bug: missing credential, transport failure, HTTP-level
//! rejection, undecodable body, or a form that never should have left the
//! keyboard. Push-channel connectivity failures are deliberately absent --
//! the channel recovers those internally and never surfaces them here.

use std::fmt;

/// Errors surfaced by the REST client, the third-party lookups, and
/// client-side form validation.
#[derive(Debug)]
pub enum ApiError {
    /// No credential is present but the operation requires one.
    ///
    /// Callers must prompt for sign-in rather than send the request.
    Unauthenticated,
    /// The transport failed before any response was received.
    NetworkUnreachable(String),
    /// A response was received with a non-2xx status.
    HttpStatus(u16),
    /// The response body was not valid JSON for the expected shape.
    Decode(String),
    /// A submission is missing or malforms required fields.
    ///
    /// Raised before any network call; the named fields are reported inline
    /// and the request is never sent.
    Validation(Vec<String>),
}

impl ApiError {
    /// Classify a `reqwest` error into the taxonomy.
    ///
    /// Decode failures keep their own kind; everything else that happens
    /// before a status line is transport-level.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::NetworkUnreachable(err.to_string())
        }
    }

    /// True when the backend rejected the credential itself.
    ///
    /// The session store keeps no expiry; this is the signal that
    /// re-authentication is needed.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::HttpStatus(401 | 403))
    }

    /// Build a validation error from the fields found missing.
    #[must_use]
    pub fn missing(fields: &[&str]) -> Self {
        Self::Validation(fields.iter().map(|f| (*f).to_string()).collect())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not signed in"),
            Self::NetworkUnreachable(msg) => write!(f, "network unreachable: {msg}"),
            Self::HttpStatus(code) => write!(f, "server returned HTTP {code}"),
            Self::Decode(msg) => write!(f, "invalid response body: {msg}"),
            Self::Validation(fields) => {
                write!(f, "missing or invalid fields: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for ApiError {}
