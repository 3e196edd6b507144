//! Backend communication module for citywatch.
//!
//! This module provides types for communicating with the civic backend:
//!
//! - HTTP client for the REST API ([`ApiClient`])
//! - Request/response payload types ([`types`])
//!
//! # Architecture
//!
//! All calls go out as JSON over a single configured `reqwest::Client`.
//! When a credential is present it is attached as a bearer authorization
//! header; otherwise the call proceeds unauthenticated and the server
//! decides whether that is permitted. Failures are classified into
//! [`crate::error::ApiError`] and surfaced once -- there is no automatic
//! retry anywhere on the REST path.
//!
//! # Modules
//!
//! - [`client`] - HTTP client for the backend REST API
//! - [`types`] - Request/response payload types

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{AuthResponse, Credentials, NewIncidentReport, NewPatientReport};
