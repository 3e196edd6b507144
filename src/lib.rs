//! Citywatch - client for the smart-city civic backend.
//!
//! This crate provides the core functionality for the citywatch CLI:
//! authentication and session handling, report submission, the live alerts
//! feed, and the local-services finder.
//!
//! # Architecture
//!
//! The crate is built around one recurring pattern: a **live-feed view
//! model** that merges a one-shot bulk fetch with an incremental push
//! stream, deduplicates by event id, and renders newest first.
//!
//! - **Session** - owns the bearer credential, durable across runs
//! - **ApiClient** - authenticated REST calls, no automatic retry
//! - **StompChannel** - topic subscription with fixed-delay reconnect
//! - **AlertFeed** - the merge/dedup/ordering state machine, publishing
//!   snapshots to observers
//!
//! # Modules
//!
//! - [`api`] - backend REST client and payload types
//! - [`channel`] - push channel (WebSocket + STOMP subset)
//! - [`feed`] - live feed view model
//! - [`session`] - credential store
//! - [`reports`] - submission validation and the per-user draft cache
//! - [`geo`] - postal lookup and nearby-services search
//! - [`config`] - configuration loading/saving

// Library modules
pub mod api;
pub mod channel;
pub mod commands;
pub mod feed;
pub mod geo;
pub mod reports;
pub mod session;

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use api::ApiClient;
pub use channel::{ChannelConfig, PushChannel, StompChannel, TopicMessage};
pub use config::Config;
pub use error::ApiError;
pub use feed::{AlertFeed, FeedPhase, FeedSnapshot};
pub use models::{Category, FeedEvent, IncidentReport, Severity, UserProfile};
pub use session::Session;
