//! Application-wide constants for citywatch.
//!
//! This module centralizes magic numbers and fixed endpoints to improve
//! maintainability and discoverability. Constants are grouped by domain.
//!
//! # Categories
//!
//! - **Timeouts**: Network timeouts and reconnect pacing
//! - **Push channel**: WebSocket endpoint and topics
//! - **Geo**: Services search radius and fallback position

use std::time::Duration;

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for API calls.
///
/// Applies to individual HTTP requests to the backend and to the public
/// postal/map APIs. 30 seconds covers the slow public endpoints while still
/// preventing indefinite hangs on network issues.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay between push-channel reconnection attempts.
///
/// The channel retries with this fixed delay, unconditionally, until it is
/// explicitly disconnected. There is no backoff growth and no retry budget.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Timeout for the STOMP CONNECTED handshake frame after the WebSocket opens.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Push channel
// ============================================================================

/// WebSocket endpoint path on the backend host.
pub const WS_PATH: &str = "/ws";

/// Broker topic carrying live incident alerts.
pub const ALERTS_TOPIC: &str = "/topic/alerts";

/// Capacity of the inbound message queue between the socket task and the
/// consumer. The consumer is expected to drain promptly; a full queue applies
/// backpressure to the socket task rather than growing without bound.
pub const CHANNEL_QUEUE_CAPACITY: usize = 64;

// ============================================================================
// Geo
// ============================================================================

/// Search radius for the local-services finder, in meters.
pub const SERVICES_RADIUS_M: u32 = 5000;

/// Fallback position used when the caller has no location of their own.
pub const FALLBACK_LAT: f64 = 17.385;
/// Longitude half of [`FALLBACK_LAT`].
pub const FALLBACK_LON: f64 = 78.4867;

/// City name used when a service node carries no address city tag.
pub const FALLBACK_CITY: &str = "Hyderabad";
