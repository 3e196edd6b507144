//! Push-channel abstraction for the live alerts subscription.
//!
//! The backend exposes a publish/subscribe broker over a WebSocket at
//! `/ws`, speaking a small STOMP subset. This module provides a unified
//! [`PushChannel`] trait and the concrete [`StompChannel`] implementation.
//!
//! # Architecture
//!
//! ```text
//! PushChannel (trait)
//!     │
//!     └── StompChannel
//!         ├── WebSocket connection (tokio-tungstenite)
//!         ├── STOMP frame codec (frame module)
//!         └── Reconnection (fixed delay, unconditional)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let config = ChannelConfig::new(cfg.ws_url(), vec![ALERTS_TOPIC.into()]);
//! let mut channel = StompChannel::connect(config);
//!
//! while let Some(msg) = channel.recv().await {
//!     // msg.topic, msg.body (JSON text)
//! }
//! channel.disconnect().await;
//! ```
//!
//! Reconnection is automatic and unconditional: a fixed delay, forever,
//! until the channel is explicitly disconnected. Connectivity loss is never
//! surfaced to consumers as an error -- only through [`ConnectionState`]
//! for anyone who cares to observe it.

pub mod frame;
pub mod stomp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::constants;

/// Configuration for establishing a push-channel connection.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Full WebSocket URL (e.g. `ws://host:8080/ws`).
    pub ws_url: String,
    /// Broker topics to subscribe to once connected.
    pub topics: Vec<String>,
    /// Bearer credential carried on the broker CONNECT frame, if signed in.
    pub token: Option<String>,
    /// Delay between reconnection attempts.
    pub reconnect_delay: Duration,
}

impl ChannelConfig {
    /// Config with the default fixed reconnect delay.
    #[must_use]
    pub fn new(ws_url: String, topics: Vec<String>) -> Self {
        Self {
            ws_url,
            topics,
            token: None,
            reconnect_delay: constants::RECONNECT_DELAY,
        }
    }

    /// Attach a bearer credential to the broker handshake.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Override the reconnect delay (tests use short delays).
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

/// Connection state for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Attempting to connect.
    Connecting,
    /// Connected and subscribed.
    Connected,
    /// Waiting out the fixed delay before the next attempt.
    Reconnecting {
        /// Reconnection attempts since the last successful session.
        attempt: u32,
    },
}

/// A message received from a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessage {
    /// Destination topic the broker routed this message on.
    pub topic: String,
    /// Raw JSON body; consumers decode into their own shapes.
    pub body: String,
}

/// Errors internal to channel session establishment.
///
/// These never cross the consumer boundary -- the connection loop logs them
/// and retries. They exist as a type so the handshake code can be tested.
#[derive(Debug)]
pub enum ChannelError {
    /// WebSocket connect or STOMP handshake failed.
    ConnectFailed(String),
    /// A frame arrived that the codec could not parse.
    Protocol(String),
    /// The socket closed.
    Closed,
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectFailed(msg) => write!(f, "connect failed: {msg}"),
            Self::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Self::Closed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// A subscription to broker topics with automatic reconnection.
#[async_trait]
pub trait PushChannel: Send {
    /// Receive the next message, in arrival order.
    ///
    /// Returns `None` once the channel has been disconnected and the queue
    /// drained. Consumers must not block between calls; heavier processing
    /// should be handed off.
    async fn recv(&mut self) -> Option<TopicMessage>;

    /// Tear down the connection and release the subscription.
    ///
    /// Idempotent. No messages are delivered after this returns, but a
    /// message racing the disconnect may be either dropped or delivered.
    async fn disconnect(&mut self);

    /// Current connection state, for display.
    async fn state(&self) -> ConnectionState;
}

/// Shared connection state observable from outside the channel task.
#[derive(Debug, Default)]
pub struct SharedConnectionState {
    state: RwLock<ConnectionState>,
}

impl SharedConnectionState {
    /// Create new shared state.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Get the current state.
    pub async fn get(&self) -> ConnectionState {
        self.state.read().await.clone()
    }

    /// Set the state.
    pub async fn set(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, ConnectionState::Connected)
    }
}

// Re-exports
pub use stomp::StompChannel;
