//! STOMP push-channel implementation.
//!
//! This module provides [`StompChannel`], an implementation of the
//! [`PushChannel`] trait that subscribes to broker topics over the
//! backend's `/ws` WebSocket endpoint.
//!
//! # Architecture
//!
//! `connect()` returns immediately; a spawned task owns the socket and runs
//! the connection loop. Inbound `MESSAGE` frames are pushed onto a bounded
//! queue in arrival order; the handle side only ever touches the queue, the
//! shared state cell, and a oneshot shutdown signal.
//!
//! Reconnection is a fixed delay applied unconditionally after every failed
//! attempt or lost session, forever, until the handle disconnects. Messages
//! published while the connection is down are lost; there is no replay.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{
    connect_async, tungstenite::client::IntoClientRequest, tungstenite::Message,
};

use super::frame::Frame;
use super::{
    ChannelConfig, ChannelError, ConnectionState, PushChannel, SharedConnectionState,
    TopicMessage,
};
use crate::constants;

/// Concrete WebSocket stream type (avoids repeating the generic everywhere).
type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;
type WsSink = futures_util::stream::SplitSink<WsStream, Message>;
type WsSource = futures_util::stream::SplitStream<WsStream>;

/// Topic subscription over STOMP with unconditional fixed-delay reconnect.
#[derive(Debug)]
pub struct StompChannel {
    state: std::sync::Arc<SharedConnectionState>,
    msg_rx: mpsc::Receiver<TopicMessage>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StompChannel {
    /// Open the channel.
    ///
    /// Returns a handle immediately; connection and subscription happen in
    /// the background and are retried on failure until [`PushChannel::disconnect`]
    /// is called or the handle is dropped.
    #[must_use]
    pub fn connect(config: ChannelConfig) -> Self {
        let state = SharedConnectionState::new();
        let (msg_tx, msg_rx) = mpsc::channel(constants::CHANNEL_QUEUE_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(Self::run_connection_loop(
            config,
            std::sync::Arc::clone(&state),
            msg_tx,
            shutdown_rx,
        ));

        Self {
            state,
            msg_rx,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Run the connection loop with automatic reconnection.
    async fn run_connection_loop(
        config: ChannelConfig,
        state: std::sync::Arc<SharedConnectionState>,
        msg_tx: mpsc::Sender<TopicMessage>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        let mut attempt: u32 = 0;

        loop {
            match shutdown_rx.try_recv() {
                Ok(()) | Err(oneshot::error::TryRecvError::Closed) => break,
                Err(oneshot::error::TryRecvError::Empty) => {}
            }

            state.set(ConnectionState::Connecting).await;

            match Self::open_session(&config).await {
                Ok((mut write, mut read)) => {
                    log::info!(
                        "Subscribed to {} topic(s) at {}",
                        config.topics.len(),
                        config.ws_url
                    );
                    state.set(ConnectionState::Connected).await;
                    attempt = 0;

                    let shutdown_requested = Self::run_message_loop(
                        &mut write,
                        &mut read,
                        &msg_tx,
                        &mut shutdown_rx,
                    )
                    .await;

                    if shutdown_requested {
                        break;
                    }

                    log::warn!("Push channel lost: {}", config.ws_url);
                }
                Err(e) => {
                    log::warn!("Push channel connect failed: {e}");
                }
            }

            // Fixed delay, no backoff growth, no retry budget.
            attempt += 1;
            state.set(ConnectionState::Reconnecting { attempt }).await;
            log::info!(
                "Reconnecting to {} in {}s (attempt {attempt})",
                config.ws_url,
                config.reconnect_delay.as_secs()
            );

            tokio::select! {
                _ = tokio::time::sleep(config.reconnect_delay) => {}
                _ = &mut shutdown_rx => break,
            }
        }

        state.set(ConnectionState::Disconnected).await;
    }

    /// Connect the WebSocket, perform the STOMP handshake, and subscribe.
    async fn open_session(config: &ChannelConfig) -> Result<(WsSink, WsSource), ChannelError> {
        let request = config
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| ChannelError::ConnectFailed(format!("invalid URL: {e}")))?;

        let host = request
            .uri()
            .host()
            .unwrap_or("localhost")
            .to_string();

        let (ws_stream, _response) = connect_async(request)
            .await
            .map_err(|e| ChannelError::ConnectFailed(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();

        let connect = Frame::connect(&host, config.token.as_deref());
        write
            .send(Message::Text(connect.encode()))
            .await
            .map_err(|e| ChannelError::ConnectFailed(format!("CONNECT send failed: {e}")))?;

        // Wait for CONNECTED before subscribing
        let handshake = tokio::time::timeout(constants::HANDSHAKE_TIMEOUT, async {
            while let Some(msg) = read.next().await {
                let Ok(Message::Text(text)) = msg else {
                    continue;
                };
                let frame = Frame::parse(&text)?;
                match frame.command.as_str() {
                    "CONNECTED" => return Ok(()),
                    "ERROR" => {
                        return Err(ChannelError::ConnectFailed(format!(
                            "broker rejected connect: {}",
                            frame.header("message").unwrap_or("no reason")
                        )))
                    }
                    _ => {}
                }
            }
            Err(ChannelError::Closed)
        })
        .await;

        match handshake {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(ChannelError::ConnectFailed(
                    "timeout waiting for CONNECTED".to_string(),
                ))
            }
        }

        for (index, topic) in config.topics.iter().enumerate() {
            let subscribe = Frame::subscribe(&format!("sub-{index}"), topic);
            write
                .send(Message::Text(subscribe.encode()))
                .await
                .map_err(|e| ChannelError::ConnectFailed(format!("SUBSCRIBE failed: {e}")))?;
        }

        Ok((write, read))
    }

    /// Pump frames until the socket drops or shutdown is requested.
    ///
    /// Returns `true` when exit was due to the shutdown signal; the caller
    /// breaks out of the reconnection loop in that case.
    async fn run_message_loop(
        write: &mut WsSink,
        read: &mut WsSource,
        msg_tx: &mpsc::Sender<TopicMessage>,
        shutdown_rx: &mut oneshot::Receiver<()>,
    ) -> bool {
        loop {
            tokio::select! {
                inbound = read.next() => match inbound {
                    Some(Ok(Message::Text(text))) => match Frame::parse(&text) {
                        Ok(frame) if frame.command == "MESSAGE" => {
                            let message = TopicMessage {
                                topic: frame.header("destination").unwrap_or_default().to_string(),
                                body: frame.body,
                            };
                            if msg_tx.send(message).await.is_err() {
                                log::debug!("Consumer dropped the queue; closing channel");
                                return true;
                            }
                        }
                        Ok(frame) if frame.command == "ERROR" => {
                            log::warn!(
                                "Broker error: {}",
                                frame.header("message").unwrap_or("unspecified")
                            );
                            return false;
                        }
                        Ok(_) => {
                            // RECEIPT and friends: nothing to do
                        }
                        Err(e) => {
                            log::debug!("Skipping unparseable frame: {e}");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        if write.send(Message::Pong(data)).await.is_err() {
                            return false;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return false,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("Push channel read error: {e}");
                        return false;
                    }
                },
                _ = &mut *shutdown_rx => {
                    // Best-effort goodbye; the broker drops the subscription
                    // either way once the socket closes.
                    let _ = write
                        .send(Message::Text(Frame::control("DISCONNECT", &[]).encode()))
                        .await;
                    let _ = write.close().await;
                    return true;
                }
            }
        }
    }
}

#[async_trait]
impl PushChannel for StompChannel {
    async fn recv(&mut self) -> Option<TopicMessage> {
        self.msg_rx.recv().await
    }

    async fn disconnect(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.msg_rx.close();
    }

    async fn state(&self) -> ConnectionState {
        self.state.get().await
    }
}
