//! The alerts feed: one-shot listing and the live watch loop.
//!
//! `watch` is the composition point the library is built around: one bulk
//! fetch and one push subscription feeding the same [`AlertFeed`], which
//! owns ordering, deduplication and lifecycle. The loop itself only
//! renders.

use anyhow::Result;
use std::time::Duration;

use crate::channel::{ChannelConfig, PushChannel, StompChannel};
use crate::config::Config;
use crate::constants::ALERTS_TOPIC;
use crate::error::ApiError;
use crate::feed::{AlertFeed, FeedPhase, FeedSnapshot};
use crate::models::{FeedEvent, IncidentReport};
use crate::session::Session;

/// Fetch and print the current alerts once.
pub async fn list(config: &Config, session: &Session) -> Result<()> {
    anyhow::ensure!(
        session.is_signed_in(),
        "Please sign in to view live alerts."
    );

    let api = super::api_client(config, session)?;
    let (mut feed, _snapshots) = AlertFeed::new();
    feed.begin_load();

    let result = api.fetch_incidents().await;
    if let Err(ref e) = result {
        eprintln!("  Failed to load alerts from server: {e}");
    }
    feed.load_complete(result);

    render(&feed.snapshot());
    Ok(())
}

/// Follow the live feed until interrupted.
pub async fn watch(config: &Config, session: &Session) -> Result<()> {
    anyhow::ensure!(
        session.is_signed_in(),
        "Please sign in to view live alerts."
    );

    let api = super::api_client(config, session)?;
    let (mut feed, _snapshots) = AlertFeed::new();
    feed.begin_load();

    let fetch_api = api.clone();
    let mut fetch = tokio::spawn(async move { fetch_api.fetch_incidents().await });
    let mut fetch_pending = true;

    let channel_config = ChannelConfig::new(config.ws_url(), vec![ALERTS_TOPIC.to_string()])
        .with_token(session.credential().map(String::from))
        .with_reconnect_delay(Duration::from_secs(config.reconnect_delay_secs));
    let mut channel = StompChannel::connect(channel_config);

    println!("  Watching {} (Ctrl-C to stop)", ALERTS_TOPIC);

    loop {
        tokio::select! {
            joined = &mut fetch, if fetch_pending => {
                fetch_pending = false;
                let result = joined.unwrap_or_else(|e| {
                    Err(ApiError::NetworkUnreachable(format!("fetch task failed: {e}")))
                });
                if let Err(ref e) = result {
                    eprintln!("  Failed to load alerts from server: {e}");
                }
                feed.load_complete(result);
                render(&feed.snapshot());
            }

            inbound = channel.recv() => {
                let Some(msg) = inbound else { break };
                match serde_json::from_str::<IncidentReport>(&msg.body) {
                    Ok(report) => {
                        let event = FeedEvent::from(report);
                        let line = format_event(&event);
                        if feed.on_push_event(event) {
                            println!("  NEW {line}");
                        }
                    }
                    Err(e) => log::debug!("Ignoring malformed push message: {e}"),
                }
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.close();
    channel.disconnect().await;
    println!("  Feed closed.");
    Ok(())
}

fn format_event(event: &FeedEvent) -> String {
    format!(
        "[{}] #{} {} ({})",
        event.severity,
        event.id,
        event.message,
        event.occurred_at.format("%Y-%m-%d %H:%M")
    )
}

fn render(snapshot: &FeedSnapshot) {
    match &snapshot.phase {
        FeedPhase::Failed(reason) => {
            println!("  Alerts unavailable: {reason}");
        }
        _ if snapshot.events.is_empty() => {
            println!("  All systems are normal. No active alerts.");
        }
        _ => {
            for event in &snapshot.events {
                println!("  {}", format_event(event));
            }
            println!(
                "  Summary: {} weather, {} traffic, {} power, {} pollution",
                snapshot.count_for("Weather"),
                snapshot.count_for("Traffic"),
                snapshot.count_for("Power"),
                snapshot.count_for("Pollution"),
            );
        }
    }
}
