//! Integration tests for the live alerts feed.
//!
//! These wire the real pieces together -- wiremock for the bulk REST fetch,
//! an in-process STOMP server for the push channel, and the feed view model
//! -- and verify the merge behaves the same under either arrival order.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citywatch::channel::frame::Frame;
use citywatch::channel::{ChannelConfig, PushChannel, StompChannel};
use citywatch::feed::{AlertFeed, FeedPhase};
use citywatch::models::{FeedEvent, IncidentReport};
use citywatch::{ApiClient, ApiError};

fn incident_json(id: i64, minute: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "category": "Traffic",
        "location": "Main Road",
        "description": "congestion",
        "createdAt": format!("2026-03-01T08:{minute:02}:00Z")
    })
}

/// Serve one STOMP session: handshake, then emit the given bodies as
/// MESSAGE frames once the client subscribes, then hold the socket open.
async fn serve_alerts(listener: TcpListener, bodies: Vec<String>) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    loop {
        let Some(Ok(Message::Text(text))) = ws.next().await else {
            panic!("client closed during handshake");
        };
        let frame = Frame::parse(&text).unwrap();
        match frame.command.as_str() {
            "CONNECT" => {
                let connected = Frame::control("CONNECTED", &[("version", "1.2")]);
                ws.send(Message::Text(connected.encode())).await.unwrap();
            }
            "SUBSCRIBE" => break,
            _ => {}
        }
    }

    for body in bodies {
        let mut frame = Frame::control(
            "MESSAGE",
            &[("destination", "/topic/alerts"), ("subscription", "sub-0")],
        );
        frame.body = body;
        ws.send(Message::Text(frame.encode())).await.unwrap();
    }

    while let Some(Ok(_)) = ws.next().await {}
}

async fn start_push_server(bodies: Vec<String>) -> (ChannelConfig, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(serve_alerts(listener, bodies));
    let config = ChannelConfig::new(
        format!("ws://{addr}/ws"),
        vec!["/topic/alerts".to_string()],
    )
    .with_reconnect_delay(Duration::from_millis(50));
    (config, handle)
}

async fn recv_event(channel: &mut StompChannel) -> FeedEvent {
    let msg = tokio::time::timeout(Duration::from_secs(5), channel.recv())
        .await
        .expect("timed out waiting for push message")
        .expect("push channel closed");
    let report: IncidentReport = serde_json::from_str(&msg.body).unwrap();
    FeedEvent::from(report)
}

#[tokio::test]
async fn push_racing_bulk_fetch_yields_no_duplicates() {
    // Bulk fetch will return [1, 2]; the broker delivers 2 first.
    let rest = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/incident"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            incident_json(1, 5),
            incident_json(2, 10),
        ])))
        .mount(&rest)
        .await;

    let (push_config, server) = start_push_server(vec![incident_json(2, 10).to_string()]).await;
    let api = ApiClient::new(&rest.uri(), Some("tok".to_string())).unwrap();
    let (mut feed, _snapshots) = AlertFeed::new();

    feed.begin_load();
    let mut channel = StompChannel::connect(push_config);

    // Push arrives while the fetch is still "in flight"
    feed.on_push_event(recv_event(&mut channel).await);
    feed.load_complete(api.fetch_incidents().await);

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.phase, FeedPhase::Ready);
    let ids: Vec<i64> = snapshot.events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1]);

    channel.disconnect().await;
    server.abort();
}

#[tokio::test]
async fn failed_fetch_still_accepts_push_events() {
    let rest = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/incident"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&rest)
        .await;

    let (push_config, server) = start_push_server(vec![incident_json(3, 12).to_string()]).await;
    let api = ApiClient::new(&rest.uri(), Some("tok".to_string())).unwrap();
    let (mut feed, _snapshots) = AlertFeed::new();

    feed.begin_load();
    let result = api.fetch_incidents().await;
    assert!(matches!(result, Err(ApiError::HttpStatus(500))));
    feed.load_complete(result);
    assert!(matches!(feed.phase(), FeedPhase::Failed(_)));

    let mut channel = StompChannel::connect(push_config);
    assert!(feed.on_push_event(recv_event(&mut channel).await));

    let ids: Vec<i64> = feed.snapshot().events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3]);

    channel.disconnect().await;
    server.abort();
}

#[tokio::test]
async fn push_events_merge_in_arrival_order_after_ready() {
    let rest = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/incident"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&rest)
        .await;

    let (push_config, server) = start_push_server(vec![
        incident_json(10, 1).to_string(),
        incident_json(11, 2).to_string(),
    ])
    .await;
    let api = ApiClient::new(&rest.uri(), Some("tok".to_string())).unwrap();
    let (mut feed, _snapshots) = AlertFeed::new();

    feed.begin_load();
    feed.load_complete(api.fetch_incidents().await);

    let mut channel = StompChannel::connect(push_config);
    feed.on_push_event(recv_event(&mut channel).await);
    feed.on_push_event(recv_event(&mut channel).await);

    let ids: Vec<i64> = feed.snapshot().events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![11, 10]);

    channel.disconnect().await;
    server.abort();
}
