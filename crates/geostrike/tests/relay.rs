//! Integration tests for the relay: real sockets on loopback.

use std::time::Duration;

use geostrike::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

type Client = EnvelopeChannel<WebSocketConnection>;

/// Starts a relay on a random port and returns its URL.
async fn start_relay() -> String {
    let relay = RelayServer::builder()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("relay should build");

    let addr = relay.local_addr().expect("should have local addr");

    tokio::spawn(async move {
        let _ = relay.run().await;
    });

    format!("ws://{addr}")
}

async fn connect(url: &str) -> Client {
    let conn = WebSocketConnection::connect(url)
        .await
        .expect("should connect");
    EnvelopeChannel::new(conn)
}

async fn next(client: &Client) -> WebSocketMessage {
    tokio::time::timeout(Duration::from_secs(2), client.recv())
        .await
        .expect("timed out waiting for envelope")
        .expect("recv should succeed")
        .expect("relay closed the connection")
}

/// Round-trips an echo so the relay has registered this client.
async fn join(client: &Client, name: &str) {
    client.send_one(Echo::new(name)).await.expect("send echo");
    let reply = next(client).await;
    assert_eq!(reply.messages, vec![Msg::from(Echo::new(name))]);
}

/// Two registered clients; `a` has already drained `b`'s join echo.
async fn pair() -> (Client, Client) {
    let url = start_relay().await;
    let a = connect(&url).await;
    join(&a, "a").await;
    let b = connect(&url).await;
    join(&b, "b").await;

    let forwarded = next(&a).await;
    assert_eq!(forwarded.messages, vec![Msg::from(Echo::new("b"))]);
    (a, b)
}

fn player() -> Player {
    Player::new("alice", GeoLocation::new(51.5074, -0.1278), "2024-05-01T12:00:00Z")
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_echo_returns_to_sender() {
    let url = start_relay().await;
    let client = connect(&url).await;

    join(&client, "hello relay").await;
}

#[tokio::test]
async fn test_envelope_forwarded_to_other_peer() {
    let (a, b) = pair().await;

    let batch: Vec<Msg> = vec![
        LocationUpdate::new(player(), GeoLocation::new(48.8566, 2.3522)).into(),
        FetchMissiles::new().into(),
    ];
    a.send(&batch).await.unwrap();

    let received = next(&b).await;
    assert_eq!(received.messages, batch);
}

#[tokio::test]
async fn test_sender_does_not_receive_its_own_forward() {
    let (a, b) = pair().await;

    a.send(&[Msg::from(GeoLocation::new(1.0, 2.0))]).await.unwrap();
    next(&b).await;

    let nothing = tokio::time::timeout(Duration::from_millis(100), a.recv()).await;
    assert!(nothing.is_err(), "sender should not get its own envelope back");
}

#[tokio::test]
async fn test_mixed_batch_echoes_only_echo_messages() {
    let (a, b) = pair().await;

    let batch: Vec<Msg> = vec![Echo::new("ping").into(), GeoLocation::new(3.0, 4.0).into()];
    a.send(&batch).await.unwrap();

    let echoed = next(&a).await;
    assert_eq!(echoed.messages, vec![Msg::from(Echo::new("ping"))]);

    let forwarded = next(&b).await;
    assert_eq!(forwarded.messages, batch);
}

#[tokio::test]
async fn test_corrupt_envelope_does_not_drop_peer() {
    let url = start_relay().await;
    let raw = WebSocketConnection::connect(&url).await.unwrap();

    raw.send(&[0xFF, 0xFF, 0xFF]).await.unwrap();
    raw.send(&pack_one(&Msg::from(Echo::new("still here"))).unwrap())
        .await
        .unwrap();

    let bytes = tokio::time::timeout(Duration::from_secs(2), raw.recv())
        .await
        .expect("timed out")
        .unwrap()
        .expect("relay should keep the connection open");
    let reply = unpack(&bytes).unwrap();
    assert_eq!(reply.messages, vec![Msg::from(Echo::new("still here"))]);
}

#[tokio::test]
async fn test_disconnected_peer_is_skipped() {
    let url = start_relay().await;
    let a = connect(&url).await;
    join(&a, "a").await;
    let b = connect(&url).await;
    join(&b, "b").await;
    next(&a).await;

    b.close().await.unwrap();
    drop(b);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The relay must keep serving the remaining peer.
    join(&a, "alone").await;
}

#[tokio::test]
async fn test_shutdown_stops_relay_and_closes_peers() {
    let relay = RelayServer::builder()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let url = format!("ws://{}", relay.local_addr().unwrap());
    let handle = relay.shutdown_handle();
    let running = tokio::spawn(relay.run());

    let client = connect(&url).await;
    join(&client, "before shutdown").await;

    handle.shutdown();

    let result = tokio::time::timeout(Duration::from_secs(2), running)
        .await
        .expect("relay should stop promptly")
        .unwrap();
    assert!(result.is_ok());

    let closed = tokio::time::timeout(Duration::from_secs(2), client.recv())
        .await
        .expect("peer should be closed");
    assert!(matches!(closed, Ok(None) | Err(_)));
}
