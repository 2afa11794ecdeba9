//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - Contract behavior shared between crates
//! - HTTP -> decoder -> buffer -> relay -> transmitter over real sockets
//! - Mirror isolation from the primary forwarding path

#[cfg(test)]
mod helpers;

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigLoader, Overrides};
    use contracts::{SerializationMode, TransmitterKind};

    #[test]
    fn test_mode_fallback() {
        assert_eq!(
            SerializationMode::from_setting(Some("sfia")),
            SerializationMode::StringBatch
        );
        assert_eq!(
            SerializationMode::from_setting(None),
            SerializationMode::StringBatch
        );
    }

    #[test]
    fn test_environment_resolution() {
        let overrides = Overrides::from_lookup(|name| match name {
            "SERIALIZATION" => Some("SCDF".to_string()),
            "METRIC_BUFFER_SIZE" => Some("not-a-number".to_string()),
            "MIRROR_URL" => Some(String::new()),
            "TRANSMITTER" => Some("udp".to_string()),
            _ => None,
        });

        let config = ConfigLoader::resolve(None, &overrides).unwrap();
        assert_eq!(config.serialization, SerializationMode::CollectorBatch);
        assert_eq!(config.buffer_size.get(), 100);
        assert_eq!(config.mirror_destination(), None);
        assert_eq!(config.transmitter, TransmitterKind::Udp);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::net::SocketAddr;
    use std::num::NonZeroUsize;
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{CanonicalLine, SerializationMode, TransmitterKind};
    use dispatcher::{spawn_relay, ChannelSink, HttpMirror, Relay, RelayStats};
    use ingestion::{build_router, ForwardingBuffer, IngestState, LineConsumer};
    use reqwest::Client;
    use tokio::net::UdpSocket;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use crate::helpers::{poll_until, serve, spawn_mock_mirror, unused_addr, MirrorBehavior};

    const LIMIT: usize = 1024 * 1024;

    struct Proxy {
        addr: SocketAddr,
        server: crate::helpers::Server,
        relay: JoinHandle<RelayStats>,
    }

    /// Serve the ingest router on loopback with a channel-backed relay
    async fn start_proxy(
        mode: SerializationMode,
        capacity: usize,
        intake: mpsc::Sender<CanonicalLine>,
        mirror: Option<HttpMirror>,
    ) -> Proxy {
        let (producer, consumer) =
            ForwardingBuffer::bounded(NonZeroUsize::new(capacity).unwrap());
        let relay = Relay::new(consumer, ChannelSink::new("intake", intake)).spawn();

        let mut state = IngestState::new(mode, producer);
        if let Some(mirror) = mirror {
            state = state.with_mirror(Arc::new(mirror));
        }
        let server = serve(build_router(state, LIMIT)).await;

        Proxy {
            addr: server.addr,
            server,
            relay,
        }
    }

    async fn post(client: &Client, addr: SocketAddr, body: &'static str) -> reqwest::StatusCode {
        client
            .post(format!("http://{addr}/metric"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
            .status()
    }

    async fn recv_lines(rx: &mut mpsc::Receiver<CanonicalLine>, n: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(n);
        for _ in 0..n {
            let line = timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("line not relayed in time")
                .expect("intake closed early");
            lines.push(line.to_string());
        }
        lines
    }

    /// End-to-end: HTTP -> decoder -> buffer -> relay -> intake
    #[tokio::test]
    async fn test_e2e_scalar_batch() {
        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::ScalarBatch, 8, intake_tx, None).await;
        let client = Client::new();

        let status = post(
            &client,
            proxy.addr,
            r#"[{"path":"a.b","value":1.5,"timestamp":1000},{"path":"a.c","value":-2,"timestamp":1001}]"#,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            recv_lines(&mut intake_rx, 2).await,
            vec!["a.b 1.500000 1000", "a.c -2.000000 1001"]
        );

        proxy.server.stop().await;
        let stats = timeout(Duration::from_secs(2), proxy.relay).await.unwrap().unwrap();
        assert_eq!(stats.relayed_count, 2);
    }

    #[tokio::test]
    async fn test_e2e_collectd_batch() {
        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::CollectorBatch, 8, intake_tx, None).await;

        let status = post(
            &Client::new(),
            proxy.addr,
            r#"[{"values":[0.5],"dstypes":["gauge"],"dsnames":["value"],"time":1700000000.25,
                 "interval":10,"host":"web01","plugin":"cpu","plugin_instance":"0",
                 "type":"percent","type_instance":"user.nice"},
                {"values":[42],"time":1700000001,"host":"web01","plugin":"load","type":"load"}]"#,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            recv_lines(&mut intake_rx, 2).await,
            vec![
                "hosts.web01.cpu-0.percent-user_nice 0.500000 1700000000",
                "hosts.web01.load.load 42.000000 1700000001",
            ]
        );
        proxy.server.stop().await;
    }

    #[tokio::test]
    async fn test_e2e_rejected_batch_relays_nothing() {
        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 8, intake_tx, None).await;
        let client = Client::new();

        let status = post(
            &client,
            proxy.addr,
            r#"[{"path":"ok","value":"1","timestamp":"2"},{"path":"bad","value":"1"}]"#,
        )
        .await;
        assert_eq!(status, 400);

        let status = post(&client, proxy.addr, r#"[{"path":"ok","value":"1","timestamp":"2"}]"#).await;
        assert_eq!(status, 200);

        // Only the accepted request's line comes through
        assert_eq!(recv_lines(&mut intake_rx, 1).await, vec!["ok 1 2"]);
        proxy.server.stop().await;
        timeout(Duration::from_secs(2), proxy.relay).await.unwrap().unwrap();
        assert!(intake_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_e2e_requests_keep_order() {
        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringSingle, 2, intake_tx, None).await;
        let client = Client::new();

        for body in [
            r#"{"path":"m","value":"1","timestamp":"1"}"#,
            r#"{"path":"m","value":"2","timestamp":"2"}"#,
            r#"{"path":"m","value":"3","timestamp":"3"}"#,
        ] {
            assert_eq!(post(&client, proxy.addr, body).await, 200);
        }

        assert_eq!(
            recv_lines(&mut intake_rx, 3).await,
            vec!["m 1 1", "m 2 2", "m 3 3"]
        );
        proxy.server.stop().await;
    }

    /// A stalled transmitter holds requests open instead of dropping lines
    #[tokio::test]
    async fn test_e2e_backpressure_blocks_request() {
        let (intake_tx, mut intake_rx) = mpsc::channel(1);
        let proxy = start_proxy(SerializationMode::StringBatch, 1, intake_tx, None).await;
        let addr = proxy.addr;

        let request = tokio::spawn(async move {
            post(
                &Client::new(),
                addr,
                r#"[{"path":"m","value":"1","timestamp":"1"},{"path":"m","value":"2","timestamp":"2"},
                    {"path":"m","value":"3","timestamp":"3"},{"path":"m","value":"4","timestamp":"4"},
                    {"path":"m","value":"5","timestamp":"5"}]"#,
            )
            .await
        });

        // Intake (1) + relay in hand (1) + buffer (1) cannot hold five lines
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!request.is_finished(), "request should wait on a full buffer");

        let lines = recv_lines(&mut intake_rx, 5).await;
        assert_eq!(lines, vec!["m 1 1", "m 2 2", "m 3 3", "m 4 4", "m 5 5"]);
        assert_eq!(request.await.unwrap(), 200);
        proxy.server.stop().await;
    }

    /// Stopping the listener drops every producer; the relay drains and exits
    #[tokio::test]
    async fn test_e2e_graceful_drain() {
        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 16, intake_tx, None).await;

        let status = post(
            &Client::new(),
            proxy.addr,
            r#"[{"path":"a","value":"1","timestamp":"1"},{"path":"b","value":"2","timestamp":"2"},
                {"path":"c","value":"3","timestamp":"3"}]"#,
        )
        .await;
        assert_eq!(status, 200);

        proxy.server.stop().await;
        let stats = timeout(Duration::from_secs(2), proxy.relay).await.unwrap().unwrap();
        assert_eq!(stats.relayed_count, 3);
        assert_eq!(stats.failure_count, 0);

        let mut lines = Vec::new();
        while let Some(line) = intake_rx.recv().await {
            lines.push(line.to_string());
        }
        assert_eq!(lines, vec!["a 1 1", "b 2 2", "c 3 3"]);
    }

    #[tokio::test]
    async fn test_e2e_mirror_receives_exact_body() {
        let mirror_server = spawn_mock_mirror(MirrorBehavior::Accept).await;
        let mirror = HttpMirror::new(mirror_server.url(), Duration::from_secs(2)).unwrap();

        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 8, intake_tx, Some(mirror)).await;

        let raw = "[ {\"path\":\"a\", \"value\":\"1\", \"timestamp\":\"2\", \"extra\":true} ]";
        assert_eq!(post(&Client::new(), proxy.addr, raw).await, 200);
        assert_eq!(recv_lines(&mut intake_rx, 1).await, vec!["a 1 2"]);

        let received = poll_until(|| async {
            let bodies = mirror_server.received().await;
            (!bodies.is_empty()).then_some(bodies)
        })
        .await
        .expect("mirror never received the body");

        assert_eq!(received.len(), 1);
        assert_eq!(&received[0].body[..], raw.as_bytes());
        assert_eq!(received[0].content_type.as_deref(), Some("application/json"));

        proxy.server.stop().await;
        mirror_server.stop().await;
    }

    #[tokio::test]
    async fn test_e2e_unreachable_mirror_is_isolated() {
        let mirror = HttpMirror::new(
            format!("http://{}/metric", unused_addr().await),
            Duration::from_secs(1),
        )
        .unwrap();

        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 8, intake_tx, Some(mirror)).await;
        let client = Client::new();

        for _ in 0..5 {
            let status = post(&client, proxy.addr, r#"[{"path":"a","value":"1","timestamp":"2"}]"#).await;
            assert_eq!(status, 200);
        }
        assert_eq!(recv_lines(&mut intake_rx, 5).await.len(), 5);
        proxy.server.stop().await;
    }

    #[tokio::test]
    async fn test_e2e_slow_mirror_does_not_delay_response() {
        let mirror_server = spawn_mock_mirror(MirrorBehavior::Stall(Duration::from_secs(3))).await;
        let mirror = HttpMirror::new(mirror_server.url(), Duration::from_secs(5)).unwrap();

        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 8, intake_tx, Some(mirror)).await;

        let status = timeout(
            Duration::from_secs(1),
            post(&Client::new(), proxy.addr, r#"[{"path":"a","value":"1","timestamp":"2"}]"#),
        )
        .await
        .expect("response waited on the mirror");
        assert_eq!(status, 200);
        assert_eq!(recv_lines(&mut intake_rx, 1).await, vec!["a 1 2"]);

        proxy.server.stop().await;
        mirror_server.stop().await;
    }

    #[tokio::test]
    async fn test_e2e_failing_mirror_is_isolated() {
        let mirror_server = spawn_mock_mirror(MirrorBehavior::Fail).await;
        let mirror = HttpMirror::new(mirror_server.url(), Duration::from_secs(2)).unwrap();

        let (intake_tx, mut intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 8, intake_tx, Some(mirror)).await;

        let status = post(&Client::new(), proxy.addr, r#"[{"path":"a","value":"1","timestamp":"2"}]"#).await;
        assert_eq!(status, 200);
        assert_eq!(recv_lines(&mut intake_rx, 1).await, vec!["a 1 2"]);

        proxy.server.stop().await;
        mirror_server.stop().await;
    }

    #[tokio::test]
    async fn test_e2e_unmatched_routes() {
        let (intake_tx, _intake_rx) = mpsc::channel(64);
        let proxy = start_proxy(SerializationMode::StringBatch, 8, intake_tx, None).await;
        let client = Client::new();

        let response = client
            .get(format!("http://{}/metric", proxy.addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.bytes().await.unwrap().is_empty());

        let response = client
            .post(format!("http://{}/elsewhere", proxy.addr))
            .body("garbage")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        proxy.server.stop().await;
    }

    /// Configured UDP transmitter: one newline-terminated datagram per line
    #[tokio::test]
    async fn test_e2e_udp_transmitter() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = receiver.local_addr().unwrap();

        let (producer, consumer): (_, LineConsumer) =
            ForwardingBuffer::bounded(NonZeroUsize::new(8).unwrap());
        let relay = spawn_relay(TransmitterKind::Udp, target, consumer).await.unwrap();
        assert_eq!(relay.sink_name, "udp");

        let server = serve(build_router(
            IngestState::new(SerializationMode::ScalarBatch, producer),
            LIMIT,
        ))
        .await;

        let status = post(
            &Client::new(),
            server.addr,
            r#"[{"path":"net.rx","value":10,"timestamp":5},{"path":"net.tx","value":0.25,"timestamp":6}]"#,
        )
        .await;
        assert_eq!(status, 200);

        let mut buf = [0u8; 256];
        let mut datagrams = Vec::new();
        for _ in 0..2 {
            let len = timeout(Duration::from_secs(2), receiver.recv(&mut buf))
                .await
                .unwrap()
                .unwrap();
            datagrams.push(String::from_utf8_lossy(&buf[..len]).into_owned());
        }
        assert_eq!(datagrams, vec!["net.rx 10.000000 5\n", "net.tx 0.250000 6\n"]);

        server.stop().await;
        let stats = timeout(Duration::from_secs(2), relay.task).await.unwrap().unwrap();
        assert_eq!(stats.relayed_count, 2);
    }
}
