use anyhow::Result;
use async_stream::stream;
use clap::Parser;
use domain::{Fragment, OsEntropy};
use service::{config::Config, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use web::shutdown::ShutdownCoordinator;

struct TestServer {
    addr: SocketAddr,
    manager: Arc<sse::Manager>,
    signals: mpsc::UnboundedSender<&'static str>,
    handle: JoinHandle<web::error::Result<()>>,
}

impl TestServer {
    async fn start(grace_period: Duration) -> Result<Self> {
        let config = Config::parse_from(["hexfeed", "--tick-interval-ms", "100"]);
        let manager = Arc::new(sse::Manager::new(
            Arc::new(OsEntropy),
            config.tick_interval(),
        ));
        let page = web::page::render(&config);
        let app_state = AppState::new(config, &manager, page);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let signals = Box::pin(stream! {
            while let Some(signal) = rx.recv().await {
                yield signal;
            }
        });

        let handle = tokio::spawn(web::serve(
            listener,
            app_state,
            ShutdownCoordinator::new(grace_period),
            signals,
        ));

        Ok(Self {
            addr,
            manager,
            signals: tx,
            handle,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Splits a raw SSE body into complete `(event, data)` pairs. A trailing
/// block without its blank-line terminator is ignored.
fn parse_events(body: &str) -> Vec<(String, String)> {
    let mut blocks: Vec<&str> = body.split("\n\n").collect();
    blocks.pop();

    blocks
        .into_iter()
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let mut event = String::new();
            let mut data = Vec::new();
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    event = value.trim_start().to_string();
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
                }
            }
            (event, data.join("\n"))
        })
        .collect()
}

async fn read_for(response: &mut reqwest::Response, window: Duration) -> Result<String> {
    let deadline = Instant::now() + window;
    let mut body = String::new();
    while let Ok(chunk) = timeout_at(deadline, response.chunk()).await {
        match chunk? {
            Some(bytes) => body.push_str(std::str::from_utf8(&bytes)?),
            None => break,
        }
    }
    Ok(body)
}

fn is_lower_hex6(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[tokio::test]
async fn test_landing_page_references_stream() -> Result<()> {
    let server = TestServer::start(Duration::from_secs(1)).await?;

    let response = reqwest::get(server.url("/")).await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await?;
    assert!(body.contains("@get('/stream')"));
    assert!(body.contains(r#"id="feed""#));

    server.signals.send("SIGTERM")?;
    server.handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_stream_emits_patch_events_at_tick_interval() -> Result<()> {
    let server = TestServer::start(Duration::from_secs(1)).await?;

    let mut response = reqwest::get(server.url("/stream")).await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "text/event-stream"
    );

    let body = read_for(&mut response, Duration::from_millis(350)).await?;
    drop(response);

    let events = parse_events(&body);
    assert!(
        (2..=4).contains(&events.len()),
        "expected about 3 events in 350ms, got {}",
        events.len()
    );

    for (event, data) in &events {
        assert_eq!(event, "datastar-patch-elements");
        let html = data
            .strip_prefix("elements ")
            .expect("patch data starts with elements");

        let decoded = Fragment::decode(html)?;
        let hex = decoded.to_hex();
        assert!(is_lower_hex6(&hex));
        assert_eq!(html.matches(hex.as_str()).count(), 3);
    }

    server.signals.send("SIGTERM")?;
    server.handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_client_disconnect_closes_session() -> Result<()> {
    let server = TestServer::start(Duration::from_secs(1)).await?;

    let mut response = reqwest::get(server.url("/stream")).await?;
    assert!(response.chunk().await?.is_some());
    assert_eq!(server.manager.active_sessions(), 1);
    drop(response);

    let closed = timeout(Duration::from_secs(3), async {
        while server.manager.active_sessions() > 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(closed.is_ok(), "session outlived its client");

    server.signals.send("SIGTERM")?;
    server.handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_shutdown_drains_open_streams_within_grace_period() -> Result<()> {
    let grace_period = Duration::from_millis(300);
    let server = TestServer::start(grace_period).await?;

    let mut response = reqwest::get(server.url("/stream")).await?;
    assert!(response.chunk().await?.is_some());

    // Keep reading so the open session stays healthy until it is forced closed.
    let reader = tokio::spawn(async move {
        let mut chunks = 0;
        while let Ok(Some(_)) = response.chunk().await {
            chunks += 1;
        }
        chunks
    });

    let started = Instant::now();
    server.signals.send("SIGTERM")?;

    // New connections are not served once drain has begun.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let late = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()?
        .get(server.url("/stream"))
        .send()
        .await;
    assert!(late.map(|r| !r.status().is_success()).unwrap_or(true));

    timeout(Duration::from_secs(5), server.handle).await???;
    let elapsed = started.elapsed();
    assert!(elapsed >= grace_period, "drained after {elapsed:?}");

    // The client's stream ends instead of hanging.
    timeout(Duration::from_secs(2), reader).await??;
    assert_eq!(server.manager.active_sessions(), 0);
    Ok(())
}

#[tokio::test]
async fn test_bind_failure_is_reported() -> Result<()> {
    let occupied = TcpListener::bind("127.0.0.1:0").await?;
    let port = occupied.local_addr()?.port();

    let config = Config::parse_from([
        "hexfeed",
        "--interface",
        "127.0.0.1",
        "--port",
        &port.to_string(),
    ]);
    let manager = Arc::new(sse::Manager::default());
    let page = web::page::render(&config);
    let app_state = AppState::new(config, &manager, page);

    let err = web::init_server(app_state).await.unwrap_err();
    assert!(matches!(
        err.error_kind,
        web::error::ErrorKind::ListenBind { .. }
    ));
    Ok(())
}
