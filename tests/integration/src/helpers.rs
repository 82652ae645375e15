//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use relay_common::RelayConfig;
use relay_gateway::server::{create_app, RelayState};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long to wait for an expected frame or state change
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding nothing else will arrive
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: RelayState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        Self::start_with_config(RelayConfig::default()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: RelayConfig) -> Result<Self> {
        let state = RelayState::new(config);
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(TIMEOUT).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Shared relay state of the running server
    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// Open a WebSocket with raw query string
    pub async fn connect_query(&self, query: &str) -> Result<RelayClient> {
        let url = format!("ws://{}/ws{}", self.addr, query);
        let (ws, _) = connect_async(url.as_str()).await?;
        Ok(RelayClient { ws })
    }

    /// Open a WebSocket and wait until it has joined `session_id`
    pub async fn join(&self, session_id: &str, role: &str) -> Result<RelayClient> {
        let before = self.state.transport().group_size(session_id);
        let client = self
            .connect_query(&format!("?sessionId={session_id}&role={role}"))
            .await?;

        self.wait_until(|state| state.transport().group_size(session_id) > before)
            .await
            .with_context(|| format!("connection never joined {session_id}"))?;

        Ok(client)
    }

    /// Poll the relay state until `predicate` holds
    pub async fn wait_until<F>(&self, predicate: F) -> Result<()>
    where
        F: Fn(&RelayState) -> bool,
    {
        let deadline = Instant::now() + TIMEOUT;
        while !predicate(&self.state) {
            if Instant::now() >= deadline {
                bail!("condition not reached within {TIMEOUT:?}");
            }
            sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }
}

/// WebSocket client speaking the relay envelope
pub struct RelayClient {
    ws: WsStream,
}

impl RelayClient {
    /// Send a payload on the relay channel
    pub async fn send_event(&mut self, payload: Value) -> Result<()> {
        let envelope = json!({"event": "hb:event", "data": payload});
        self.send_raw(&envelope.to_string()).await
    }

    /// Send an arbitrary text frame
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.ws.send(Message::text(text)).await?;
        Ok(())
    }

    /// Wait for the next relayed payload
    pub async fn next_event(&mut self) -> Result<Value> {
        loop {
            let msg = timeout(TIMEOUT, self.ws.next())
                .await
                .context("timeout waiting for event")?
                .context("stream closed")??;

            match msg {
                Message::Text(text) => {
                    let envelope: Value = serde_json::from_str(&text)?;
                    if envelope["event"] != "hb:event" {
                        bail!("unexpected channel: {envelope}");
                    }
                    return Ok(envelope["data"].clone());
                }
                Message::Close(frame) => bail!("connection closed: {frame:?}"),
                _ => {}
            }
        }
    }

    /// Assert that no text frame arrives for a short while
    pub async fn expect_silence(&mut self) -> Result<()> {
        match timeout(QUIET_PERIOD, self.ws.next()).await {
            Err(_) => Ok(()),
            Ok(Some(Ok(Message::Text(text)))) => bail!("unexpected frame: {text}"),
            Ok(other) => bail!("unexpected stream item: {other:?}"),
        }
    }

    /// Wait for the server to close the socket and return the close code
    pub async fn close_code(&mut self) -> Result<Option<u16>> {
        loop {
            let msg = timeout(TIMEOUT, self.ws.next())
                .await
                .context("timeout waiting for close")?;

            match msg {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| u16::from(f.code))),
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Ok(None),
            }
        }
    }

    /// Close the socket from the client side
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
