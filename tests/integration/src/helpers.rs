//! Test helpers for integration tests
//!
//! Provides utilities for spawning a gateway on an ephemeral port and
//! driving it with real WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use parley_common::AppConfig;
use parley_gateway::protocol::{ClientCommand, ServerEvent};
use parley_gateway::server::{create_app, GatewayState};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long to wait for an expected event before failing the test
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// How long to listen before concluding nothing is coming
const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a gateway with default configuration on an ephemeral port
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a gateway with custom config on an ephemeral port
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let app = create_app(GatewayState::new(config));
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Base HTTP URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL for the gateway route
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

/// A WebSocket client speaking the gateway protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Open a connection to the gateway
    pub async fn connect(server: &TestServer) -> Result<Self> {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .context("Failed to open WebSocket")?;
        Ok(Self { stream })
    }

    /// Open a connection and claim a name, consuming the list update
    pub async fn join(server: &TestServer, name: &str) -> Result<Self> {
        let mut client = Self::connect(server).await?;
        client
            .send(&ClientCommand::SetUsername(name.to_string()))
            .await?;
        client.recv_named("userListUpdate").await?;
        Ok(client)
    }

    /// Send one command
    pub async fn send(&mut self, command: &ClientCommand) -> Result<()> {
        self.stream
            .send(Message::Text(command.to_json()?))
            .await
            .context("Failed to send command")?;
        Ok(())
    }

    /// Send a raw text frame, bypassing command serialization
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .context("Failed to send raw frame")?;
        Ok(())
    }

    /// Receive the next event, failing if none arrives in time
    pub async fn recv(&mut self) -> Result<ServerEvent> {
        loop {
            let frame = timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .context("Timed out waiting for an event")?;

            match frame {
                Some(Ok(Message::Text(text))) => {
                    return ServerEvent::from_json(&text).context("Unparsable event")
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(other)) => bail!("Unexpected frame: {other:?}"),
                Some(Err(e)) => bail!("WebSocket error: {e}"),
                None => bail!("Connection closed while waiting for an event"),
            }
        }
    }

    /// Receive events until one with the given wire name arrives
    pub async fn recv_named(&mut self, name: &str) -> Result<ServerEvent> {
        loop {
            let event = self.recv().await?;
            if event.name() == name {
                return Ok(event);
            }
        }
    }

    /// Assert that no event arrives within the silence window
    pub async fn assert_silent(&mut self) -> Result<()> {
        match timeout(SILENCE_WINDOW, self.stream.next()).await {
            Err(_) => Ok(()),
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => Ok(()),
            Ok(Some(Ok(frame))) => bail!("Expected silence, got frame: {frame:?}"),
            Ok(Some(Err(e))) => bail!("WebSocket error during silence window: {e}"),
            Ok(None) => Ok(()),
        }
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await.ok();
        Ok(())
    }
}
