//! Helpers for exercising the keep-alive HTTP server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use auction_api::{create_app, create_service_context, AppState};
use auction_service::NullChatPort;
use tempfile::TempDir;

use crate::fixtures::test_config;

/// A running keep-alive server on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
    _tmp: TempDir,
}

impl TestServer {
    /// Start a server over temporary storage
    pub async fn start() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let config = test_config(&tmp, &[1]);

        let ctx = create_service_context(&config, Arc::new(NullChatPort::new())).await?;
        let app = create_app(AppState::new(ctx, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            addr,
            client,
            _handle: handle,
            _tmp: tmp,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("http://{}{}", self.addr, path);
        Ok(self.client.get(&url).send().await?)
    }
}
